//! Loading, saving, and exporting the campaign document.
//!
//! Loading never fails: an absent, unreadable, or ill-fitting document
//! leaves the defaults in place. Save failures are logged and swallowed so a
//! broken store never stops the session.

use chrono::{DateTime, Utc};

use tcc_core::{CampaignState, CoreResult};

use crate::store::KeyValueStore;

/// Load the campaign document stored under `key`, merged over defaults.
pub fn load_state<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> CampaignState {
    let defaults = CampaignState::new();
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "no stored campaign, starting fresh");
            return defaults;
        }
        Err(e) => {
            tracing::error!(key, "failed to read stored campaign: {e}");
            return defaults;
        }
    };

    match defaults.merged_with_json(&raw) {
        Ok(state) => {
            tracing::debug!(key, characters = state.characters.len(), "campaign loaded");
            state
        }
        Err(e) => {
            tracing::warn!(key, "stored campaign is unusable, using defaults: {e}");
            defaults
        }
    }
}

/// Serialize `state` and write it under `key`. Returns whether it was written.
pub fn save_state<S: KeyValueStore + ?Sized>(store: &mut S, key: &str, state: &CampaignState) -> bool {
    let json = match state.to_json() {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(key, "failed to serialize campaign: {e}");
            return false;
        }
    };
    match store.write(key, &json) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(key, "failed to save campaign: {e}");
            false
        }
    }
}

/// A pretty-printed campaign document and the file name to save it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    /// Suggested file name: `tcc_campaign_<unix-millis>.json`.
    pub file_name: String,
    /// Pretty-printed JSON.
    pub contents: String,
}

/// Export `state` as made at `now`.
pub fn export_document(state: &CampaignState, now: DateTime<Utc>) -> CoreResult<ExportedDocument> {
    Ok(ExportedDocument {
        file_name: format!("tcc_campaign_{}.json", now.timestamp_millis()),
        contents: state.to_json_pretty()?,
    })
}
