//! The campaign document.
//!
//! Everything the application knows lives in one [`CampaignState`]. It is
//! serialized wholesale after every change and merged back on load or
//! import with a shallow, top-level merge: keys present in the incoming
//! document replace the current values, keys it omits keep theirs, and keys
//! the model does not know are carried along in [`CampaignState::extra`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::character::{Character, CharacterId};
use crate::dice_log::DiceHistory;
use crate::error::{CoreError, CoreResult};
use crate::initiative::InitiativeTracker;
use crate::notes::Notes;

/// Campaign name of a fresh document.
pub const DEFAULT_CAMPAIGN_NAME: &str = "My Campaign";

/// The whole persisted application state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CampaignState {
    /// Campaign display name.
    pub campaign_name: String,
    /// Character roster in creation order.
    pub characters: Vec<Character>,
    /// Weak reference to the selected character.
    pub selected_character_id: Option<CharacterId>,
    /// Turn-order tracker.
    pub initiative: InitiativeTracker,
    /// Session, world, and rules notes.
    pub notes: Notes,
    /// Recent dice rolls, most recent first.
    pub dice_history: DiceHistory,
    /// Top-level keys this version does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CampaignState {
    fn default() -> Self {
        Self {
            campaign_name: DEFAULT_CAMPAIGN_NAME.to_string(),
            characters: Vec::new(),
            selected_character_id: None,
            initiative: InitiativeTracker::default(),
            notes: Notes::default(),
            dice_history: DiceHistory::default(),
            extra: Map::new(),
        }
    }
}

impl CampaignState {
    /// A fresh document with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename the campaign. The name is trimmed and must not be empty.
    pub fn rename(&mut self, name: &str) -> CoreResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::EmptyName("campaign"));
        }
        self.campaign_name = name.to_string();
        Ok(())
    }

    /// The document as a top-level JSON object.
    pub fn to_document(&self) -> CoreResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(CoreError::InvalidDocument(
                "campaign state did not serialize to an object".to_string(),
            )),
        }
    }

    /// Serialize the document as compact JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize the document as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Shallow-merge `overlay` over this document and return the result.
    ///
    /// Fails without side effects if the merged document does not fit the
    /// model (for example `"characters": 5`).
    pub fn merged_with(&self, overlay: Map<String, Value>) -> CoreResult<Self> {
        let mut doc = self.to_document()?;
        for (key, value) in overlay {
            doc.insert(key, value);
        }
        let mut merged: Self = serde_json::from_value(Value::Object(doc))?;
        merged.initiative.normalize();
        Ok(merged)
    }

    /// Parse `json` and shallow-merge it over this document.
    ///
    /// The top-level value must be a JSON object.
    pub fn merged_with_json(&self, json: &str) -> CoreResult<Self> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(overlay) => self.merged_with(overlay),
            other => Err(CoreError::InvalidDocument(format!(
                "expected a JSON object at the top level, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
