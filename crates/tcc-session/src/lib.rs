//! Campaign session controller for Tabletop Control Center.
//!
//! Owns one [`tcc_core::CampaignState`], flushes it to a [`KeyValueStore`]
//! after every change, and turns text lines or structured [`Command`]s into
//! state changes. Destructive commands wait for a confirmation line.

pub mod command;
pub mod config;
pub mod error;
pub mod persistence;
pub mod session;
pub mod store;

pub use command::Command;
pub use config::{DEFAULT_STORAGE_KEY, SessionConfig};
pub use error::{SessionError, SessionResult, StoreError, StoreResult};
pub use persistence::{ExportedDocument, export_document, load_state, save_state};
pub use session::CampaignSession;
pub use store::{FileStore, KeyValueStore, MemoryStore};
