//! Error types for the session layer.

use std::path::PathBuf;

use thiserror::Error;

use tcc_core::CoreError;
use tcc_mechanics::MechError;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type for key-value store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a user can see while driving a session. None of them are fatal.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A field that must be an integer was not.
    #[error("{field} must be a number, got \"{value}\"")]
    InvalidNumber {
        /// Which input was wrong.
        field: &'static str,
        /// What was entered.
        value: String,
    },

    /// A required argument was missing.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// Unknown ability key.
    #[error("unknown ability: {0} (use str, dex, con, int, wis, cha)")]
    UnknownAbility(String),

    /// Unknown character text field.
    #[error("unknown field: {0} (use spells, inventory, notes)")]
    UnknownTextField(String),

    /// Unknown notes field.
    #[error("unknown notes: {0} (use session, world, rules)")]
    UnknownNoteKind(String),

    /// Unknown command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// An imported document was rejected; the current state is unchanged.
    #[error("import failed: {0}")]
    Import(#[source] CoreError),

    /// Reading or writing an import/export file failed.
    #[error("{}: {source}", .path.display())]
    File {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Model-level rejection (empty names, empty initiative list).
    #[error("{0}")]
    Core(#[from] CoreError),

    /// Dice error.
    #[error("{0}")]
    Dice(#[from] MechError),
}

/// Failures of a [`crate::KeyValueStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("storage file {}: {source}", .path.display())]
    Io {
        /// Backing file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The store contents could not be encoded or decoded.
    #[error("storage data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The store refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
