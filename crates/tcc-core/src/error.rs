/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when manipulating a campaign document.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A record was given an empty (or whitespace-only) name.
    #[error("{0} name cannot be empty")]
    EmptyName(&'static str),

    /// The initiative tracker has no combatants to act.
    #[error("no combatants to advance")]
    NoCombatants,

    /// A document did not have the shape of a campaign document.
    #[error("invalid campaign document: {0}")]
    InvalidDocument(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
