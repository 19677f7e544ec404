//! Configuration for a campaign session.

/// Store key the campaign document lives under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "tcc_campaign_data_v1";

/// Configuration for a campaign session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Key of the store entry holding the campaign document.
    pub storage_key: String,
    /// RNG seed for reproducible dice. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the store key. Blank keys are ignored.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !key.trim().is_empty() {
            self.storage_key = key;
        }
        self
    }
}
