use serde::{Deserialize, Serialize};

/// Default subscription window: 30 days in milliseconds.
pub const DEFAULT_SUBSCRIPTION_WINDOW_MILLIS: u64 = 30 * 24 * 60 * 60 * 1_000;

/// Configuration for the Agora engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Length of the active window opened by each subscription purchase.
    pub subscription_window_millis: u64,
    /// Display name assigned to newly registered accounts.
    pub default_display_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            subscription_window_millis: DEFAULT_SUBSCRIPTION_WINDOW_MILLIS,
            default_display_name: "new user".to_string(),
        }
    }
}
