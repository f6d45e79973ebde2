//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default per-organization config cache TTL in seconds.
const fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Fallback BCP 47 language tag when an organization has no channel
    /// config.
    #[serde(default = "default_language")]
    pub default_language: String,

    /// How long a loaded per-organization config document stays cached.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}
