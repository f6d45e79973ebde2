//! Vendor API configuration (Eventbrite feed).

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "https://www.eventbriteapi.com/v3".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VendorConfig {
    /// Vendor API base URL. Overridable for test servers.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Private API token. Empty means not configured.
    #[serde(default)]
    pub token: String,

    /// Serve fixture pages instead of calling the vendor.
    #[serde(default)]
    pub demo_mode: bool,
}

impl VendorConfig {
    /// A pull can run with either a real token or demo mode.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.demo_mode || !self.token.is_empty()
    }
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: String::new(),
            demo_mode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_without_token_or_demo() {
        let config = VendorConfig::default();
        assert!(!config.is_configured());
    }

    #[test]
    fn demo_mode_counts_as_configured() {
        let config = VendorConfig {
            demo_mode: true,
            ..VendorConfig::default()
        };
        assert!(config.is_configured());
    }
}
