//! Audit trail persistence configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrailConfig {
    /// Directory for per-organization JSONL trail files. Unset disables
    /// persistence (transactions stay in memory only).
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl TrailConfig {
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }
}
