//! Time-expiring read cache for per-organization config documents.
//!
//! The cache is explicit and owned by the loader, never a hidden
//! module-level singleton. It is safe to recompute from the source at any
//! time and is never a source of truth: writers must call
//! [`TtlCache::invalidate`] after changing the underlying document.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::ConfigError;
use crate::source::ConfigKind;

type Key = (String, ConfigKind);

/// Bounded-lifetime cache of raw config documents.
pub struct TtlCache {
    entries: Mutex<HashMap<Key, (Instant, serde_json::Value)>>,
    ttl: Duration,
}

impl TtlCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Fresh cached document, or `None` on a miss or an expired entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Poisoned`] if the lock is poisoned.
    pub fn get(
        &self,
        organization_id: &str,
        kind: ConfigKind,
    ) -> Result<Option<serde_json::Value>, ConfigError> {
        let mut entries = self.entries.lock().map_err(|_| ConfigError::Poisoned)?;
        let key = (organization_id.to_string(), kind);
        match entries.get(&key) {
            Some((stored_at, value)) if stored_at.elapsed() < self.ttl => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(&key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Store a freshly loaded document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Poisoned`] if the lock is poisoned.
    pub fn insert(
        &self,
        organization_id: &str,
        kind: ConfigKind,
        value: serde_json::Value,
    ) -> Result<(), ConfigError> {
        self.entries
            .lock()
            .map_err(|_| ConfigError::Poisoned)?
            .insert((organization_id.to_string(), kind), (Instant::now(), value));
        Ok(())
    }

    /// Drop one cached document. Called by writers after a change.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Poisoned`] if the lock is poisoned.
    pub fn invalidate(&self, organization_id: &str, kind: ConfigKind) -> Result<(), ConfigError> {
        self.entries
            .lock()
            .map_err(|_| ConfigError::Poisoned)?
            .remove(&(organization_id.to_string(), kind));
        Ok(())
    }

    /// Drop everything.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Poisoned`] if the lock is poisoned.
    pub fn clear(&self) -> Result<(), ConfigError> {
        self.entries
            .lock()
            .map_err(|_| ConfigError::Poisoned)?
            .clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hit_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache
            .insert("org-1", ConfigKind::ToolMap, serde_json::json!({"a": 1}))
            .unwrap();
        assert_eq!(
            cache.get("org-1", ConfigKind::ToolMap).unwrap(),
            Some(serde_json::json!({"a": 1}))
        );
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let cache = TtlCache::new(Duration::ZERO);
        cache
            .insert("org-1", ConfigKind::ToolMap, serde_json::json!({}))
            .unwrap();
        assert_eq!(cache.get("org-1", ConfigKind::ToolMap).unwrap(), None);
    }

    #[test]
    fn invalidate_drops_only_the_named_entry() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache
            .insert("org-1", ConfigKind::ToolMap, serde_json::json!(1))
            .unwrap();
        cache
            .insert("org-1", ConfigKind::PromptPack, serde_json::json!(2))
            .unwrap();
        cache.invalidate("org-1", ConfigKind::ToolMap).unwrap();
        assert_eq!(cache.get("org-1", ConfigKind::ToolMap).unwrap(), None);
        assert_eq!(
            cache.get("org-1", ConfigKind::PromptPack).unwrap(),
            Some(serde_json::json!(2))
        );
    }

    #[test]
    fn keys_are_per_organization() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache
            .insert("org-1", ConfigKind::Channel, serde_json::json!("a"))
            .unwrap();
        assert_eq!(cache.get("org-2", ConfigKind::Channel).unwrap(), None);
    }
}
