//! Persistence collaborator traits.
//!
//! Persistence itself is out of scope for the sync engine — downstream
//! owners implement these traits. In-memory reference implementations are
//! provided for tests and offline demos.
//!
//! Callers must serialize sync runs per `(organization, vendor)`; the
//! adapter assumes at-most-one-concurrent-sync-per-feed and does not
//! enforce it internally.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use relay_core::entities::{CanonicalEntity, SyncCursor};

use crate::error::SyncError;

/// What an upsert did with a canonical entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// First time this `entity_code` was seen for the organization.
    Created,
    /// Existing record replaced because the vendor's `changed_at` advanced.
    Updated,
    /// Existing record untouched: `changed_at` had not advanced.
    Skipped,
}

/// Downstream store of canonical entities, upserted by `entity_code`.
pub trait EntityStore: Send + Sync {
    /// Insert or update one canonical entity.
    ///
    /// Idempotent: the same record twice is an update/skip, never a
    /// duplicate. The sync process never deletes — cancellation arrives as
    /// a status.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] if persistence rejects the record.
    fn upsert(&self, entity: &CanonicalEntity) -> Result<UpsertOutcome, SyncError>;
}

/// Watermark store, keyed per organization+vendor.
pub trait CursorStore: Send + Sync {
    /// Load the current cursor, `SyncCursor::default()` if none committed.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] on a read failure.
    fn load(&self, organization_id: &str, vendor: &str) -> Result<SyncCursor, SyncError>;

    /// Commit a new cursor. Implementations must refuse regression.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] on a write failure.
    fn commit(
        &self,
        organization_id: &str,
        vendor: &str,
        cursor: SyncCursor,
    ) -> Result<(), SyncError>;
}

/// In-memory entity store for tests and demos.
#[derive(Default)]
pub struct InMemoryEntityStore {
    entities: Mutex<BTreeMap<(String, String), CanonicalEntity>>,
}

impl InMemoryEntityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch one entity by organization and code.
    #[must_use]
    pub fn get(&self, organization_id: &str, entity_code: &str) -> Option<CanonicalEntity> {
        self.entities
            .lock()
            .ok()?
            .get(&(organization_id.to_string(), entity_code.to_string()))
            .cloned()
    }

    /// All entity codes currently stored, sorted.
    #[must_use]
    pub fn codes(&self) -> Vec<String> {
        self.entities
            .lock()
            .map(|m| m.keys().map(|(_, code)| code.clone()).collect())
            .unwrap_or_default()
    }

    /// Number of stored entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.lock().map(|m| m.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EntityStore for InMemoryEntityStore {
    fn upsert(&self, entity: &CanonicalEntity) -> Result<UpsertOutcome, SyncError> {
        let mut entities = self
            .entities
            .lock()
            .map_err(|_| SyncError::Store("entity store lock poisoned".into()))?;
        let key = (entity.organization_id.clone(), entity.entity_code.clone());
        match entities.get(&key) {
            None => {
                entities.insert(key, entity.clone());
                Ok(UpsertOutcome::Created)
            }
            Some(existing) if entity.changed_at > existing.changed_at => {
                entities.insert(key, entity.clone());
                Ok(UpsertOutcome::Updated)
            }
            Some(_) => Ok(UpsertOutcome::Skipped),
        }
    }
}

/// In-memory cursor store for tests and demos.
#[derive(Default)]
pub struct InMemoryCursorStore {
    cursors: Mutex<HashMap<(String, String), SyncCursor>>,
}

impl InMemoryCursorStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CursorStore for InMemoryCursorStore {
    fn load(&self, organization_id: &str, vendor: &str) -> Result<SyncCursor, SyncError> {
        Ok(self
            .cursors
            .lock()
            .map_err(|_| SyncError::Store("cursor store lock poisoned".into()))?
            .get(&(organization_id.to_string(), vendor.to_string()))
            .copied()
            .unwrap_or_default())
    }

    fn commit(
        &self,
        organization_id: &str,
        vendor: &str,
        cursor: SyncCursor,
    ) -> Result<(), SyncError> {
        let mut cursors = self
            .cursors
            .lock()
            .map_err(|_| SyncError::Store("cursor store lock poisoned".into()))?;
        let key = (organization_id.to_string(), vendor.to_string());
        let current = cursors.get(&key).copied().unwrap_or_default();
        // Monotonic: a stale run cannot move the watermark backwards.
        if cursor.last_changed_at >= current.last_changed_at {
            cursors.insert(key, cursor);
        }
        Ok(())
    }
}
