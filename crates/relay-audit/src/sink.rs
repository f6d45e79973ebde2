//! JSONL persistence for finalized audit transactions.
//!
//! Appends each finalized `AuditTransaction` to
//! `{dir}/{organization_id}.jsonl` using `serde_jsonlines` for atomic
//! per-line appends.

use std::path::{Path, PathBuf};

use relay_core::audit::AuditTransaction;

use crate::error::AuditError;

/// Appends finalized transactions to per-organization JSONL files.
pub struct JsonlSink {
    dir: PathBuf,
    enabled: bool,
}

impl JsonlSink {
    /// Create a sink pointing at the given directory.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Persist`] if the directory cannot be created.
    pub fn new(dir: PathBuf) -> Result<Self, AuditError> {
        std::fs::create_dir_all(&dir).map_err(|e| AuditError::Persist(e.to_string()))?;
        Ok(Self { dir, enabled: true })
    }

    /// Create a disabled sink (in-memory-only recording).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            dir: PathBuf::new(),
            enabled: false,
        }
    }

    /// Whether persistence is active.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append one finalized transaction to its organization's file.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Persist`] if the file write fails.
    pub fn append(&self, txn: &AuditTransaction) -> Result<(), AuditError> {
        if !self.enabled {
            return Ok(());
        }
        let path = self.dir.join(format!("{}.jsonl", txn.organization_id));
        serde_jsonlines::append_json_lines(&path, [txn])
            .map_err(|e| AuditError::Persist(e.to_string()))?;
        Ok(())
    }

    /// The directory transactions are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
