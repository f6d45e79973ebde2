//! In-process audit recorder.
//!
//! Open transactions live behind a mutex; lines get monotonic sequence
//! numbers as they are appended. `finalize` sets the terminal status and
//! completion time, hands the snapshot to the JSONL sink, and drops the
//! transaction from the open set — further appends are rejected.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use relay_core::audit::{AuditLine, AuditTransaction};
use relay_core::enums::{AuditLineType, TransactionKind, TransactionStatus};
use relay_core::ids::{self, PREFIX_TRANSACTION};

use crate::error::AuditError;
use crate::sink::JsonlSink;

/// What a new transaction is recording for whom.
#[derive(Debug, Clone)]
pub struct TransactionContext {
    pub correlation_id: String,
    pub organization_id: String,
    pub kind: TransactionKind,
}

/// Append-only recorder of audit transactions.
pub struct AuditRecorder {
    open: Mutex<HashMap<String, AuditTransaction>>,
    finalized: Mutex<Vec<AuditTransaction>>,
    sink: JsonlSink,
}

impl Default for AuditRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditRecorder {
    /// In-memory-only recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(JsonlSink::disabled())
    }

    /// Recorder that persists finalized transactions through `sink`.
    #[must_use]
    pub fn with_sink(sink: JsonlSink) -> Self {
        Self {
            open: Mutex::new(HashMap::new()),
            finalized: Mutex::new(Vec::new()),
            sink,
        }
    }

    /// Open a new pending transaction. Returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError`] if ID generation fails or the state lock is
    /// poisoned.
    pub fn start(&self, ctx: &TransactionContext) -> Result<String, AuditError> {
        let id = ids::new_id(PREFIX_TRANSACTION)?;
        let txn = AuditTransaction {
            id: id.clone(),
            correlation_id: ctx.correlation_id.clone(),
            organization_id: ctx.organization_id.clone(),
            kind: ctx.kind,
            status: TransactionStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
            lines: Vec::new(),
        };
        self.open
            .lock()
            .map_err(|_| AuditError::Poisoned)?
            .insert(id.clone(), txn);
        Ok(id)
    }

    /// Append a line to an open transaction. Returns its sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::AlreadyFinalized`] for a finalized
    /// transaction, [`AuditError::UnknownTransaction`] for one that was
    /// never started.
    pub fn append_line(
        &self,
        txn_id: &str,
        line_type: AuditLineType,
        payload: serde_json::Value,
    ) -> Result<u32, AuditError> {
        let mut open = self.open.lock().map_err(|_| AuditError::Poisoned)?;
        let Some(txn) = open.get_mut(txn_id) else {
            drop(open);
            return Err(self.missing(txn_id));
        };
        let sequence_number = u32::try_from(txn.lines.len()).unwrap_or(u32::MAX) + 1;
        txn.lines.push(AuditLine {
            line_type,
            sequence_number,
            payload,
            timestamp: Utc::now(),
        });
        Ok(sequence_number)
    }

    /// Finalize a transaction with a terminal status.
    ///
    /// The transaction becomes immutable, is handed to the sink, and a
    /// snapshot is returned. A failed sink write still leaves the
    /// transaction in the finalized set: the in-memory trail survives a
    /// persistence outage.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::NotTerminal`] for a `Pending` outcome,
    /// [`AuditError::AlreadyFinalized`] for a second finalization,
    /// [`AuditError::UnknownTransaction`] for a transaction that was never
    /// started, or [`AuditError::Persist`] if the sink write fails.
    pub fn finalize(
        &self,
        txn_id: &str,
        outcome: TransactionStatus,
    ) -> Result<AuditTransaction, AuditError> {
        if !outcome.is_terminal() {
            return Err(AuditError::NotTerminal(outcome));
        }
        let mut open = self.open.lock().map_err(|_| AuditError::Poisoned)?;
        let Some(mut txn) = open.remove(txn_id) else {
            drop(open);
            return Err(self.missing(txn_id));
        };
        drop(open);
        txn.status = outcome;
        txn.completed_at = Some(Utc::now());
        self.finalized
            .lock()
            .map_err(|_| AuditError::Poisoned)?
            .push(txn.clone());
        self.sink.append(&txn)?;
        Ok(txn)
    }

    /// Distinguish a finalized transaction from one that never existed.
    fn missing(&self, txn_id: &str) -> AuditError {
        let finalized = self
            .finalized
            .lock()
            .map(|f| f.iter().any(|t| t.id == txn_id))
            .unwrap_or(false);
        if finalized {
            AuditError::AlreadyFinalized(txn_id.to_string())
        } else {
            AuditError::UnknownTransaction(txn_id.to_string())
        }
    }

    /// Snapshot of a transaction, open or finalized.
    #[must_use]
    pub fn transaction(&self, txn_id: &str) -> Option<AuditTransaction> {
        if let Ok(open) = self.open.lock() {
            if let Some(txn) = open.get(txn_id) {
                return Some(txn.clone());
            }
        }
        self.finalized
            .lock()
            .ok()?
            .iter()
            .find(|t| t.id == txn_id)
            .cloned()
    }

    /// All finalized transactions, in finalization order.
    #[must_use]
    pub fn finalized(&self) -> Vec<AuditTransaction> {
        self.finalized.lock().map(|f| f.clone()).unwrap_or_default()
    }
}
