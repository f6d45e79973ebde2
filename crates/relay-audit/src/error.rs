//! Audit recorder error types.

use relay_core::enums::TransactionStatus;
use thiserror::Error;

/// Errors from the audit recorder.
#[derive(Debug, Error)]
pub enum AuditError {
    /// No transaction with this id is open.
    #[error("unknown audit transaction: {0}")]
    UnknownTransaction(String),

    /// Append or finalize attempted on a finalized transaction.
    #[error("audit transaction {0} is already finalized")]
    AlreadyFinalized(String),

    /// `finalize` requires a terminal status.
    #[error("cannot finalize with non-terminal status '{0}'")]
    NotTerminal(TransactionStatus),

    /// ID generation failed.
    #[error(transparent)]
    Core(#[from] relay_core::errors::CoreError),

    /// JSONL sink write failed.
    #[error("audit persistence failed: {0}")]
    Persist(String),

    /// Recorder state lock poisoned by a panicking writer.
    #[error("audit state lock poisoned")]
    Poisoned,
}
