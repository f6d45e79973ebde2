//! # relay-audit
//!
//! Append-only audit recorder for Relay units of work.
//!
//! Every vendor-sync run and every inbound message owns one
//! `AuditTransaction`; every externally observable action along the way
//! (provider selected, tool called, message sent, guardrail blocked, error
//! encountered) is appended as an ordered `AuditLine`. Lines are never
//! edited or reordered; a finalized transaction is immutable. The trail is
//! sufficient to reconstruct what happened and why without re-running the
//! logic.
//!
//! Finalized transactions can optionally be persisted to per-organization
//! JSONL files via [`JsonlSink`].

mod error;
mod recorder;
mod sink;

pub use error::AuditError;
pub use recorder::{AuditRecorder, TransactionContext};
pub use sink::JsonlSink;
