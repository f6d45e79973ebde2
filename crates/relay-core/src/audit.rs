//! Audit transaction/line envelope.
//!
//! One [`AuditTransaction`] records one inbound unit of work — a vendor
//! sync run or one inbound message. Its lines are append-only and ordered
//! by `sequence_number`; a finalized transaction is immutable. The trail
//! must be sufficient to reconstruct exactly what happened and why without
//! re-running the logic.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AuditLineType, TransactionKind, TransactionStatus};

/// One inbound unit of work.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AuditTransaction {
    pub id: String,
    /// Links this transaction to everything the triggering request caused.
    pub correlation_id: String,
    pub organization_id: String,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    /// Set exactly once, at finalization.
    pub completed_at: Option<DateTime<Utc>>,
    /// Ordered, append-only decision history.
    pub lines: Vec<AuditLine>,
}

/// One appended decision record. Never edited or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AuditLine {
    pub line_type: AuditLineType,
    /// Monotonic within the owning transaction, starting at 1.
    pub sequence_number: u32,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn transaction_roundtrip() {
        let txn = AuditTransaction {
            id: "txn-deadbeef".into(),
            correlation_id: "cor-a1b2c3d4".into(),
            organization_id: "org-1".into(),
            kind: TransactionKind::InboundMessage,
            status: TransactionStatus::Success,
            created_at: "2026-03-01T10:00:00Z".parse().unwrap(),
            completed_at: Some("2026-03-01T10:00:02Z".parse().unwrap()),
            lines: vec![AuditLine {
                line_type: AuditLineType::MessageReceived,
                sequence_number: 1,
                payload: serde_json::json!({"text": "hi"}),
                timestamp: "2026-03-01T10:00:00Z".parse().unwrap(),
            }],
        };
        let json = serde_json::to_string(&txn).unwrap();
        let back: AuditTransaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, txn);
    }
}
