//! Incremental-sync watermark.
//!
//! One cursor exists per organization+vendor+feed. It only advances, never
//! regresses, including on partial failure. The advancement policy:
//! on a clean run the cursor moves to the max observed `changed_at`; when
//! any record failed, it holds at the earliest failed record's `changed_at`
//! so that record is included in the next incremental pull. The pull filter
//! is inclusive (`>=`), which is safe because commits are idempotent
//! upserts by `entity_code`.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-organization-per-vendor-per-feed watermark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SyncCursor {
    /// Max `changed_at` observed across the most recent successful pull.
    /// `None` means no pull has completed yet (full pull next time).
    pub last_changed_at: Option<DateTime<Utc>>,
}

impl SyncCursor {
    /// Compute the cursor a finished run should commit.
    ///
    /// `succeeded` and `failed` are the `changed_at` timestamps of records
    /// that committed and records that errored, respectively. The result is
    /// monotonic: it never falls below `self`.
    #[must_use]
    pub fn advanced(
        self,
        succeeded: &[DateTime<Utc>],
        failed: &[DateTime<Utc>],
    ) -> Self {
        let candidate = if failed.is_empty() {
            succeeded.iter().max().copied()
        } else {
            // Hold at the earliest failure so the record is retried.
            failed.iter().min().copied()
        };
        let last_changed_at = match (self.last_changed_at, candidate) {
            (Some(current), Some(new)) => Some(current.max(new)),
            (current, None) => current,
            (None, new) => new,
        };
        Self { last_changed_at }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn clean_run_advances_to_max_success() {
        let cursor = SyncCursor::default();
        let next = cursor.advanced(
            &[ts("2026-03-01T10:00:00Z"), ts("2026-03-02T09:00:00Z")],
            &[],
        );
        assert_eq!(next.last_changed_at, Some(ts("2026-03-02T09:00:00Z")));
    }

    #[test]
    fn partial_failure_holds_at_earliest_failure() {
        let cursor = SyncCursor {
            last_changed_at: Some(ts("2026-02-01T00:00:00Z")),
        };
        let next = cursor.advanced(
            &[ts("2026-03-05T00:00:00Z")],
            &[ts("2026-03-03T00:00:00Z"), ts("2026-03-04T00:00:00Z")],
        );
        assert_eq!(next.last_changed_at, Some(ts("2026-03-03T00:00:00Z")));
    }

    #[test]
    fn never_regresses_below_current() {
        let cursor = SyncCursor {
            last_changed_at: Some(ts("2026-06-01T00:00:00Z")),
        };
        let next = cursor.advanced(&[ts("2026-05-01T00:00:00Z")], &[ts("2026-04-01T00:00:00Z")]);
        assert_eq!(next.last_changed_at, Some(ts("2026-06-01T00:00:00Z")));
    }

    #[test]
    fn empty_run_is_a_noop() {
        let cursor = SyncCursor {
            last_changed_at: Some(ts("2026-06-01T00:00:00Z")),
        };
        assert_eq!(cursor.advanced(&[], &[]), cursor);
    }
}
