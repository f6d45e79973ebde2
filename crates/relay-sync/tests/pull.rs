//! End-to-end pull runs over the deterministic fixture feed.
//!
//! Demo mode replaces only the network fetch; normalization, validation,
//! commit, cursor, and audit behavior under test here are the live path.

use pretty_assertions::assert_eq;
use relay_audit::AuditRecorder;
use relay_core::entities::{CanonicalEntity, SyncCursor};
use relay_core::enums::{AuditLineType, TransactionKind, TransactionStatus};
use relay_schema::ContractRegistry;
use relay_sync::eventbrite::EventbriteAdapter;
use relay_sync::store::{EntityStore, InMemoryEntityStore, UpsertOutcome};
use relay_sync::{Credentials, PullRequest, SyncError};

fn request(organization_id: &str) -> PullRequest {
    PullRequest {
        organization_id: organization_id.to_string(),
        credentials: Credentials {
            token: "demo-token".into(),
        },
        since: SyncCursor::default(),
        demo_mode: true,
    }
}

fn contracts() -> ContractRegistry {
    ContractRegistry::new().unwrap()
}

#[tokio::test]
async fn demo_pull_commits_every_fixture_record() {
    let adapter = EventbriteAdapter::new();
    let store = InMemoryEntityStore::new();
    let recorder = AuditRecorder::new();

    let result = adapter
        .pull(&request("org-1"), &store, &contracts(), &recorder)
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.stats.processed, 5);
    assert_eq!(result.stats.created, 5);
    assert_eq!(result.stats.errors, 0);
    assert!(result.partial_errors.is_empty());

    let mut codes = store.codes();
    codes.sort();
    assert_eq!(
        codes,
        vec!["EVB-5001", "EVB-5002", "EVB-5003", "EVB-9001", "EVB-9002"]
    );

    // Cursor lands on the max changed_at across the whole run.
    assert_eq!(
        result.cursor.last_changed_at,
        Some("2026-03-12T15:45:00Z".parse().unwrap())
    );
}

#[tokio::test]
async fn repeated_pull_is_idempotent() {
    let adapter = EventbriteAdapter::new();
    let store = InMemoryEntityStore::new();
    let recorder = AuditRecorder::new();
    let registry = contracts();
    let req = request("org-1");

    let first = adapter.pull(&req, &store, &registry, &recorder).await.unwrap();
    let second = adapter.pull(&req, &store, &registry, &recorder).await.unwrap();

    assert_eq!(first.stats.created, 5);
    // Nothing changed upstream, so the second run creates nothing and
    // leaves every record untouched.
    assert_eq!(second.stats.created, 0);
    assert_eq!(second.stats.updated, 0);
    assert_eq!(second.stats.skipped, 5);
    assert_eq!(store.len(), 5);
}

#[tokio::test]
async fn pull_records_a_complete_audit_transaction() {
    let adapter = EventbriteAdapter::new();
    let store = InMemoryEntityStore::new();
    let recorder = AuditRecorder::new();

    let result = adapter
        .pull(&request("org-7"), &store, &contracts(), &recorder)
        .await
        .unwrap();

    let txn = recorder.transaction(&result.transaction_id).unwrap();
    assert_eq!(txn.organization_id, "org-7");
    assert_eq!(txn.kind, TransactionKind::VendorSync);
    assert_eq!(txn.status, TransactionStatus::Success);
    assert!(txn.completed_at.is_some());

    let first = txn.lines.first().unwrap();
    let last = txn.lines.last().unwrap();
    assert_eq!(first.line_type, AuditLineType::SyncStarted);
    assert_eq!(last.line_type, AuditLineType::SyncFinalized);
    assert!(
        first.payload["run_id"]
            .as_str()
            .unwrap()
            .starts_with("syn-")
    );

    // Both feeds leave page lines: two event pages, one attendee page per
    // event.
    let pages: Vec<&str> = txn
        .lines
        .iter()
        .filter(|l| l.line_type == AuditLineType::PageFetched)
        .map(|l| l.payload["feed"].as_str().unwrap())
        .collect();
    assert_eq!(pages.iter().filter(|f| **f == "events").count(), 2);
    assert_eq!(pages.iter().filter(|f| **f == "attendees").count(), 3);

    let committed: Vec<&serde_json::Value> = txn
        .lines
        .iter()
        .filter(|l| l.line_type == AuditLineType::RecordCommitted)
        .map(|l| &l.payload)
        .collect();
    assert_eq!(committed.len(), 5);
    assert!(
        committed
            .iter()
            .any(|p| p["idempotency_key"] == "org-7:EVB:event:5001:upsert")
    );

    let sequences: Vec<u32> = txn.lines.iter().map(|l| l.sequence_number).collect();
    let mut expected: Vec<u32> = (1..=u32::try_from(txn.lines.len()).unwrap()).collect();
    expected.sort_unstable();
    assert_eq!(sequences, expected);
}

/// Store that rejects one entity code, to force an isolated commit failure.
struct RejectingStore {
    inner: InMemoryEntityStore,
    reject_code: String,
}

impl EntityStore for RejectingStore {
    fn upsert(&self, entity: &CanonicalEntity) -> Result<UpsertOutcome, SyncError> {
        if entity.entity_code == self.reject_code {
            return Err(SyncError::Store("simulated write failure".into()));
        }
        self.inner.upsert(entity)
    }
}

#[tokio::test]
async fn one_bad_record_does_not_abort_the_run() {
    let adapter = EventbriteAdapter::new();
    let store = RejectingStore {
        inner: InMemoryEntityStore::new(),
        reject_code: "EVB-5002".into(),
    };
    let recorder = AuditRecorder::new();

    let result = adapter
        .pull(&request("org-1"), &store, &contracts(), &recorder)
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.stats.processed, 5);
    assert_eq!(result.stats.created, 4);
    assert_eq!(result.stats.errors, 1);
    assert_eq!(result.partial_errors.len(), 1);
    assert_eq!(result.partial_errors[0].provider_id, "5002");

    // The failed record's changed_at pins the cursor so the next pull
    // picks it up again.
    assert_eq!(
        result.cursor.last_changed_at,
        Some("2026-03-11T12:00:00Z".parse().unwrap())
    );

    let txn = recorder.transaction(&result.transaction_id).unwrap();
    assert_eq!(txn.status, TransactionStatus::Partial);
    assert!(
        txn.lines
            .iter()
            .any(|l| l.line_type == AuditLineType::RecordError)
    );
}

/// Store that rejects everything.
struct BrokenStore;

impl EntityStore for BrokenStore {
    fn upsert(&self, _entity: &CanonicalEntity) -> Result<UpsertOutcome, SyncError> {
        Err(SyncError::Store("backend down".into()))
    }
}

#[tokio::test]
async fn run_where_every_record_fails_finalizes_as_failed() {
    let adapter = EventbriteAdapter::new();
    let recorder = AuditRecorder::new();

    let result = adapter
        .pull(&request("org-1"), &BrokenStore, &contracts(), &recorder)
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.stats.errors, result.stats.processed);

    let txn = recorder.transaction(&result.transaction_id).unwrap();
    assert_eq!(txn.status, TransactionStatus::Failed);
}
