//! # relay-sync
//!
//! Vendor synchronization engine: pull-based incremental sync from an
//! external vendor API into canonical entities.
//!
//! The engine owns fetching, pagination, rate-limit handling, retry,
//! normalization, contract validation, and cursor advancement. It does
//! not own persistence — callers supply [`store::EntityStore`] and
//! [`store::CursorStore`] implementations.
//!
//! Entry point: [`eventbrite::EventbriteAdapter::pull`].

pub mod error;
pub mod eventbrite;
mod http;
pub mod retry;
pub mod store;

use serde::{Deserialize, Serialize};

use relay_core::entities::SyncCursor;
use relay_core::enums::EntityKind;

pub use error::SyncError;
pub use retry::RetryConfig;

/// Vendor API credentials for one organization's feed.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Bearer token for the vendor API.
    pub token: String,
}

/// One sync run request.
#[derive(Debug, Clone)]
pub struct PullRequest {
    pub organization_id: String,
    pub credentials: Credentials,
    /// Incoming watermark; only records changed after it are expected.
    pub since: SyncCursor,
    /// Serve deterministic fixture pages instead of calling the vendor.
    /// Everything downstream of the fetch is the live path.
    pub demo_mode: bool,
}

/// Per-run record counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStats {
    /// Records seen, whether or not they committed.
    pub processed: u32,
    pub created: u32,
    pub updated: u32,
    /// Upserts that changed nothing because `changed_at` had not advanced.
    pub skipped: u32,
    pub errors: u32,
}

/// One isolated per-record failure from a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordError {
    pub record_kind: EntityKind,
    /// The vendor's identifier for the failed record.
    pub provider_id: String,
    pub message: String,
}

/// Outcome of a completed sync run.
#[derive(Debug, Clone)]
pub struct SyncResult {
    /// True only when every processed record committed.
    pub success: bool,
    pub stats: SyncStats,
    /// The cursor the caller should commit for the next run.
    pub cursor: SyncCursor,
    pub partial_errors: Vec<RecordError>,
    /// Audit transaction covering this run.
    pub transaction_id: String,
}

/// Result of a credential probe against the vendor API.
#[derive(Debug, Clone)]
pub struct ConnectionCheck {
    pub success: bool,
    pub message: String,
}
