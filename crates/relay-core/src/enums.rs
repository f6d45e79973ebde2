//! Status enums, entity kinds, failure classes, and audit line types.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Mapping from vendor-native values into these enums happens behind the
//! adapter's normalization boundary with explicit match tables.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Kind discriminant of a canonical entity. One fixed value per vendor feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Event,
    EventInvite,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::EventInvite => "event_invite",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CanonicalStatus
// ---------------------------------------------------------------------------

/// Canonical lifecycle status across all vendor feeds.
///
/// Events use `draft | live | completed | cancelled`; invites use
/// `registered | attended | declined | cancelled`. Cancellation is a
/// status, never a deletion — the sync process does not remove records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalStatus {
    Draft,
    Live,
    Completed,
    Cancelled,
    Registered,
    Attended,
    Declined,
}

impl CanonicalStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Live => "live",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Registered => "registered",
            Self::Attended => "attended",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for CanonicalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FailureClass
// ---------------------------------------------------------------------------

/// Classified provider failure. Rotation to the next provider happens only
/// when the class appears in the failing provider's `fallback_on` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    Timeout,
    ServerError,
    RateLimited,
    GuardrailViolation,
}

impl FailureClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::ServerError => "server_error",
            Self::RateLimited => "rate_limited",
            Self::GuardrailViolation => "guardrail_violation",
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CostTier
// ---------------------------------------------------------------------------

/// Relative cost class of a provider. `Free` providers are exempt from
/// guardrail blocking and terminate every fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CostTier {
    Free,
    Low,
    Medium,
    High,
}

impl CostTier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for CostTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TransactionKind
// ---------------------------------------------------------------------------

/// What kind of unit of work an audit transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    VendorSync,
    InboundMessage,
}

impl TransactionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VendorSync => "vendor_sync",
            Self::InboundMessage => "inbound_message",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TransactionStatus
// ---------------------------------------------------------------------------

/// Terminal and in-flight states of an audit transaction.
///
/// ```text
/// pending → success
///         → partial
///         → failed
///         → no_config
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Success,
    Partial,
    Failed,
    NoConfig,
}

impl TransactionStatus {
    /// Whether this status is terminal. A finalized transaction is immutable.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failed => "failed",
            Self::NoConfig => "no_config",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditLineType
// ---------------------------------------------------------------------------

/// Discriminant of a single audit line. Every externally observable action
/// has a corresponding line type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditLineType {
    SyncStarted,
    PageFetched,
    RecordCommitted,
    RecordError,
    SyncFinalized,
    MessageReceived,
    GuardrailCheck,
    ProviderSelected,
    ProviderSucceeded,
    ProviderFailed,
    ToolCalled,
    NoToolsMapped,
    MessageSent,
    Error,
}

impl AuditLineType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SyncStarted => "sync_started",
            Self::PageFetched => "page_fetched",
            Self::RecordCommitted => "record_committed",
            Self::RecordError => "record_error",
            Self::SyncFinalized => "sync_finalized",
            Self::MessageReceived => "message_received",
            Self::GuardrailCheck => "guardrail_check",
            Self::ProviderSelected => "provider_selected",
            Self::ProviderSucceeded => "provider_succeeded",
            Self::ProviderFailed => "provider_failed",
            Self::ToolCalled => "tool_called",
            Self::NoToolsMapped => "no_tools_mapped",
            Self::MessageSent => "message_sent",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for AuditLineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
