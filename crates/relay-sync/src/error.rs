//! Sync adapter error types.

use thiserror::Error;

/// Errors that can occur during a vendor sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// HTTP transport error (connect failure, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Vendor returned 429 Too Many Requests. Transient: retried with the
    /// advertised `Retry-After` delay up to the attempt cap.
    #[error("rate limited — retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Vendor returned a non-2xx status other than 429. Permanent: never
    /// retried.
    #[error("vendor API error ({status}): {message}")]
    VendorPermanent {
        /// HTTP status code returned by the vendor.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// A transient failure persisted past the retry cap and escalated.
    #[error("vendor fetch failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<SyncError>,
    },

    /// A vendor-native status value has no entry in the canonical mapping
    /// table. Deliberately loud: vendor API drift must not silently
    /// mis-map records.
    #[error("unmapped vendor status '{status}' for {record_kind}")]
    UnmappedStatus {
        record_kind: String,
        status: String,
    },

    /// A vendor field failed to normalize (bad timestamp, empty name).
    #[error("normalization failed for {record_kind} {provider_id}: {message}")]
    Normalize {
        record_kind: String,
        provider_id: String,
        message: String,
    },

    /// A normalized record violated its contract.
    #[error(transparent)]
    Contract(#[from] relay_schema::ContractError),

    /// The persistence collaborator rejected an upsert.
    #[error("store error: {0}")]
    Store(String),

    /// Audit recording failed.
    #[error(transparent)]
    Audit(#[from] relay_audit::AuditError),

    /// Core type construction failed (smart codes, IDs).
    #[error(transparent)]
    Core(#[from] relay_core::errors::CoreError),
}

impl SyncError {
    /// Whether this error is worth retrying with backoff.
    ///
    /// Intentionally narrow: only rate limits and transient transport
    /// failures qualify. Everything else is permanent for the fetch.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
