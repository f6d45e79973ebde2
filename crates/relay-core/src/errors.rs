//! Cross-cutting error types for Relay.
//!
//! This module defines errors that can originate from any crate in the
//! system. Domain-specific errors (e.g., `SyncError`, `RouteError`) are
//! defined in their respective crates.

use thiserror::Error;

/// Errors that can be raised by any Relay crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A smart code string did not match `VENDOR.DOMAIN.KIND.SUBTYPE.vN`.
    #[error("invalid smart code '{code}': {reason}")]
    InvalidSmartCode { code: String, reason: String },

    /// Random ID generation failed (OS entropy source unavailable).
    #[error("ID generation failed: {0}")]
    IdGeneration(String),

    /// Data failed validation (schema, format, constraints).
    #[error("validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
