//! Contract validation error types.

use thiserror::Error;

use crate::Violation;

/// Errors from the contract registry.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Requested contract name was not found in the registry.
    #[error("contract not found: {0}")]
    NotFound(String),

    /// A contract definition failed to compile at registry construction.
    /// Malformed schemas never surface at validate time.
    #[error("contract '{name}' failed to compile: {message}")]
    Compile { name: String, message: String },

    /// JSON value did not satisfy the contract. Carries every violation,
    /// not just the first.
    #[error("contract '{name}' violated ({} violations)", violations.len())]
    ValidationFailed {
        name: String,
        violations: Vec<Violation>,
    },

    /// Schema generation error (schemars output was not serializable).
    #[error("schema generation error: {0}")]
    Generation(String),
}
