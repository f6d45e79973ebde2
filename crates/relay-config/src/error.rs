//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A required configuration section is not configured.
    #[error("configuration section '{section}' is not configured (missing required fields)")]
    NotConfigured { section: String },

    /// A stored config document failed its contract at load time.
    #[error(transparent)]
    Contract(#[from] relay_schema::ContractError),

    /// A validated document still failed to deserialize into its kind.
    #[error("invalid '{kind}' document: {reason}")]
    InvalidDocument { kind: String, reason: String },

    /// The backing config source failed.
    #[error("config source error: {0}")]
    Source(String),

    /// Cache lock poisoned by a panicking holder.
    #[error("config cache lock poisoned")]
    Poisoned,
}
