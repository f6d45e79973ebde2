//! Router error types.

use relay_core::enums::FailureClass;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    /// The organization has no routing or channel configuration. Terminal:
    /// the sender still receives a generic unavailable message.
    #[error("organization '{organization_id}' has no routing configuration")]
    ConfigurationMissing { organization_id: String },

    /// A provider failed with a class not configured for fallback, aborting
    /// the routing attempt.
    #[error("provider '{provider}' failed ({class}): {message}")]
    Provider {
        provider: String,
        class: FailureClass,
        message: String,
    },

    /// Every enabled provider failed or was excluded. Soft failure: a
    /// clarifying message is still sent.
    #[error("all providers exhausted")]
    AllProvidersExhausted,

    /// Outbound channel failed to deliver the response.
    #[error("outbound send failed: {0}")]
    Outbound(String),

    /// Config loading failed.
    #[error(transparent)]
    Config(#[from] relay_config::ConfigError),

    /// Audit recording failed.
    #[error(transparent)]
    Audit(#[from] relay_audit::AuditError),

    /// Core type construction failed.
    #[error(transparent)]
    Core(#[from] relay_core::errors::CoreError),
}
