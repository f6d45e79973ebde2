//! Prefixed ID generation.
//!
//! Every Relay identifier is `{prefix}-{8 hex chars}`, e.g. `txn-a3f8b2c1`.
//! The hex tail comes from the OS entropy source via `getrandom`.

use crate::errors::CoreError;

/// Audit transaction IDs.
pub const PREFIX_TRANSACTION: &str = "txn";
/// Correlation IDs linking an inbound request to everything it causes.
pub const PREFIX_CORRELATION: &str = "cor";
/// Outbound message IDs.
pub const PREFIX_MESSAGE: &str = "msg";
/// Sync run IDs.
pub const PREFIX_SYNC_RUN: &str = "syn";

/// All known ID prefixes.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_TRANSACTION,
    PREFIX_CORRELATION,
    PREFIX_MESSAGE,
    PREFIX_SYNC_RUN,
];

/// Generate a prefixed ID, e.g. `new_id("txn")` → `"txn-a3f8b2c1"`.
///
/// # Errors
///
/// Returns [`CoreError::IdGeneration`] if the OS entropy source fails.
pub fn new_id(prefix: &str) -> Result<String, CoreError> {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes).map_err(|e| CoreError::IdGeneration(e.to_string()))?;
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("{prefix}-{hex}"))
}
