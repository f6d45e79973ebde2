//! # relay-schema
//!
//! Versioned contract registry for Relay.
//!
//! This crate provides:
//! - `ContractRegistry`: central store of every published contract, compiled
//!   once at construction (malformed schemas fail startup, never validation)
//! - Validation returning every violation with its instance path
//! - Contract names of the form `<kind>.v<N>`; consumers pin a version and
//!   never silently accept a higher one
//!
//! ## Architecture
//!
//! Contract-bound types are defined in `relay-core` with
//! `#[derive(JsonSchema)]` and closed with `deny_unknown_fields`, so
//! generated schemas reject unknown fields — vendor API drift fails loudly
//! instead of silently dropping data. Consumer crates (`relay-sync`,
//! `relay-config`, `relay-router`) depend on this crate for runtime
//! validation before persistence.

mod error;
mod registry;

pub use error::ContractError;
pub use registry::{ContractRegistry, ValidationReport, Violation};

/// Canonical event entity, version 1.
pub const CONTRACT_EVENT_V1: &str = "event.v1";
/// Canonical event-invite entity, version 1.
pub const CONTRACT_EVENT_INVITE_V1: &str = "event_invite.v1";
/// Event metadata attribute group, version 1.
pub const CONTRACT_EVENT_META_V1: &str = "event.meta.v1";
/// Event schedule attribute group, version 1.
pub const CONTRACT_EVENT_SCHEDULE_V1: &str = "event.schedule.v1";
/// Invite metadata attribute group, version 1.
pub const CONTRACT_INVITE_META_V1: &str = "invite.meta.v1";
/// Channel config kind, version 1.
pub const CONTRACT_CHANNEL_CONFIG_V1: &str = "channel_config.v1";
/// Routing policy config kind, version 1.
pub const CONTRACT_ROUTING_POLICY_V1: &str = "routing_policy.v1";
/// Tool map config kind, version 1.
pub const CONTRACT_TOOL_MAP_V1: &str = "tool_map.v1";
/// Prompt pack config kind, version 1.
pub const CONTRACT_PROMPT_PACK_V1: &str = "prompt_pack.v1";
/// Keyword rules config kind, version 1.
pub const CONTRACT_KEYWORD_RULES_V1: &str = "keyword_rules.v1";
/// Audit transaction envelope, version 1.
pub const CONTRACT_AUDIT_TRANSACTION_V1: &str = "audit_transaction.v1";
