//! # relay-core
//!
//! Core types, ID generation, and error types for Relay.
//!
//! This crate provides the foundational types shared across all Relay crates:
//! - The canonical entity shape every vendor feed normalizes into
//! - Smart codes (versioned classification strings) with strict parsing
//! - Status enums with explicit string forms
//! - Sync cursor with the monotonic-advancement policy
//! - Audit transaction/line envelope for the append-only recorder
//! - Routing policy and config-kind types (tagged, contract-bound)
//! - ID prefix constants and formatting helpers
//! - Cross-cutting error types

pub mod audit;
pub mod config;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod routing;
pub mod smart_code;
