//! Central contract registry.
//!
//! Contracts are JSON Schemas generated from `relay-core` types via
//! [`schemars::schema_for!`] and compiled with `jsonschema` at registry
//! construction. Compilation failures are startup errors; validation is a
//! pure, deterministic check that collects every violation.

use std::collections::HashMap;

use schemars::schema_for;
use serde::{Deserialize, Serialize};

use crate::error::ContractError;

/// One schema violation: where, and what.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer into the offending instance (`""` for the root).
    pub path: String,
    pub message: String,
}

/// Outcome of a non-propagating validation. For callers that aggregate
/// violations (the sync run's per-record isolation) instead of erroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

struct Compiled {
    schema: serde_json::Value,
    validator: jsonschema::Validator,
}

/// Central store of every published Relay contract.
///
/// Built once at startup; immutable afterwards. A breaking change to a
/// contract ships as a new `vN` entry, never as a mutation.
pub struct ContractRegistry {
    contracts: HashMap<&'static str, Compiled>,
}

/// Generate, serialize, and compile one schema into the map.
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        let schema = serde_json::to_value(schema_for!($ty))
            .map_err(|e| ContractError::Generation(format!("{}: {e}", $name)))?;
        let validator =
            jsonschema::validator_for(&schema).map_err(|e| ContractError::Compile {
                name: $name.to_string(),
                message: format!("{e}"),
            })?;
        $map.insert($name, Compiled { schema, validator });
    };
}

impl ContractRegistry {
    /// Build the registry, compiling every contract.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Compile`] (or `Generation`) if any contract
    /// definition is malformed. This is the only place compilation can
    /// fail — `validate` never reports schema problems.
    pub fn new() -> Result<Self, ContractError> {
        let mut contracts = HashMap::new();

        // --- Canonical entities ---
        register!(
            contracts,
            crate::CONTRACT_EVENT_V1,
            relay_core::entities::CanonicalEntity
        );
        register!(
            contracts,
            crate::CONTRACT_EVENT_INVITE_V1,
            relay_core::entities::CanonicalEntity
        );

        // --- Attribute groups ---
        register!(
            contracts,
            crate::CONTRACT_EVENT_META_V1,
            relay_core::entities::EventMetaV1
        );
        register!(
            contracts,
            crate::CONTRACT_EVENT_SCHEDULE_V1,
            relay_core::entities::EventScheduleV1
        );
        register!(
            contracts,
            crate::CONTRACT_INVITE_META_V1,
            relay_core::entities::InviteMetaV1
        );

        // --- Config kinds ---
        register!(
            contracts,
            crate::CONTRACT_CHANNEL_CONFIG_V1,
            relay_core::config::ChannelConfig
        );
        register!(
            contracts,
            crate::CONTRACT_ROUTING_POLICY_V1,
            relay_core::routing::RoutingPolicy
        );
        register!(
            contracts,
            crate::CONTRACT_TOOL_MAP_V1,
            relay_core::config::ToolMap
        );
        register!(
            contracts,
            crate::CONTRACT_PROMPT_PACK_V1,
            relay_core::config::PromptPack
        );
        register!(
            contracts,
            crate::CONTRACT_KEYWORD_RULES_V1,
            relay_core::config::KeywordRules
        );

        // --- Audit envelope ---
        register!(
            contracts,
            crate::CONTRACT_AUDIT_TRANSACTION_V1,
            relay_core::audit::AuditTransaction
        );

        Ok(Self { contracts })
    }

    /// Get a contract's schema document by name. Returns `None` if unknown.
    #[must_use]
    pub fn schema(&self, name: &str) -> Option<&serde_json::Value> {
        self.contracts.get(name).map(|c| &c.schema)
    }

    /// Validate a JSON value against a named contract.
    ///
    /// Pure and deterministic. Collects every violation.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::NotFound`] for an unknown contract name, or
    /// [`ContractError::ValidationFailed`] carrying all violations.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), ContractError> {
        let report = self.report(name, instance)?;
        if report.valid {
            Ok(())
        } else {
            Err(ContractError::ValidationFailed {
                name: name.to_string(),
                violations: report.violations,
            })
        }
    }

    /// Validate without propagating violations as an error.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::NotFound`] for an unknown contract name.
    pub fn report(
        &self,
        name: &str,
        instance: &serde_json::Value,
    ) -> Result<ValidationReport, ContractError> {
        let compiled = self
            .contracts
            .get(name)
            .ok_or_else(|| ContractError::NotFound(name.to_string()))?;

        let violations: Vec<Violation> = compiled
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                path: e.instance_path.to_string(),
                message: format!("{e}"),
            })
            .collect();

        Ok(ValidationReport {
            valid: violations.is_empty(),
            violations,
        })
    }

    /// List all registered contract names.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.contracts.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered contracts.
    #[must_use]
    pub fn contract_count(&self) -> usize {
        self.contracts.len()
    }
}
