//! Routing policy: ordered provider list with cost guardrails.
//!
//! A policy is loaded once per request and read-only in flight. Providers
//! are tried strictly in ascending priority among enabled ones not yet
//! excluded for the current attempt.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{CostTier, FailureClass};

/// Default per-attempt timeout in milliseconds.
const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_enabled() -> bool {
    true
}

/// One provider slot in a routing policy.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProviderSpec {
    /// Registry name of the provider implementation.
    pub name: String,
    /// Ascending order of attempts. Lower tries first.
    pub priority: u32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Hard per-attempt timeout.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    pub cost_tier: CostTier,
    /// Failure classes that rotate to the next provider. Any other failure
    /// aborts the whole routing attempt.
    #[serde(default)]
    pub fallback_on: Vec<FailureClass>,
}

impl ProviderSpec {
    /// Whether a classified failure should rotate to the next provider.
    #[must_use]
    pub fn triggers_fallback(&self, class: FailureClass) -> bool {
        self.fallback_on.contains(&class)
    }
}

/// Ordered provider list plus cost caps. Read-only per request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RoutingPolicy {
    pub providers: Vec<ProviderSpec>,
    /// Daily organization-wide spend ceiling in USD.
    pub daily_cost_cap_usd: f64,
    /// Per-message spend ceiling in USD.
    pub per_message_cost_cap_usd: f64,
}

impl RoutingPolicy {
    /// Next provider to attempt: lowest priority among enabled providers
    /// whose names are not in `excluded`. Deterministic; `None` when
    /// exhausted.
    #[must_use]
    pub fn next_provider<'a>(&'a self, excluded: &[String]) -> Option<&'a ProviderSpec> {
        self.providers
            .iter()
            .filter(|p| p.enabled && !excluded.contains(&p.name))
            .min_by_key(|p| p.priority)
    }

    /// The cheapest enabled free-tier provider, if the policy carries one.
    /// This is the terminal fallback the chain must always end in.
    #[must_use]
    pub fn free_provider(&self) -> Option<&ProviderSpec> {
        self.providers
            .iter()
            .filter(|p| p.enabled && p.cost_tier == CostTier::Free)
            .min_by_key(|p| p.priority)
    }
}
