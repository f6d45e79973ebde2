//! Per-organization configuration kinds.
//!
//! Each kind is an explicit, closed (`deny_unknown_fields`) type with its
//! own contract schema, validated at load time by `relay-config` — never a
//! loosely-typed blob inspected at point of use.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inbound/outbound channel binding for one organization.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    /// Channel discriminant (e.g. `"whatsapp"`).
    pub channel: String,
    /// Channel-native account/number identifier.
    pub account_id: String,
    pub enabled: bool,
    /// BCP 47 language tag for canned responses.
    pub language: String,
}

/// Intent → ordered tool-name sequences.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ToolMap {
    /// An intent with no entry here is a valid terminal state (FAQ-only
    /// intents run no tools).
    pub mappings: BTreeMap<String, Vec<String>>,
}

impl ToolMap {
    /// Tools mapped to `intent`, in execution order. Empty if unmapped.
    #[must_use]
    pub fn tools_for(&self, intent: &str) -> &[String] {
        self.mappings.get(intent).map_or(&[], Vec::as_slice)
    }
}

/// Canned message texts for one organization.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PromptPack {
    /// System prompt handed to AI providers.
    pub system: String,
    /// Sent when every provider failed or none produced an intent.
    pub clarify: String,
    /// Sent when the organization has no usable configuration.
    pub unavailable: String,
}

/// One confidence-scored keyword rule.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KeywordRule {
    /// Intent this rule resolves to.
    pub intent: String,
    /// Case-insensitive keywords; any hit activates the rule.
    pub keywords: Vec<String>,
    /// Score in `[0, 1]`; the highest-confidence matching rule wins.
    pub confidence: f64,
}

/// Rule table for the zero-cost deterministic provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KeywordRules {
    pub rules: Vec<KeywordRule>,
}
