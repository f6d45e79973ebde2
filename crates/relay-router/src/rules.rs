//! Deterministic keyword-rule provider.
//!
//! The zero-cost terminal fallback: matches the message against a
//! confidence-scored keyword table and never fails, so a chain ending in
//! this provider always terminates in a response even with every paid
//! provider down.

use async_trait::async_trait;
use relay_core::config::{KeywordRule, KeywordRules};

use crate::provider::{Provider, ProviderFailure, ProviderInput, ProviderOutcome};

/// Registry name of the rule-based provider.
pub const RULES_PROVIDER: &str = "rules";

/// Keyword-matching provider over a per-organization rule table.
pub struct RuleBasedProvider {
    rules: KeywordRules,
}

impl RuleBasedProvider {
    #[must_use]
    pub const fn new(rules: KeywordRules) -> Self {
        Self { rules }
    }

    /// Highest-confidence rule with at least one keyword hit. Ties keep
    /// the earliest rule, so the table order is a deterministic
    /// tiebreaker.
    fn best_match(&self, text: &str) -> Option<&KeywordRule> {
        let haystack = text.to_lowercase();
        self.rules
            .rules
            .iter()
            .filter(|rule| {
                rule.keywords
                    .iter()
                    .any(|k| haystack.contains(&k.to_lowercase()))
            })
            .fold(None, |best: Option<&KeywordRule>, rule| match best {
                Some(b) if b.confidence >= rule.confidence => Some(b),
                _ => Some(rule),
            })
    }
}

#[async_trait]
impl Provider for RuleBasedProvider {
    fn name(&self) -> &str {
        RULES_PROVIDER
    }

    async fn infer(&self, input: &ProviderInput) -> Result<ProviderOutcome, ProviderFailure> {
        Ok(self.best_match(&input.text).map_or(
            ProviderOutcome {
                confidence: 0.0,
                intent: None,
                reply: None,
                cost_usd: 0.0,
            },
            |rule| ProviderOutcome {
                confidence: rule.confidence,
                intent: Some(rule.intent.clone()),
                reply: None,
                cost_usd: 0.0,
            },
        ))
    }
}
