//! Provider abstraction and registry.
//!
//! A provider turns one inbound text into an intent (and optionally a
//! reply) at some cost. Implementations are registered by name and looked
//! up from the organization's routing policy; the router never hardcodes a
//! provider.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use relay_core::enums::FailureClass;

/// Input handed to every provider attempt.
#[derive(Debug, Clone)]
pub struct ProviderInput {
    pub organization_id: String,
    /// The inbound message text.
    pub text: String,
    /// Organization's system prompt, empty if none configured.
    pub system_prompt: String,
    /// BCP 47 language tag for the response.
    pub language: String,
}

/// Successful provider result.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderOutcome {
    /// Intent confidence in `[0, 1]`.
    pub confidence: f64,
    /// Resolved intent, `None` when the provider could not classify.
    pub intent: Option<String>,
    /// Response text to send back, `None` to fall back to the canned
    /// clarify message.
    pub reply: Option<String>,
    /// Attempt cost in USD.
    pub cost_usd: f64,
}

/// Classified provider failure. The class alone decides whether the
/// router rotates to the next provider.
#[derive(Debug, Clone)]
pub struct ProviderFailure {
    pub class: FailureClass,
    pub message: String,
}

impl ProviderFailure {
    #[must_use]
    pub fn new(class: FailureClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
        }
    }
}

/// One intent/response provider.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    /// Run one inference attempt. The router races this against the
    /// policy's per-attempt timeout; implementations need no internal
    /// deadline.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderFailure`] carrying the failure class used for
    /// fallback matching.
    async fn infer(&self, input: &ProviderInput) -> Result<ProviderOutcome, ProviderFailure>;
}

/// Name → implementation lookup for configured providers.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }
}
