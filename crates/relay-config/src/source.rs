//! Per-organization config-kind loading.
//!
//! A [`ConfigSource`] hands back raw JSON documents; the [`ConfigLoader`]
//! validates each against its published contract at load time and
//! deserializes it into the closed kind type. A document that was stored
//! malformed is rejected here, never at point of use.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::de::DeserializeOwned;

use relay_core::config::{ChannelConfig, KeywordRules, PromptPack, ToolMap};
use relay_core::routing::RoutingPolicy;
use relay_schema::ContractRegistry;

use crate::cache::TtlCache;
use crate::error::ConfigError;

/// Discriminant for the per-organization config kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKind {
    Channel,
    RoutingPolicy,
    ToolMap,
    PromptPack,
    KeywordRules,
}

impl ConfigKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Channel => "channel_config",
            Self::RoutingPolicy => "routing_policy",
            Self::ToolMap => "tool_map",
            Self::PromptPack => "prompt_pack",
            Self::KeywordRules => "keyword_rules",
        }
    }

    /// The contract every document of this kind must satisfy.
    #[must_use]
    pub const fn contract(self) -> &'static str {
        match self {
            Self::Channel => relay_schema::CONTRACT_CHANNEL_CONFIG_V1,
            Self::RoutingPolicy => relay_schema::CONTRACT_ROUTING_POLICY_V1,
            Self::ToolMap => relay_schema::CONTRACT_TOOL_MAP_V1,
            Self::PromptPack => relay_schema::CONTRACT_PROMPT_PACK_V1,
            Self::KeywordRules => relay_schema::CONTRACT_KEYWORD_RULES_V1,
        }
    }
}

impl std::fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backing store of per-organization config documents.
pub trait ConfigSource: Send + Sync {
    /// Fetch the raw document for one organization and kind. `None` means
    /// the organization has no document of this kind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Source`] on a backend failure.
    fn fetch(
        &self,
        organization_id: &str,
        kind: ConfigKind,
    ) -> Result<Option<serde_json::Value>, ConfigError>;
}

/// Contract-validating, cache-fronted config loader.
pub struct ConfigLoader {
    source: Arc<dyn ConfigSource>,
    contracts: Arc<ContractRegistry>,
    cache: TtlCache,
}

impl ConfigLoader {
    #[must_use]
    pub fn new(source: Arc<dyn ConfigSource>, contracts: Arc<ContractRegistry>, ttl: Duration) -> Self {
        Self {
            source,
            contracts,
            cache: TtlCache::new(ttl),
        }
    }

    /// Load, validate, and deserialize one config document.
    ///
    /// Cached raw documents were validated when first loaded, so a cache
    /// hit skips straight to deserialization.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Contract`] when the stored document violates
    /// its contract, [`ConfigError::Source`] on backend failure.
    pub fn load<T: DeserializeOwned>(
        &self,
        organization_id: &str,
        kind: ConfigKind,
    ) -> Result<Option<T>, ConfigError> {
        let raw = match self.cache.get(organization_id, kind)? {
            Some(raw) => raw,
            None => {
                let Some(raw) = self.source.fetch(organization_id, kind)? else {
                    return Ok(None);
                };
                self.contracts.validate(kind.contract(), &raw)?;
                self.cache.insert(organization_id, kind, raw.clone())?;
                raw
            }
        };
        let typed = serde_json::from_value(raw).map_err(|e| ConfigError::InvalidDocument {
            kind: kind.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(typed))
    }

    /// # Errors
    ///
    /// See [`ConfigLoader::load`].
    pub fn channel_config(
        &self,
        organization_id: &str,
    ) -> Result<Option<ChannelConfig>, ConfigError> {
        self.load(organization_id, ConfigKind::Channel)
    }

    /// # Errors
    ///
    /// See [`ConfigLoader::load`].
    pub fn routing_policy(
        &self,
        organization_id: &str,
    ) -> Result<Option<RoutingPolicy>, ConfigError> {
        self.load(organization_id, ConfigKind::RoutingPolicy)
    }

    /// # Errors
    ///
    /// See [`ConfigLoader::load`].
    pub fn tool_map(&self, organization_id: &str) -> Result<Option<ToolMap>, ConfigError> {
        self.load(organization_id, ConfigKind::ToolMap)
    }

    /// # Errors
    ///
    /// See [`ConfigLoader::load`].
    pub fn prompt_pack(&self, organization_id: &str) -> Result<Option<PromptPack>, ConfigError> {
        self.load(organization_id, ConfigKind::PromptPack)
    }

    /// # Errors
    ///
    /// See [`ConfigLoader::load`].
    pub fn keyword_rules(
        &self,
        organization_id: &str,
    ) -> Result<Option<KeywordRules>, ConfigError> {
        self.load(organization_id, ConfigKind::KeywordRules)
    }

    /// Drop a cached document after the underlying store changed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Poisoned`] if the cache lock is poisoned.
    pub fn invalidate(&self, organization_id: &str, kind: ConfigKind) -> Result<(), ConfigError> {
        self.cache.invalidate(organization_id, kind)
    }
}

/// In-memory config source for tests and demos.
#[derive(Default)]
pub struct InMemoryConfigSource {
    documents: Mutex<HashMap<(String, ConfigKind), serde_json::Value>>,
}

impl InMemoryConfigSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace a document. Callers holding a [`ConfigLoader`]
    /// must invalidate its cache afterwards.
    pub fn set(&self, organization_id: &str, kind: ConfigKind, value: serde_json::Value) {
        if let Ok(mut documents) = self.documents.lock() {
            documents.insert((organization_id.to_string(), kind), value);
        }
    }

    pub fn remove(&self, organization_id: &str, kind: ConfigKind) {
        if let Ok(mut documents) = self.documents.lock() {
            documents.remove(&(organization_id.to_string(), kind));
        }
    }
}

impl ConfigSource for InMemoryConfigSource {
    fn fetch(
        &self,
        organization_id: &str,
        kind: ConfigKind,
    ) -> Result<Option<serde_json::Value>, ConfigError> {
        Ok(self
            .documents
            .lock()
            .map_err(|_| ConfigError::Source("in-memory source lock poisoned".into()))?
            .get(&(organization_id.to_string(), kind))
            .cloned())
    }
}
