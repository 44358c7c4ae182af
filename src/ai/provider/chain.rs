//! Failover Provider Chain
//!
//! One-pass failover across providers in fixed priority order.
//!
//! ## Strategy
//!
//! 1. Invoke providers in the order they were added
//! 2. The first usable JSON value wins
//! 3. A failing provider is never retried within the same fetch
//! 4. If every provider fails, log a preview of the prompt and return `None`
//!
//! There is no backoff and no circuit breaking; each provider call is bounded
//! only by its own HTTP timeout.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::{LlmProvider, SharedProvider, create_provider};
use crate::config::LlmConfig;
use crate::constants::chain::QUERY_PREVIEW_CHARS;
use crate::types::{Result, truncate_chars};

/// Ordered list of providers tried front to back
#[derive(Clone, Default)]
pub struct ProviderChain {
    providers: Vec<SharedProvider>,
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChain")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl ProviderChain {
    /// Build the chain from configuration; backends without a key are skipped
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let mut builder = ProviderChainBuilder::new();
        for provider_config in config.provider_configs() {
            builder = builder.add_shared(create_provider(&provider_config)?);
        }
        Ok(builder.build())
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// First usable result in priority order, or `None` when every provider fails
    pub async fn fetch(&self, prompt: &str) -> Option<Value> {
        for provider in &self.providers {
            match provider.invoke(prompt).await {
                Some(value) if is_usable(&value) => {
                    debug!(provider = provider.name(), model = provider.model(), "Provider answered");
                    return Some(value);
                }
                Some(_) => {
                    warn!(provider = provider.name(), "Provider returned an empty result");
                }
                None => {}
            }
        }

        warn!(
            providers = self.providers.len(),
            "All APIs failed for query '{}...'",
            truncate_chars(prompt, QUERY_PREVIEW_CHARS)
        );
        None
    }
}

/// Null, `false`, and empty strings/arrays/objects do not count as answers
fn is_usable(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        _ => true,
    }
}

/// Builder for creating provider chains
#[derive(Default)]
pub struct ProviderChainBuilder {
    providers: Vec<SharedProvider>,
}

impl ProviderChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider; earlier providers are tried first
    pub fn add_provider(mut self, provider: impl LlmProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Append a shared provider
    pub fn add_shared(mut self, provider: SharedProvider) -> Self {
        self.providers.push(provider);
        self
    }

    /// Build the chain
    pub fn build(self) -> ProviderChain {
        ProviderChain {
            providers: self.providers,
        }
    }
}
