//! LLM Provider Abstraction
//!
//! Defines the LlmProvider trait: a prompt goes in, a JSON value comes out.
//! Concrete backends talk HTTP through `reqwest` and share the two-stage
//! JSON repair in [`crate::ai::validation`].
//!
//! ## Modules
//!
//! - `chain`: One-pass failover across providers in priority order
//! - `openai`: OpenAI Chat Completions
//! - `gemini`: Google Gemini generateContent

mod chain;
mod gemini;
mod openai;

pub use chain::{ProviderChain, ProviderChainBuilder};
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

// Re-export error types from centralized location
pub use crate::types::{ErrorCategory, ErrorClassifier, LlmError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::constants::provider::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS};
use crate::types::{BlogError, Result};

// =============================================================================
// LLM Response with Usage Metrics
// =============================================================================

/// Parsed provider answer plus usage and timing
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Parsed JSON content
    pub content: Value,
    /// Token usage metrics
    pub usage: TokenUsage,
    /// Response timing
    pub timing: ResponseTiming,
    /// Provider and model info
    pub metadata: ResponseMetadata,
}

impl LlmResponse {
    /// Create response with content only (usage unknown)
    pub fn content_only(content: Value) -> Self {
        Self {
            content,
            usage: TokenUsage::default(),
            timing: ResponseTiming::default(),
            metadata: ResponseMetadata::default(),
        }
    }

    pub fn with_metrics(
        content: Value,
        usage: TokenUsage,
        timing: ResponseTiming,
        metadata: ResponseMetadata,
    ) -> Self {
        Self {
            content,
            usage,
            timing,
            metadata,
        }
    }

    /// Debug line with usage and latency; empty metadata falls back to the caller's names
    pub fn log_metrics(&self, provider: &str, model: &str) {
        let provider = non_empty_or(&self.metadata.provider, provider);
        let model = non_empty_or(&self.metadata.model, model);
        debug!(
            provider,
            model,
            input_tokens = self.usage.input_tokens,
            output_tokens = self.usage.output_tokens,
            total_tokens = self.usage.total(),
            total_ms = self.timing.total_ms,
            "Provider call completed"
        );
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

/// Token usage metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input tokens (prompt)
    pub input_tokens: u32,
    /// Output tokens (response)
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens used (input + output)
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Response timing metrics
#[derive(Debug, Clone, Default)]
pub struct ResponseTiming {
    /// Total response time in milliseconds (wall clock)
    pub total_ms: u64,
}

impl ResponseTiming {
    pub fn from_duration(duration: std::time::Duration) -> Self {
        Self {
            total_ms: duration.as_millis() as u64,
        }
    }
}

/// Response metadata
#[derive(Debug, Clone, Default)]
pub struct ResponseMetadata {
    /// Model used
    pub model: String,
    /// Provider name
    pub provider: String,
}

/// Shared LLM provider type
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for a single LLM provider
///
/// API keys are never serialized and are redacted in debug output. Each
/// provider converts the key to `SecretString` internally.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider type: "openai", "gemini"
    pub provider: String,
    /// Model name (provider-specific)
    pub model: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling temperature
    pub temperature: f32,
    /// Never serialized to output
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL (for custom endpoints)
    #[serde(default)]
    pub api_base: Option<String>,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

fn default_max_tokens() -> usize {
    DEFAULT_MAX_TOKENS
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: DEFAULT_TEMPERATURE,
            api_key: None,
            api_base: None,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ProviderConfig {
    /// Non-blank API key, or a config error naming the provider
    pub(crate) fn require_key(&self) -> Result<String> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
            .ok_or_else(|| {
                BlogError::Config(format!("{} API key not configured", self.provider))
            })
    }
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// LLM Provider trait for structured output generation
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send `prompt` and parse the answer as JSON
    async fn generate(&self, prompt: &str) -> Result<LlmResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;

    /// Like [`generate`](Self::generate) but never fails: errors are logged
    /// and become `None`.
    async fn invoke(&self, prompt: &str) -> Option<Value> {
        match self.generate(prompt).await {
            Ok(response) => {
                response.log_metrics(self.name(), self.model());
                Some(response.content)
            }
            Err(e) => {
                warn!(
                    provider = self.name(),
                    category = %e.category(),
                    "Provider call failed: {}",
                    e
                );
                None
            }
        }
    }
}

/// Create a shared provider from configuration
pub fn create_provider(config: &ProviderConfig) -> Result<SharedProvider> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiProvider::new(config.clone())?)),
        "gemini" => Ok(Arc::new(GeminiProvider::new(config.clone())?)),
        _ => Err(BlogError::Config(format!(
            "Unknown provider: {}. Supported: openai, gemini",
            config.provider
        ))),
    }
}

/// Shared HTTP client with the configured timeout
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| BlogError::LlmApi(format!("Failed to create HTTP client: {}", e)))
}
