//! AI Integration Layer
//!
//! Prompt construction, provider backends with failover, and tolerant JSON
//! parsing of provider answers.

pub mod prompt;
pub mod provider;
pub mod validation;

pub use prompt::{PromptBuilder, PromptPhase, PromptSection, PromptSettings, PromptTemplates, SYSTEM_POLICY};
pub use provider::{
    ErrorCategory, ErrorClassifier, GeminiProvider, LlmError, LlmProvider, LlmResponse,
    OpenAiProvider, ProviderChain, ProviderChainBuilder, ProviderConfig, ResponseMetadata,
    ResponseTiming, SharedProvider, TokenUsage, create_provider,
};
pub use validation::{JsonRepairer, extract_json_with_repair_status};
