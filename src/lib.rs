//! Autoblog - Sectioned Long-Form Post Generator
//!
//! Collects recent news, asks an LLM for an outline, generates the post one
//! section at a time, and publishes the assembled HTML to Blogger.
//!
//! ## Core Features
//!
//! - **Section Pipeline**: outline → header → body sections, with fallback
//! - **Provider Chain**: OpenAI and Gemini backends tried in priority order
//! - **JSON Repair**: fence stripping and a control-character retry
//! - **News Evidence**: RSS/Atom collection filtered by year and category
//! - **Quality Gate**: word-count bounds before anything is published
//!
//! ## Quick Start
//!
//! ```ignore
//! use autoblog::{ConfigLoader, RunOptions, Runner};
//!
//! let config = ConfigLoader::load(None)?;
//! let runner = Runner::from_config(&config, RunOptions::default())?;
//! let outcome = runner.run_job(Some("Education")).await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: LLM providers, prompt templates, response repair
//! - [`pipeline`]: Section state machine, sanitizer, assembler
//! - [`news`]: Feed collection and snapshot storage
//! - [`publish`]: Blogger publisher
//! - [`app`]: Job runner and daily scheduler
//! - [`config`]: Layered configuration

pub mod ai;
pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod news;
pub mod pipeline;
pub mod publish;
pub mod types;

#[cfg(test)]
mod test_support;

// Core types
pub use config::{Config, ConfigLoader, RunMode};
pub use types::error::{BlogError, ErrorCategory, Result};
pub use types::{Category, Draft, NewsItem, NewsSnapshot, Outline, Post, SectionResult, TopicSelector};

// AI
pub use ai::{
    GeminiProvider, LlmProvider, LlmResponse, OpenAiProvider, PromptPhase, PromptTemplates,
    ProviderChain, ProviderChainBuilder, ProviderConfig, SharedProvider,
};

// Pipeline
pub use pipeline::{
    AssemblyDecision, Generation, GenerationPath, GenerationReport, PostAssembler, Sanitizer,
    SectionPipeline,
};

// Collaborators
pub use app::{JobOutcome, RunOptions, Runner, Scheduler};
pub use news::{NewsCollector, NewsStore, RssCollector};
pub use publish::{BloggerPublisher, DryRunPublisher, PublishReceipt, Publisher};
