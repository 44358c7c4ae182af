//! Configuration Types
//!
//! All configuration structures with defaults matching the original
//! deployment. Every component receives its section by value or reference;
//! nothing reads the environment after [`super::ConfigLoader`] has run.

use std::path::PathBuf;

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::ai::provider::ProviderConfig;
use crate::constants::{news as news_constants, post as post_constants, provider as provider_constants};
use crate::types::{BlogError, DEFAULT_TOPICS, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Word and title limits, outline shape
    pub post: PostConfig,

    /// Topic allow-list and requested topic
    pub topics: TopicConfig,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Feed collection settings
    pub news: NewsConfig,

    /// Blog publishing settings
    pub publish: PublishConfig,

    /// Run mode and daily schedule
    pub schedule: ScheduleConfig,

    /// Progress logging
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            post: PostConfig::default(),
            topics: TopicConfig::default(),
            llm: LlmConfig::default(),
            news: NewsConfig::default(),
            publish: PublishConfig::default(),
            schedule: ScheduleConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `BlogError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.post.max_words == 0 {
            return Err(BlogError::Config(
                "post.max_words must be greater than 0".to_string(),
            ));
        }

        if self.post.min_words > self.post.max_words {
            return Err(BlogError::Config(format!(
                "post.min_words ({}) must not exceed post.max_words ({})",
                self.post.min_words, self.post.max_words
            )));
        }

        if self.post.outline_sections == 0 {
            return Err(BlogError::Config(
                "post.outline_sections must be greater than 0".to_string(),
            ));
        }

        if self.post.title_max_chars == 0 {
            return Err(BlogError::Config(
                "post.title_max_chars must be greater than 0".to_string(),
            ));
        }

        if self.topics.allowed.is_empty() {
            return Err(BlogError::Config(
                "topics.allowed must contain at least one topic".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(BlogError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(BlogError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(BlogError::Config(
                "LLM max_tokens must be greater than 0".to_string(),
            ));
        }

        for name in &self.llm.order {
            if self.llm.backend(name).is_none() {
                return Err(BlogError::Config(format!(
                    "Unknown provider '{}' in llm.order. Supported: openai, gemini",
                    name
                )));
            }
        }

        self.schedule.daily_time()?;

        for source in &self.news.sources {
            check_url("news.sources", source)?;
        }
        check_url("publish.api_base", &self.publish.api_base)?;
        check_url("publish.token_uri", &self.publish.token_uri)?;
        for name in &self.llm.order {
            if let Some(base) = self.llm.backend(name).and_then(|b| b.api_base.as_deref()) {
                check_url(&format!("llm.{}.api_base", name), base)?;
            }
        }

        Ok(())
    }
}

/// Absolute http(s) URL
fn check_url(key: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| BlogError::Config(format!("{} has an invalid URL '{}': {}", key, value, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(BlogError::Config(format!(
            "{} must be an http(s) URL, got '{}'",
            key, value
        )));
    }
    Ok(())
}

// =============================================================================
// Post Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    /// Posts below this many words are not published
    pub min_words: usize,

    /// Posts above this many words are truncated
    pub max_words: usize,

    /// Title length cap in characters
    pub title_max_chars: usize,

    /// Publish even when below `min_words`
    #[serde(deserialize_with = "flexible_bool")]
    pub force_post: bool,

    /// Section titles requested in the outline
    pub outline_sections: usize,

    /// Target words per section
    pub section_words: usize,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            min_words: post_constants::DEFAULT_MIN_WORDS,
            max_words: post_constants::DEFAULT_MAX_WORDS,
            title_max_chars: post_constants::DEFAULT_TITLE_MAX_CHARS,
            force_post: false,
            outline_sections: post_constants::DEFAULT_OUTLINE_SECTIONS,
            section_words: post_constants::DEFAULT_SECTION_WORDS,
        }
    }
}

// =============================================================================
// Topic Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicConfig {
    /// Requested topic; replaced by a random allowed one when not allow-listed
    #[serde(deserialize_with = "lossy_opt_string")]
    pub topic: Option<String>,

    /// Topic allow-list
    pub allowed: Vec<String>,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            topic: None,
            allowed: DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

/// Per-backend settings; a backend without an API key is skipped
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Never serialized to output
    #[serde(skip_serializing, deserialize_with = "lossy_opt_string")]
    pub api_key: Option<String>,

    /// Model override
    pub model: Option<String>,

    /// API base URL override
    pub api_base: Option<String>,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl BackendConfig {
    /// A key counts only if it is non-blank
    pub fn has_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Failover order, first entry tried first
    pub order: Vec<String>,

    /// Output token ceiling per call
    pub max_tokens: usize,

    /// Sampling temperature, kept low for JSON adherence
    pub temperature: f32,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    pub openai: BackendConfig,

    pub gemini: BackendConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            order: vec!["openai".to_string(), "gemini".to_string()],
            max_tokens: provider_constants::DEFAULT_MAX_TOKENS,
            temperature: provider_constants::DEFAULT_TEMPERATURE,
            timeout_secs: provider_constants::DEFAULT_TIMEOUT_SECS,
            openai: BackendConfig::default(),
            gemini: BackendConfig::default(),
        }
    }
}

impl LlmConfig {
    /// Backend settings by provider name
    pub fn backend(&self, name: &str) -> Option<&BackendConfig> {
        match name {
            "openai" => Some(&self.openai),
            "gemini" => Some(&self.gemini),
            _ => None,
        }
    }

    /// Provider configs in failover order, skipping backends without a key
    pub fn provider_configs(&self) -> Vec<ProviderConfig> {
        self.order
            .iter()
            .filter_map(|name| {
                let backend = self.backend(name)?;
                if !backend.has_key() {
                    tracing::debug!(provider = %name, "No API key configured, provider skipped");
                    return None;
                }
                Some(ProviderConfig {
                    provider: name.clone(),
                    model: backend.model.clone(),
                    timeout_secs: self.timeout_secs,
                    temperature: self.temperature,
                    api_key: backend.api_key.clone(),
                    api_base: backend.api_base.clone(),
                    max_tokens: self.max_tokens,
                })
            })
            .collect()
    }
}

// =============================================================================
// News Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    /// Collect news before each run
    #[serde(deserialize_with = "flexible_bool")]
    pub enabled: bool,

    /// RSS/Atom feed URLs, scanned in order
    pub sources: Vec<String>,

    /// Items kept per collection run
    pub max_items: usize,

    /// An item is kept only if its published date mentions one of these years
    pub accepted_years: Vec<String>,

    /// Snapshot file written after each collection
    pub output_path: PathBuf,

    /// Fetch each article page and use its text instead of the feed summary
    #[serde(deserialize_with = "flexible_bool")]
    pub full_text: bool,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sources: default_sources(),
            max_items: news_constants::DEFAULT_MAX_ITEMS,
            accepted_years: vec!["2026".to_string(), "2027".to_string(), "2028".to_string()],
            output_path: PathBuf::from("data/news.json"),
            full_text: true,
        }
    }
}

fn default_sources() -> Vec<String> {
    [
        "https://www.theguardian.com/world/rss",
        "https://rss.nytimes.com/services/xml/rss/nyt/World.xml",
        "https://feeds.bbci.co.uk/news/world/rss.xml",
        "https://www.aljazeera.com/xml/rss/all.xml",
        "https://www.theguardian.com/education/rss",
        "https://www.timeshighereducation.com/rss",
        "https://scholarship-positions.com/feed/",
        "https://www.scholars4dev.com/feed/",
        "https://techcrunch.com/feed/",
        "https://www.theverge.com/rss/index.xml",
        "https://www.wired.com/feed/rss",
        "https://www.engadget.com/rss.xml",
        "https://feeds.feedburner.com/arstechnica/index",
        "https://feeds.npr.org/1001/rss.xml",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

// =============================================================================
// Publish Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Target blog; publishing is skipped when unset
    #[serde(deserialize_with = "lossy_opt_string")]
    pub blog_id: Option<String>,

    /// Stored OAuth credentials (`access_token`, plus `refresh_token`,
    /// `client_id`, `client_secret`, `expiry` when refresh is possible)
    pub token_file: PathBuf,

    /// Blogger API base URL
    pub api_base: String,

    /// OAuth token endpoint used to refresh an expired access token
    pub token_uri: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            blog_id: None,
            token_file: PathBuf::from("credentials/token.json"),
            api_base: "https://www.googleapis.com/blogger/v3".to_string(),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
        }
    }
}

// =============================================================================
// Schedule Configuration
// =============================================================================

/// Daily timer or a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    #[serde(alias = "scheduled")]
    Scheduler,
    #[serde(alias = "once")]
    Direct,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Scheduler => write!(f, "scheduler"),
            RunMode::Direct => write!(f, "direct"),
        }
    }
}

impl std::str::FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduler" | "scheduled" => Ok(RunMode::Scheduler),
            "direct" | "once" => Ok(RunMode::Direct),
            _ => Err(format!(
                "Unknown run mode: {}. Valid values: scheduler, direct",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub run_mode: RunMode,

    /// Local wall-clock time of the daily run, `HH:MM`
    pub daily_at: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            run_mode: RunMode::Scheduler,
            daily_at: "09:00".to_string(),
        }
    }
}

impl ScheduleConfig {
    pub fn daily_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(self.daily_at.trim(), "%H:%M").map_err(|e| {
            BlogError::Config(format!(
                "schedule.daily_at must be HH:MM, got '{}': {}",
                self.daily_at, e
            ))
        })
    }
}

// =============================================================================
// Log Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Emit progress messages
    #[serde(deserialize_with = "flexible_bool")]
    pub verbose: bool,

    pub messages: MessageTemplates,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            verbose: true,
            messages: MessageTemplates::default(),
        }
    }
}

/// Progress message templates; `{name}` placeholders are substituted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageTemplates {
    /// `{topic}`
    pub start: String,
    /// `{n}`
    pub outline_request: String,
    /// `{n}`
    pub outline_ready: String,
    pub header: String,
    /// `{i}`, `{total}`, `{section}`
    pub section: String,
    /// `{wc}`, `{min}`, `{max}`
    pub complete: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            start: "Starting generation for: {topic}".to_string(),
            outline_request: "PHASE 1: Generating {n}-section outline".to_string(),
            outline_ready: "Outline ready with {n} sections".to_string(),
            header: "PHASE 2: Generating header and introduction".to_string(),
            section: "PHASE 2: Generating section {i}/{total}: {section}".to_string(),
            complete: "Generation complete: {wc} words (target: {min}-{max})".to_string(),
        }
    }
}

// =============================================================================
// Lenient deserializers for environment-sourced values
// =============================================================================

/// Accepts booleans, `0`/`1`, and the strings `true/false/yes/no/on/off`.
fn flexible_bool<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flexible {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    match Flexible::deserialize(deserializer)? {
        Flexible::Bool(b) => Ok(b),
        Flexible::Int(i) => Ok(i != 0),
        Flexible::Str(s) => match s.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean, got '{}'",
                other
            ))),
        },
    }
}

/// Accepts strings or numbers (numeric blog ids arrive as integers from env).
fn lossy_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lossy {
        Str(String),
        UInt(u64),
        Int(i64),
        Float(f64),
    }

    let value: Option<Lossy> = Option::deserialize(deserializer)?;
    Ok(value
        .map(|v| match v {
            Lossy::Str(s) => s,
            Lossy::UInt(n) => n.to_string(),
            Lossy::Int(n) => n.to_string(),
            Lossy::Float(n) => n.to_string(),
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.post.min_words, 3000);
        assert_eq!(config.post.max_words, 12000);
        assert_eq!(config.post.title_max_chars, 100);
        assert_eq!(config.post.outline_sections, 15);
        assert_eq!(config.llm.order, vec!["openai", "gemini"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_word_limits() {
        let mut config = Config::default();
        config.post.min_words = 20_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_provider() {
        let mut config = Config::default();
        config.llm.order.push("claude".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("claude"));
    }

    #[test]
    fn test_validate_rejects_bad_daily_time() {
        let mut config = Config::default();
        config.schedule.daily_at = "9am".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = Config::default();
        config.news.sources.push("not a url".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.gemini.api_base = Some("ftp://example.org".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.publish.token_uri = "oauth2.googleapis.com/token".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.publish.api_base = "http://127.0.0.1:8080".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_provider_configs_skip_missing_keys() {
        let mut llm = LlmConfig::default();
        assert!(llm.provider_configs().is_empty());

        llm.gemini.api_key = Some("g-key".to_string());
        llm.openai.api_key = Some("   ".to_string());
        let configs = llm.provider_configs();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].provider, "gemini");
        assert_eq!(configs[0].max_tokens, 4096);
    }

    #[test]
    fn test_provider_configs_follow_order() {
        let mut llm = LlmConfig::default();
        llm.openai.api_key = Some("o".to_string());
        llm.gemini.api_key = Some("g".to_string());
        llm.order = vec!["gemini".to_string(), "openai".to_string()];
        let names: Vec<_> = llm
            .provider_configs()
            .into_iter()
            .map(|c| c.provider)
            .collect();
        assert_eq!(names, vec!["gemini", "openai"]);
    }

    #[test]
    fn test_backend_debug_redacts_key() {
        let backend = BackendConfig {
            api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", backend);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_run_mode_parse() {
        assert_eq!("direct".parse::<RunMode>().unwrap(), RunMode::Direct);
        assert_eq!("Scheduler".parse::<RunMode>().unwrap(), RunMode::Scheduler);
        assert!("weekly".parse::<RunMode>().is_err());
    }

    #[test]
    fn test_flexible_bool_from_json() {
        let post: PostConfig = serde_json::from_str(r#"{"force_post": "yes"}"#).unwrap();
        assert!(post.force_post);
        let post: PostConfig = serde_json::from_str(r#"{"force_post": 0}"#).unwrap();
        assert!(!post.force_post);
        assert!(serde_json::from_str::<PostConfig>(r#"{"force_post": "maybe"}"#).is_err());
    }

    #[test]
    fn test_lossy_blog_id() {
        let publish: PublishConfig =
            serde_json::from_str(r#"{"blog_id": 3422137415075355570}"#).unwrap();
        assert_eq!(publish.blog_id.as_deref(), Some("3422137415075355570"));
        let publish: PublishConfig = serde_json::from_str(r#"{"blog_id": "  "}"#).unwrap();
        assert!(publish.blog_id.is_none());
    }
}
