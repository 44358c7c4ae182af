//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Config file (`--config <path>`, else `./autoblog.toml` when present)
//! 3. Deployment environment names (`OPENAI_API_KEY`, `BLOG_POST_MIN_WORDS`, ...)
//! 4. Prefixed environment variables (`AUTOBLOG_POST__MIN_WORDS` -> `post.min_words`)

use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::Uncased,
};
use tracing::{debug, info};

use super::types::Config;
use crate::types::{BlogError, Result};

/// Default config file, resolved against the working directory
pub const DEFAULT_CONFIG_FILE: &str = "autoblog.toml";

/// Deployment environment names and the config keys they set
const LEGACY_ENV: &[(&str, &str)] = &[
    ("OPENAI_API_KEY", "llm.openai.api_key"),
    ("GEMINI_API_KEY", "llm.gemini.api_key"),
    ("AI_MAX_TOKENS", "llm.max_tokens"),
    ("BLOG_POST_MIN_WORDS", "post.min_words"),
    ("BLOG_POST_MAX_WORDS", "post.max_words"),
    ("POST_TITLE_MAX_CHARS", "post.title_max_chars"),
    ("FORCE_POST", "post.force_post"),
    ("OUTLINE_SECTIONS", "post.outline_sections"),
    ("SECTION_WORDS", "post.section_words"),
    ("TOPIC", "topics.topic"),
    ("LOG_VERBOSE", "log.verbose"),
    ("RUN_MODE", "schedule.run_mode"),
    ("BLOGGER_BLOG_ID", "publish.blog_id"),
    ("TOKEN_FILE", "publish.token_file"),
    ("NEWS_OUTPUT", "news.output_path"),
    ("MSG_START", "log.messages.start"),
    ("MSG_PHASE1", "log.messages.outline_request"),
    ("MSG_OUTLINE_READY", "log.messages.outline_ready"),
    ("MSG_PHASE2_HEADER", "log.messages.header"),
    ("MSG_PHASE2_SECTION", "log.messages.section"),
    ("MSG_COMPLETE", "log.messages.complete"),
];

fn legacy_key(name: &str) -> Option<&'static str> {
    LEGACY_ENV
        .iter()
        .find(|(env, _)| env.eq_ignore_ascii_case(name))
        .map(|(_, key)| *key)
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → file → deployment env → prefixed env
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let config: Config = Self::figment(path)?.extract()?;

        config.validate()?;

        Ok(config)
    }

    /// Build the merged figment without extracting it
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        match path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(BlogError::Config(format!(
                        "Config file not found: {}",
                        explicit.display()
                    )));
                }
                debug!("Loading config from: {}", explicit.display());
                figment = figment.merge(Toml::file(explicit));
            }
            None => {
                let default_path = Self::default_config_path();
                if default_path.exists() {
                    debug!("Loading config from: {}", default_path.display());
                    figment = figment.merge(Toml::file(&default_path));
                }
            }
        }

        let names: Vec<&str> = LEGACY_ENV.iter().map(|(env, _)| *env).collect();
        figment = figment.merge(Env::raw().only(&names).map(|key| {
            match legacy_key(key.as_str()) {
                Some(path) => Uncased::new(path),
                None => Uncased::new(key.as_str().to_string()),
            }
        }));

        // AUTOBLOG_LLM__TIMEOUT_SECS -> llm.timeout_secs
        figment = figment.merge(Env::prefixed("AUTOBLOG_").split("__").lowercase(true));

        Ok(figment)
    }

    /// `./autoblog.toml`
    pub fn default_config_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Render the effective configuration. API keys are never included.
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            Ok(toml::to_string_pretty(config)?)
        }
    }

    /// Write a config file populated with defaults
    pub fn init(path: &Path, force: bool) -> Result<PathBuf> {
        if path.exists() && !force {
            return Err(BlogError::Config(format!(
                "Config file already exists: {} (use --force to overwrite)",
                path.display()
            )));
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let body = format!(
            "# autoblog configuration\n# Environment variables override these values.\n\n{}",
            toml::to_string_pretty(&Config::default())?
        );
        fs::write(path, body)?;
        info!("Created config: {}", path.display());

        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunMode;
    use figment::Jail;

    fn load_in_jail(path: Option<&Path>) -> figment::error::Result<Config> {
        ConfigLoader::load(path).map_err(|e| e.to_string().into())
    }

    #[test]
    fn test_load_default_config() {
        Jail::expect_with(|_jail| {
            let config = load_in_jail(None)?;
            assert_eq!(config.version, "1.0");
            assert_eq!(config.post.min_words, 3000);
            assert!(config.llm.provider_configs().is_empty());
            Ok(())
        });
    }

    #[test]
    fn test_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "autoblog.toml",
                r#"
                [post]
                min_words = 500
                outline_sections = 5

                [topics]
                allowed = ["Rust"]
                "#,
            )?;

            let config = load_in_jail(None)?;
            assert_eq!(config.post.min_words, 500);
            assert_eq!(config.post.outline_sections, 5);
            assert_eq!(config.post.max_words, 12000);
            assert_eq!(config.topics.allowed, vec!["Rust"]);
            Ok(())
        });
    }

    #[test]
    fn test_deployment_env_names() {
        Jail::expect_with(|jail| {
            jail.set_env("OPENAI_API_KEY", "sk-test");
            jail.set_env("BLOG_POST_MIN_WORDS", "100");
            jail.set_env("FORCE_POST", "1");
            jail.set_env("RUN_MODE", "direct");
            jail.set_env("BLOGGER_BLOG_ID", "3422137415075355570");
            jail.set_env("TOPIC", "Artificial Intelligence");
            jail.set_env("MSG_START", "go {topic}");

            let config = load_in_jail(None)?;
            assert_eq!(config.llm.openai.api_key.as_deref(), Some("sk-test"));
            assert_eq!(config.post.min_words, 100);
            assert!(config.post.force_post);
            assert_eq!(config.schedule.run_mode, RunMode::Direct);
            assert_eq!(config.publish.blog_id.as_deref(), Some("3422137415075355570"));
            assert_eq!(config.topics.topic.as_deref(), Some("Artificial Intelligence"));
            assert_eq!(config.log.messages.start, "go {topic}");
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env_wins() {
        Jail::expect_with(|jail| {
            jail.set_env("BLOG_POST_MAX_WORDS", "8000");
            jail.set_env("AUTOBLOG_POST__MAX_WORDS", "9000");
            jail.set_env("AUTOBLOG_LLM__TIMEOUT_SECS", "60");

            let config = load_in_jail(None)?;
            assert_eq!(config.post.max_words, 9000);
            assert_eq!(config.llm.timeout_secs, 60);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("BLOG_POST_MIN_WORDS", "20000");
            assert!(ConfigLoader::load(None).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        Jail::expect_with(|_jail| {
            let err = ConfigLoader::load(Some(Path::new("nope.toml"))).unwrap_err();
            assert!(err.to_string().contains("nope.toml"));
            Ok(())
        });
    }

    #[test]
    fn test_render_omits_api_keys() {
        let mut config = Config::default();
        config.llm.openai.api_key = Some("sk-secret".to_string());

        let toml = ConfigLoader::render(&config, false).unwrap();
        assert!(toml.contains("min_words"));
        assert!(!toml.contains("sk-secret"));

        let json = ConfigLoader::render(&config, true).unwrap();
        assert!(!json.contains("sk-secret"));
    }

    #[test]
    fn test_init_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("autoblog.toml");

        ConfigLoader::init(&path, false).unwrap();
        assert!(path.exists());
        assert!(ConfigLoader::init(&path, false).is_err());
        assert!(ConfigLoader::init(&path, true).is_ok());

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&path))
            .extract()
            .unwrap();
        assert_eq!(config.post.min_words, 3000);
    }
}
