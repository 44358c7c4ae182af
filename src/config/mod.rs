//! Configuration Management
//!
//! Hierarchical resolution, later sources win:
//! 1. Built-in defaults
//! 2. Config file (`autoblog.toml`)
//! 3. Deployment environment names (`OPENAI_API_KEY`, `BLOG_POST_MIN_WORDS`, ...)
//! 4. Prefixed environment variables (`AUTOBLOG_*`)
//! 5. CLI arguments (applied by the command layer)

mod loader;
mod types;

pub use loader::{ConfigLoader, DEFAULT_CONFIG_FILE};
pub use types::*;
