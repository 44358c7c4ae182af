//! Config Command
//!
//! Usage:
//!   autoblog config show [-f json|toml]
//!   autoblog config init [--force]

use std::path::Path;

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Print the effective (merged) configuration; API keys are never shown
pub fn show(config_path: Option<&Path>, as_json: bool) -> Result<()> {
    let config = ConfigLoader::load(config_path)?;
    println!("{}", ConfigLoader::render(&config, as_json)?);
    Ok(())
}

/// Write a default config file
pub fn init(config_path: Option<&Path>, force: bool) -> Result<()> {
    let default_path = ConfigLoader::default_config_path();
    let path = config_path.unwrap_or(&default_path);
    let written = ConfigLoader::init(path, force)?;

    Output::new().success(&format!("Initialized configuration at {}", written.display()));
    println!("  Set OPENAI_API_KEY / GEMINI_API_KEY and BLOGGER_BLOG_ID in the environment.");
    Ok(())
}
