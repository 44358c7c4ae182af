//! Collect Command
//!
//! Fetch news once and write the snapshot file.

use std::path::Path;

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::news::{NewsCollector, NewsStore, RssCollector};
use crate::types::{NewsSnapshot, Result};

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load(config_path)?;
    let collector = RssCollector::new(&config.news)?;
    let store = NewsStore::new(&config.news.output_path);

    let items = collector.collect().await?;
    store.save(&NewsSnapshot::new(items.clone()))?;

    let output = Output::new();
    output.news(&items);
    output.success(&format!("Saved to {}", store.path().display()));
    Ok(())
}
