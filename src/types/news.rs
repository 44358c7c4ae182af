//! News items produced by the feed collector and read by the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One collected news article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsItem {
    pub title: String,
    /// Free text, possibly the full article body
    pub content: String,
    pub link: String,
    /// Feed title the item came from
    pub source: String,
    /// Publication timestamp exactly as the feed wrote it
    pub published: String,
}

/// Persisted output of one collection run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsSnapshot {
    pub fetched: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<NewsItem>,
}

impl NewsSnapshot {
    pub fn new(items: Vec<NewsItem>) -> Self {
        Self {
            fetched: Utc::now(),
            items,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}
