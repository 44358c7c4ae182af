//! Feed collection and filtering.
//!
//! Entries are checked for a fresh link and an accepted year first. Only then
//! is the article page fetched (when `news.full_text` is on), and the topic
//! match runs on the article text, falling back to the feed summary.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use reqwest::header;

use super::article::ArticleExtractor;
use super::feed::{FeedEntry, parse_feed};
use crate::config::NewsConfig;
use crate::constants::news::{ARTICLE_USER_AGENT, FEED_TIMEOUT_SECS, USER_AGENT};
use crate::constants::post::UNTITLED;
use crate::pipeline::strip_tags;
use crate::types::{BlogError, Category, NewsItem, Result};

/// Source of news items for a generation run
#[async_trait]
pub trait NewsCollector: Send + Sync {
    async fn collect(&self) -> Result<Vec<NewsItem>>;
}

/// Decides which feed entries become news items
#[derive(Debug, Clone)]
pub struct NewsFilter {
    accepted_years: Vec<String>,
    max_items: usize,
}

impl NewsFilter {
    pub fn new(accepted_years: Vec<String>, max_items: usize) -> Self {
        Self {
            accepted_years,
            max_items,
        }
    }

    pub fn is_full(&self, collected: usize) -> bool {
        collected >= self.max_items
    }

    /// Link of `entry` when it is unseen and dated in an accepted year
    pub fn candidate_link<'a>(&self, entry: &'a FeedEntry, seen: &HashSet<String>) -> Option<&'a str> {
        let link = entry.link.trim();
        if link.is_empty() || seen.contains(link) {
            return None;
        }

        let published = entry.date();
        if published.is_empty() || !self.accepted_years.iter().any(|y| published.contains(y.as_str())) {
            return None;
        }
        Some(link)
    }

    /// Convert `entry` if it is new, recent and on-topic; records its link as seen.
    ///
    /// `article` is the extracted page text; the feed summary is used without it.
    pub fn accept(
        &self,
        entry: &FeedEntry,
        source: &str,
        article: Option<String>,
        seen: &mut HashSet<String>,
    ) -> Option<NewsItem> {
        let link = self.candidate_link(entry, seen)?;
        let published = entry.date();

        let title = match entry.title.trim() {
            "" => UNTITLED,
            title => title,
        };
        let content = article.unwrap_or_else(|| plain_text(entry.body()));
        if !Category::any_matches(title) && !Category::any_matches(&content) {
            return None;
        }

        seen.insert(link.to_string());
        Some(NewsItem {
            title: title.to_string(),
            content,
            link: link.to_string(),
            source: source.to_string(),
            published: published.to_string(),
        })
    }
}

/// Markup removed, whitespace collapsed
fn plain_text(html: &str) -> String {
    strip_tags(html).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collects from RSS/Atom feeds in configured order
pub struct RssCollector {
    client: reqwest::Client,
    sources: Vec<String>,
    filter: NewsFilter,
    /// `None` when `news.full_text` is off
    extractor: Option<ArticleExtractor>,
}

impl RssCollector {
    pub fn new(config: &NewsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FEED_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            sources: config.sources.clone(),
            filter: NewsFilter::new(config.accepted_years.clone(), config.max_items),
            extractor: config.full_text.then(ArticleExtractor::new).transpose()?,
        })
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BlogError::feed(url, format!("HTTP {}", status)));
        }
        Ok(response.text().await?)
    }

    /// Extracted article text; any failure means "use the summary"
    async fn fetch_article(&self, link: &str) -> Option<String> {
        let extractor = self.extractor.as_ref()?;
        let response = match self
            .client
            .get(link)
            .header(header::USER_AGENT, ARTICLE_USER_AGENT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!(link = %link, status = %response.status(), "Article fetch failed, using summary");
                return None;
            }
            Err(e) => {
                debug!(link = %link, error = %e, "Article fetch failed, using summary");
                return None;
            }
        };
        let html = response.text().await.ok()?;
        extractor.extract(&html)
    }
}

#[async_trait]
impl NewsCollector for RssCollector {
    async fn collect(&self) -> Result<Vec<NewsItem>> {
        let mut seen = HashSet::new();
        let mut items = Vec::new();

        for url in &self.sources {
            if self.filter.is_full(items.len()) {
                break;
            }

            let feed = match self.fetch(url).await.and_then(|xml| parse_feed(&xml, url)) {
                Ok(feed) => feed,
                Err(e) => {
                    warn!(url = %url, error = %e, "Error fetching feed, skipping");
                    continue;
                }
            };

            let source = feed.title.as_deref().unwrap_or(url);
            let before = items.len();
            for entry in &feed.entries {
                if self.filter.is_full(items.len()) {
                    break;
                }
                let Some(link) = self.filter.candidate_link(entry, &seen) else {
                    continue;
                };
                let article = self.fetch_article(link).await;
                if let Some(item) = self.filter.accept(entry, source, article, &mut seen) {
                    items.push(item);
                }
            }
            debug!(
                url = %url,
                entries = feed.entries.len(),
                kept = items.len() - before,
                "Feed scanned"
            );
        }

        info!(items = items.len(), feeds = self.sources.len(), "News collection finished");
        Ok(items)
    }
}
