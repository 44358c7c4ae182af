//! News collection
//!
//! Feeds are scanned in configured order; entries are kept when they are
//! new (by link), dated in an accepted year, and on-topic for at least one
//! [`Category`](crate::types::Category). Article pages are fetched for their
//! full text when enabled. The result is persisted as a
//! [`NewsSnapshot`](crate::types::NewsSnapshot) and handed to the pipeline as
//! prompt evidence.

mod article;
mod collector;
mod feed;
mod store;

pub use article::ArticleExtractor;
pub use collector::{NewsCollector, NewsFilter, RssCollector};
pub use feed::{FeedEntry, ParsedFeed, parse_feed};
pub use store::NewsStore;
