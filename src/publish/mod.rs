//! Publishing
//!
//! A [`Publisher`] receives a finished [`Post`] and creates it on the blog.
//! Missing credentials are a skip (`Ok(None)`), not an error.

mod blogger;
mod credentials;

pub use blogger::BloggerPublisher;
pub use credentials::{CredentialStore, StoredCredentials};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::pipeline::word_count;
use crate::types::{Post, Result};

/// What the blog returned for a created post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Create `post`; `None` when publishing was skipped
    async fn publish(&self, post: &Post) -> Result<Option<PublishReceipt>>;

    fn name(&self) -> &str;
}

/// Logs the post instead of sending it
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunPublisher;

#[async_trait]
impl Publisher for DryRunPublisher {
    async fn publish(&self, post: &Post) -> Result<Option<PublishReceipt>> {
        info!(
            title = %post.title,
            words = word_count(&post.content),
            labels = %post.labels.join(", "),
            "Dry run: would post"
        );
        Ok(None)
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}
