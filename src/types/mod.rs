pub mod error;
pub mod news;
pub mod post;
pub mod topic;
pub mod utils;

pub use error::{BlogError, ErrorCategory, ErrorClassifier, LlmError, Result};
pub use news::{NewsItem, NewsSnapshot};
pub use post::{Draft, Outline, Post, SectionResult};
pub use topic::{Category, DEFAULT_TOPICS, TopicSelector};
pub use utils::{json_string, json_string_array, log_filter_warn, slugify, truncate_chars};
