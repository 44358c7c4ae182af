//! Post Assembler
//!
//! Applies the presentation constraints to a [`Draft`]:
//! - below `min_words` (and not forced): skip, no publish
//! - above `max_words`: keep the first `max_words` words as one bare `<p>`
//! - title: `Untitled` when blank, clamped to `title_max_chars` characters
//! - labels: at most [`MAX_LABELS`]

use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use crate::config::PostConfig;
use crate::constants::post::{MAX_LABELS, UNTITLED};
use crate::types::{Draft, Post, truncate_chars};

/// Outcome of assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyDecision {
    Publish(Post),
    /// Quality gate: too short to publish
    Skip { word_count: usize, min_words: usize },
}

impl AssemblyDecision {
    pub fn post(&self) -> Option<&Post> {
        match self {
            Self::Publish(post) => Some(post),
            Self::Skip { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostAssembler {
    min_words: usize,
    max_words: usize,
    title_max_chars: usize,
    force_post: bool,
}

impl PostAssembler {
    pub fn new(config: &PostConfig) -> Self {
        Self {
            min_words: config.min_words,
            max_words: config.max_words,
            title_max_chars: config.title_max_chars,
            force_post: config.force_post,
        }
    }

    pub fn assemble(&self, draft: Draft) -> AssemblyDecision {
        let title = if draft.title.trim().is_empty() {
            UNTITLED
        } else {
            draft.title.as_str()
        };
        let title = truncate_chars(title, self.title_max_chars).to_string();

        let wc = word_count(&draft.content);
        if !self.force_post && wc < self.min_words {
            warn!(
                word_count = wc,
                min_words = self.min_words,
                "Skipping post: {} words < min {} (set FORCE_POST=true to post anyway)",
                wc,
                self.min_words
            );
            return AssemblyDecision::Skip {
                word_count: wc,
                min_words: self.min_words,
            };
        }

        let content = if wc > self.max_words {
            info!(word_count = wc, max_words = self.max_words, "Truncated to {} words", self.max_words);
            truncate_to_words(&draft.content, self.max_words)
        } else {
            draft.content
        };

        let mut labels = draft.labels;
        labels.truncate(MAX_LABELS);

        info!(title = %title, "Generated title: {}", title);
        AssemblyDecision::Publish(Post {
            title,
            content,
            labels,
        })
    }
}

// =============================================================================
// Word counting
// =============================================================================

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Replace every `<...>` tag (at least one character inside) with a space.
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, " ").into_owned()
}

/// Whitespace-delimited tokens after stripping markup
pub fn word_count(html: &str) -> usize {
    strip_tags(html).split_whitespace().count()
}

/// First `max_words` words of the stripped text in one `<p>`; unchanged when
/// already within the limit.
pub fn truncate_to_words(html: &str, max_words: usize) -> String {
    if word_count(html) <= max_words {
        return html.to_string();
    }
    let stripped = strip_tags(html);
    let words: Vec<&str> = stripped.split_whitespace().take(max_words).collect();
    format!("<p>{}</p>", words.join(" "))
}
