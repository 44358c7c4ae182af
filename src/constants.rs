//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers and fixed markup fragments are defined here.

/// Prompt construction constants
pub mod prompt {
    /// Maximum news items embedded in a single prompt
    pub const MAX_NEWS_ITEMS: usize = 5;

    /// Characters of each news item's content embedded in a prompt
    pub const NEWS_SNIPPET_CHARS: usize = 500;

    /// Directive that closes every prompt
    pub const JSON_ONLY_DIRECTIVE: &str = "Return ONLY JSON. No conversational text.";
}

/// Post shape defaults
pub mod post {
    /// Minimum words before a post is published
    pub const DEFAULT_MIN_WORDS: usize = 3000;

    /// Hard ceiling on published words
    pub const DEFAULT_MAX_WORDS: usize = 12000;

    /// Title length cap (characters)
    pub const DEFAULT_TITLE_MAX_CHARS: usize = 100;

    /// Labels handed to the publisher
    pub const MAX_LABELS: usize = 20;

    /// Sections requested in the outline
    pub const DEFAULT_OUTLINE_SECTIONS: usize = 15;

    /// Target words per generated section
    pub const DEFAULT_SECTION_WORDS: usize = 100;

    /// Title used when a draft carries none
    pub const UNTITLED: &str = "Untitled";
}

/// Fixed markup emitted by the section pipeline
pub mod markup {
    /// Content of the degenerate post produced when every generation path fails
    pub const FAILURE_PLACEHOLDER: &str = "<p>Content generation failed.</p>";

    /// Label of the degenerate post
    pub const FAILURE_LABEL: &str = "error";

    /// Table-of-contents trigger appended exactly once at the end of a document
    pub const TOC_TRAILER: &str = "\n\n<!--- TABLE OF CONTENT START 2215587-->\n<script>mbtTOC();</script>\n<!--- TABLE OF CONTENT END 2215587-->";

    /// Prefix of the machine-readable comment preceding each section
    pub const SECTION_MARKER_PREFIX: &str = "<!-- Section: ";
}

/// Provider chain constants
pub mod chain {
    /// Characters of a failed query included in the failure log line
    pub const QUERY_PREVIEW_CHARS: usize = 50;
}

/// LLM provider defaults
pub mod provider {
    /// Fixed low temperature for all providers
    pub const DEFAULT_TEMPERATURE: f32 = 0.3;

    /// Output token ceiling per call
    pub const DEFAULT_MAX_TOKENS: usize = 4096;

    /// Per-call timeout; section calls are slow deep-generation requests
    pub const DEFAULT_TIMEOUT_SECS: u64 = 1200;
}

/// Feed collection constants
pub mod news {
    /// Per-request timeout for feeds (seconds)
    pub const FEED_TIMEOUT_SECS: u64 = 15;

    /// Items kept per collection run
    pub const DEFAULT_MAX_ITEMS: usize = 15;

    /// User agent sent to feed hosts
    pub const USER_AGENT: &str = "NewsBot/1.0";

    /// Article pages are fetched with a browser user agent
    pub const ARTICLE_USER_AGENT: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

    /// Extracted article text shorter than this falls back to the feed summary
    pub const MIN_ARTICLE_CHARS: usize = 200;
}
