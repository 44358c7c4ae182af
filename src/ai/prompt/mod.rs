//! Prompt Builder System
//!
//! Deterministic prompt construction for every generation phase.
//!
//! A prompt is a sequence of [`PromptSection`]s: a mode tag naming the phase,
//! the instruction text, an optional block of news evidence, and the closing
//! JSON-only directive. The fixed editorial policy travels separately as the
//! provider's system instruction ([`SYSTEM_POLICY`]).

use crate::config::PostConfig;
use crate::constants::prompt::{JSON_ONLY_DIRECTIVE, MAX_NEWS_ITEMS, NEWS_SNIPPET_CHARS};
use crate::types::{Category, NewsItem, truncate_chars};

/// System instruction sent with every request
pub const SYSTEM_POLICY: &str = r#"You are a Digital Media Strategist and Google AdSense Specialist.
Your MISSION is to produce high-value, "High-CPC" articles that prioritize Google's E-E-A-T (Experience, Expertise, Authoritativeness, Trustworthiness) guidelines.

CONTENT QUALITY & ADSENSE RULES:
1. SEMANTIC HTML: Use hierarchical <h2> and <h3> tags. Use <p style="text-align: justify;"> for a premium look.
2. AUTHORITY SIGNALING: For every news item, explicitly state: "Verified Report: [DATE], [DAY] at [TIME]".
3. ADSENSE MONETIZATION:
   - Identify "High-Value" intent. Focus on solution-oriented, insightful analysis, not just reporting.
   - Use professional terminology (e.g., instead of "new tech", use "disruptive innovation").
   - NO clickbait, NO sensitive/prohibited niches, NO low-quality fluff.
4. CATEGORIZATION: You MUST map content to exactly:
   - Education & Learning
   - Scholarships & Study Abroad
   - International (Overseas) News
   - Latest Tech News
   - Unique & Innovative Gadget Reviews
5. STRUCTURE:
   - Start with a data-driven "Executive Summary".
   - Break content into logical sub-points with <ul> or <ol>.
   - End with a "Strategic Conclusion" or "Global Impact" section.
6. SOURCE INTEGRATION: Use provided context news links as clickable <a> tags within the content to increase trust.

JSON Formats:
- Outline: {"topic":"...","sections":["Section1","Section2",...]}
- Section/Post: {"title":"...","content":"HTML...","labels":["l1","l2"]}
Return ONLY JSON. No conversational text."#;

const NEWS_HEADER: &str = "USE THE FOLLOWING REAL-TIME NEWS AS YOUR PRIMARY SOURCE AND EVIDENCE:";

// =============================================================================
// Phase
// =============================================================================

/// Generation phase a prompt is built for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPhase {
    /// Section titles for the whole post
    Outline,
    /// First section; also returns title and labels
    HeaderSection { section: String },
    /// Body section; content only
    Section { section: String },
    /// Complete post in one call
    FullPost,
}

impl PromptPhase {
    pub fn mode_tag(&self) -> &'static str {
        match self {
            Self::Outline => "[MODE: OUTLINE]",
            Self::HeaderSection { .. } | Self::Section { .. } => "[MODE: SECTION_ONLY]",
            Self::FullPost => "[MODE: FULL_POST]",
        }
    }

    /// Short name for log fields
    pub fn name(&self) -> &'static str {
        match self {
            Self::Outline => "outline",
            Self::HeaderSection { .. } => "header",
            Self::Section { .. } => "section",
            Self::FullPost => "full_post",
        }
    }
}

/// Numbers interpolated into prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptSettings {
    pub outline_sections: usize,
    pub section_words: usize,
    pub post_words: usize,
    /// Year the model is told to restrict news to
    pub year: i32,
}

impl PromptSettings {
    pub fn from_post_config(post: &PostConfig, year: i32) -> Self {
        Self {
            outline_sections: post.outline_sections,
            section_words: post.section_words,
            post_words: post.max_words,
            year,
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Leading phase tag
    Mode(&'static str),
    /// Instruction sentence(s)
    Text(String),
    /// Evidence block, at most [`MAX_NEWS_ITEMS`] entries
    News(Vec<NewsItem>),
    /// Closing directive
    Directive(String),
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, tag: &'static str) -> Self {
        self.sections.push(PromptSection::Mode(tag));
        self
    }

    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.sections.push(PromptSection::Text(content.into()));
        self
    }

    /// Add the news evidence block; empty input adds nothing
    pub fn news(mut self, items: &[NewsItem]) -> Self {
        if !items.is_empty() {
            let kept = items.iter().take(MAX_NEWS_ITEMS).cloned().collect();
            self.sections.push(PromptSection::News(kept));
        }
        self
    }

    pub fn directive(mut self, content: impl Into<String>) -> Self {
        self.sections.push(PromptSection::Directive(content.into()));
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Mode(tag) => prompt.push_str(tag),
                PromptSection::Text(content) => {
                    if !prompt.is_empty() {
                        prompt.push(' ');
                    }
                    prompt.push_str(&content);
                }
                PromptSection::News(items) => prompt.push_str(&news_context(&items)),
                PromptSection::Directive(content) => {
                    prompt.push_str("\n\n");
                    prompt.push_str(&content);
                }
            }
        }

        prompt
    }
}

/// Render the evidence block for up to [`MAX_NEWS_ITEMS`] items
pub fn news_context(items: &[NewsItem]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let mut block = format!("\n\n{}\n", NEWS_HEADER);
    for (idx, item) in items.iter().take(MAX_NEWS_ITEMS).enumerate() {
        block.push_str(&format!(
            "[{}] Source: {} | Title: {} | Content Snippet: {} | Link: {}\n",
            idx + 1,
            item.source,
            item.title,
            truncate_chars(&item.content, NEWS_SNIPPET_CHARS),
            item.link
        ));
    }
    block
}

// =============================================================================
// Templates
// =============================================================================

/// Preset prompts, one per phase
pub struct PromptTemplates;

impl PromptTemplates {
    /// Complete prompt for `phase` about `topic`
    pub fn build(
        phase: &PromptPhase,
        topic: &str,
        settings: &PromptSettings,
        news: &[NewsItem],
    ) -> String {
        let builder = PromptBuilder::new().mode(phase.mode_tag());

        let builder = match phase {
            PromptPhase::Outline => Self::outline(builder, topic, settings),
            PromptPhase::HeaderSection { section } => Self::section(builder, section, topic, settings)
                .text("Also provide an SEO-friendly post title and up to 5 labels. Return JSON with \"title\", \"content\" and \"labels\"."),
            PromptPhase::Section { section } => Self::section(builder, section, topic, settings)
                .text("Return JSON with \"content\"."),
            PromptPhase::FullPost => builder.text(format!(
                "Generate a comprehensive {}+ word blog post about \"{}\". Use REAL links, REAL copyright-free image URLs. Return JSON with title, content, labels.",
                settings.post_words, topic
            )),
        };

        builder.news(news).directive(JSON_ONLY_DIRECTIVE).build()
    }

    fn outline(builder: PromptBuilder, topic: &str, settings: &PromptSettings) -> PromptBuilder {
        builder
            .text(format!(
                "Generate EXACTLY {} sections for a {}-word, high-level, authoritative blog post about \"{}\".",
                settings.outline_sections, settings.post_words, topic
            ))
            .text(format!(
                "IMPORTANT: You MUST focus ONLY on news from the year {}. For every news item or event mentioned, clearly state the exact DATE, DAY, and TIME it occurred.",
                settings.year
            ))
            .text(format!(
                "ASSIGN each news item to exactly one of these categories: {}.",
                category_list()
            ))
            .text(format!(
                "Return JSON with \"topic\" and \"sections\" array of exactly {} section titles. No more, no less.",
                settings.outline_sections
            ))
    }

    fn section(
        builder: PromptBuilder,
        section: &str,
        topic: &str,
        settings: &PromptSettings,
    ) -> PromptBuilder {
        builder
            .text(format!(
                "Write an extremely detailed, {}-word deep-dive content for the section \"{}\" as part of a larger, authoritative post about \"{}\".",
                settings.section_words, section, topic
            ))
            .text(format!(
                "MANDATORY: Use ONLY {} news. Mention DATE, DAY, and TIME for events.",
                settings.year
            ))
            .text(format!("Categorize into: {}.", category_list()))
            .text("Use real links and sources. Use <p style=\"text-align: justify;\">.")
    }
}

fn category_list() -> String {
    Category::ALL
        .iter()
        .map(|c| c.title())
        .collect::<Vec<_>>()
        .join(", ")
}
