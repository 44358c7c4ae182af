//! Section Pipeline
//!
//! Turns a topic (plus optional news evidence) into a [`Draft`] through a
//! fixed sequence of provider calls.
//!
//! ## Phases
//!
//! ```text
//! INIT → OUTLINE → HEADER → SECTIONS[2..N] → DONE
//!           ↓
//!        FALLBACK (single full-post call, else degenerate post)
//! ```
//!
//! Calls are strictly sequential and sections are appended in outline order.
//! No phase failure aborts the run: a failed outline switches to the fallback,
//! a failed header keeps default title/labels, a failed section is skipped.

mod assembler;
mod progress;
mod sanitize;
mod session;

pub use assembler::{AssemblyDecision, PostAssembler, strip_tags, truncate_to_words, word_count};
pub use progress::{Progress, render};
pub use sanitize::Sanitizer;
pub use session::GenerationSession;

use chrono::Datelike;
use tracing::{Instrument, info, info_span, warn};

use crate::ai::prompt::{PromptPhase, PromptSettings, PromptTemplates};
use crate::ai::provider::ProviderChain;
use crate::config::{LogConfig, PostConfig};
use crate::constants::markup::{
    FAILURE_LABEL, FAILURE_PLACEHOLDER, SECTION_MARKER_PREFIX, TOC_TRAILER,
};
use crate::types::{Category, Draft, NewsItem, Outline, Result, SectionResult};

// =============================================================================
// Report
// =============================================================================

/// Which branch produced the draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPath {
    /// Outline, header and section calls
    Sections,
    /// Outline failed; one full-post call succeeded
    Fallback,
    /// Outline and fallback both failed
    Degenerate,
}

/// Section that produced no content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSection {
    /// 1-based position in the outline
    pub index: usize,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub session_id: String,
    pub path: GenerationPath,
    /// Outline entries used (after truncation)
    pub outline_len: usize,
    pub header_generated: bool,
    pub skipped: Vec<SkippedSection>,
}

/// Draft plus what happened while producing it
#[derive(Debug, Clone)]
pub struct Generation {
    pub draft: Draft,
    pub report: GenerationReport,
}

// =============================================================================
// Pipeline
// =============================================================================

pub struct SectionPipeline {
    chain: ProviderChain,
    post: PostConfig,
    progress: Progress,
    sanitizer: Sanitizer,
}

impl SectionPipeline {
    pub fn new(chain: ProviderChain, post: PostConfig, log: &LogConfig) -> Result<Self> {
        Ok(Self {
            chain,
            post,
            progress: Progress::new(log),
            sanitizer: Sanitizer::new()?,
        })
    }

    /// Generate a draft about `topic`; never fails
    pub async fn generate(&self, topic: &str, news: &[NewsItem]) -> Generation {
        let session = GenerationSession::new(topic);
        let span = info_span!("generation", session = %session.id(), topic = %topic);
        self.run(&session, news).instrument(span).await
    }

    async fn run(&self, session: &GenerationSession, news: &[NewsItem]) -> Generation {
        let topic = session.topic();
        let settings = PromptSettings::from_post_config(&self.post, session.started_at().year());

        self.progress.start(topic);
        self.progress.outline_request(self.post.outline_sections);

        let outline_prompt = PromptTemplates::build(&PromptPhase::Outline, topic, &settings, news);
        let outline = self
            .chain
            .fetch(&outline_prompt)
            .await
            .and_then(|value| Outline::from_value(&value))
            .map(|mut outline| {
                outline.truncate(self.post.outline_sections);
                outline.sections
            })
            .filter(|sections| !sections.is_empty());

        let Some(sections) = outline else {
            return self.fallback(session, &settings, news).await;
        };

        let total = sections.len();
        self.progress.outline_ready(total);

        let mut report = GenerationReport {
            session_id: session.id().to_string(),
            path: GenerationPath::Sections,
            outline_len: total,
            header_generated: false,
            skipped: Vec::new(),
        };

        // Header
        self.progress.header();
        let header_phase = PromptPhase::HeaderSection {
            section: sections[0].clone(),
        };
        let header_prompt = PromptTemplates::build(&header_phase, topic, &settings, news);
        let default_labels = default_labels(topic);

        let mut html = String::new();
        let (title, labels) = match self.chain.fetch(&header_prompt).await {
            Some(value) => {
                let header = SectionResult::lenient(&value);
                report.header_generated = true;
                html.push_str(&header.content);
                (
                    header
                        .title
                        .unwrap_or_else(|| format!("The Ultimate Guide to {}", topic)),
                    header
                        .labels
                        .filter(|labels| !labels.is_empty())
                        .unwrap_or(default_labels),
                )
            }
            None => {
                warn!(phase = header_phase.name(), "Header generation failed, using default title and labels");
                (format!("The Definitive Guide to {}", topic), default_labels)
            }
        };

        // Body sections
        for (offset, section) in sections.iter().enumerate().skip(1) {
            let index = offset + 1;
            self.progress.section(index, total, section);

            let phase = PromptPhase::Section {
                section: section.clone(),
            };
            let prompt = PromptTemplates::build(&phase, topic, &settings, news);
            let result = self
                .chain
                .fetch(&prompt)
                .await
                .and_then(|value| SectionResult::from_value(&value));

            match result {
                Some(result) => {
                    html.push_str(&section_marker(section));
                    html.push_str(&self.sanitizer.sanitize(&result.content));
                }
                None => {
                    warn!(
                        phase = phase.name(),
                        section = index,
                        title = %section,
                        "Failed to generate section {} '{}', skipping",
                        index,
                        section
                    );
                    report.skipped.push(SkippedSection {
                        index,
                        title: section.clone(),
                    });
                }
            }
        }

        html.push_str(TOC_TRAILER);

        let wc = word_count(&html);
        self.progress
            .complete(wc, self.post.min_words, self.post.max_words);
        info!(
            words = wc,
            sections = total,
            skipped = report.skipped.len(),
            "Draft assembled"
        );

        Generation {
            draft: Draft {
                title,
                content: html,
                labels,
            },
            report,
        }
    }

    /// Single-shot generation used when no outline is available
    async fn fallback(
        &self,
        session: &GenerationSession,
        settings: &PromptSettings,
        news: &[NewsItem],
    ) -> Generation {
        let topic = session.topic();
        warn!(phase = PromptPhase::Outline.name(), "Failed to get outline, using fallback single-shot generation");
        self.progress
            .note("Failed to get outline. Using fallback single-shot generation.");

        let phase = PromptPhase::FullPost;
        let prompt = PromptTemplates::build(&phase, topic, settings, news);
        let (draft, path) = match self.chain.fetch(&prompt).await {
            Some(value) => {
                let post = SectionResult::lenient(&value);
                (
                    Draft {
                        title: post.title.unwrap_or_default(),
                        content: post.content,
                        labels: post.labels.unwrap_or_default(),
                    },
                    GenerationPath::Fallback,
                )
            }
            None => {
                warn!(phase = phase.name(), "Fallback generation failed, producing placeholder post");
                (degenerate_draft(topic), GenerationPath::Degenerate)
            }
        };

        Generation {
            draft,
            report: GenerationReport {
                session_id: session.id().to_string(),
                path,
                outline_len: 0,
                header_generated: false,
                skipped: Vec::new(),
            },
        }
    }
}

/// `\n\n<!-- Section: {title} -->\n`
pub fn section_marker(title: &str) -> String {
    format!("\n\n{}{} -->\n", SECTION_MARKER_PREFIX, title)
}

/// `[category label, lowercased topic]`
pub fn default_labels(topic: &str) -> Vec<String> {
    vec![
        Category::for_topic(topic).label().to_string(),
        topic.to_lowercase(),
    ]
}

/// Placeholder post produced when every generation path failed
pub fn degenerate_draft(topic: &str) -> Draft {
    Draft {
        title: topic.to_string(),
        content: FAILURE_PLACEHOLDER.to_string(),
        labels: vec![FAILURE_LABEL.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::{LlmProvider, LlmResponse, ProviderChainBuilder};
    use crate::test_support::LogCapture;
    use crate::types::BlogError;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    /// Answers by phase; records every phase it was asked for
    #[derive(Default)]
    struct ScriptedProvider {
        outline: Option<Value>,
        header: Option<Value>,
        full_post: Option<Value>,
        failing_sections: Vec<String>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedProvider {
        fn with_outline(n: usize) -> Self {
            let sections: Vec<String> = (1..=n).map(|i| format!("S{i}")).collect();
            Self {
                outline: Some(json!({"topic": "t", "sections": sections})),
                header: Some(json!({
                    "title": "Header Title",
                    "content": "<h2>Intro</h2><p>opening words here</p>",
                    "labels": ["tech", "news"]
                })),
                ..Default::default()
            }
        }

        fn section_name(prompt: &str) -> Option<String> {
            let start = prompt.find("for the section \"")? + "for the section \"".len();
            let end = prompt[start..].find('"')?;
            Some(prompt[start..start + end].to_string())
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn generate(&self, prompt: &str) -> Result<LlmResponse> {
            let answer = if prompt.starts_with("[MODE: OUTLINE]") {
                self.calls.lock().unwrap().push("outline".into());
                self.outline.clone()
            } else if prompt.starts_with("[MODE: FULL_POST]") {
                self.calls.lock().unwrap().push("full_post".into());
                self.full_post.clone()
            } else if prompt.contains("\"title\"") {
                self.calls.lock().unwrap().push("header".into());
                self.header.clone()
            } else {
                let name = Self::section_name(prompt).unwrap_or_default();
                self.calls.lock().unwrap().push(format!("section:{name}"));
                if self.failing_sections.contains(&name) {
                    None
                } else {
                    Some(json!({
                        "content": format!(
                            "<h2>{name}</h2><p>body of {name}</p><table><tr><td>x</td></tr></table><script>mbtTOC();</script>"
                        )
                    }))
                }
            };
            answer
                .map(LlmResponse::content_only)
                .ok_or_else(|| BlogError::LlmApi("scripted failure".into()))
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "script"
        }
    }

    fn pipeline(provider: ScriptedProvider, sections: usize) -> SectionPipeline {
        let chain = ProviderChainBuilder::new().add_provider(provider).build();
        let post = PostConfig {
            outline_sections: sections,
            ..Default::default()
        };
        SectionPipeline::new(chain, post, &LogConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_full_outline_marks_fourteen_body_sections() {
        let provider = ScriptedProvider::with_outline(15);
        let generation = pipeline(provider, 15).generate("Latest Technology News", &[]).await;
        let content = &generation.draft.content;

        assert_eq!(content.matches(SECTION_MARKER_PREFIX).count(), 14);
        assert_eq!(content.matches(TOC_TRAILER).count(), 1);
        assert!(content.ends_with(TOC_TRAILER));
        assert!(content.starts_with("<h2>Intro</h2>"));
        assert!(!content.contains("<!-- Section: S1 -->"));
        assert!(content.contains(&section_marker("S2")));
        assert!(!content.contains("<table>"));
        assert_eq!(content.matches("mbtTOC();").count(), 1);

        assert_eq!(generation.draft.title, "Header Title");
        assert_eq!(generation.draft.labels, vec!["tech", "news"]);
        assert_eq!(generation.report.path, GenerationPath::Sections);
        assert!(generation.report.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_sections_follow_outline_order() {
        let provider = ScriptedProvider::with_outline(5);
        let calls = Arc::clone(&provider.calls);
        let generation = pipeline(provider, 5).generate("Viral News", &[]).await;

        let content = &generation.draft.content;
        let mut positions = vec![content.find("<h2>Intro</h2>").unwrap()];
        positions.extend((2..=5).map(|i| content.find(&section_marker(&format!("S{i}"))).unwrap()));
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let calls = calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec!["outline", "header", "section:S2", "section:S3", "section:S4", "section:S5"]
        );
    }

    #[tokio::test]
    async fn test_long_outline_is_truncated() {
        let provider = ScriptedProvider::with_outline(20);
        let generation = pipeline(provider, 15).generate("Viral News", &[]).await;
        assert_eq!(generation.report.outline_len, 15);
        assert!(!generation.draft.content.contains("<!-- Section: S16 -->"));
    }

    #[tokio::test]
    async fn test_outline_null_then_fallback_null_is_degenerate() {
        let provider = ScriptedProvider::default();
        let calls = Arc::clone(&provider.calls);
        let generation = pipeline(provider, 15).generate("Secret Societies", &[]).await;

        assert_eq!(*calls.lock().unwrap(), vec!["outline", "full_post"]);
        assert_eq!(generation.report.path, GenerationPath::Degenerate);
        assert_eq!(
            generation.draft,
            Draft {
                title: "Secret Societies".to_string(),
                content: "<p>Content generation failed.</p>".to_string(),
                labels: vec!["error".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_empty_sections_uses_fallback() {
        let provider = ScriptedProvider {
            outline: Some(json!({"topic": "t", "sections": []})),
            full_post: Some(json!({"title": "One Shot", "content": "<p>all of it</p>", "labels": ["x"]})),
            ..Default::default()
        };
        let calls = Arc::clone(&provider.calls);
        let generation = pipeline(provider, 15).generate("Education", &[]).await;

        assert_eq!(*calls.lock().unwrap(), vec!["outline", "full_post"]);
        assert_eq!(generation.report.path, GenerationPath::Fallback);
        assert_eq!(generation.draft.title, "One Shot");
        assert_eq!(generation.draft.content, "<p>all of it</p>");
    }

    #[tokio::test]
    async fn test_section_seven_failure_is_skipped() {
        let provider = ScriptedProvider {
            failing_sections: vec!["S7".to_string()],
            ..ScriptedProvider::with_outline(15)
        };
        let (logs, _guard) = LogCapture::install();
        let generation = pipeline(provider, 15).generate("Education", &[]).await;
        let content = &generation.draft.content;

        assert_eq!(content.matches(SECTION_MARKER_PREFIX).count(), 13);
        assert!(!content.contains("<!-- Section: S7 -->"));
        assert!(!content.contains("body of S7"));
        assert!(content.contains("<!-- Section: S8 -->"));
        assert_eq!(
            generation.report.skipped,
            vec![SkippedSection {
                index: 7,
                title: "S7".to_string()
            }]
        );

        let logs = logs.contents();
        assert!(logs.contains("WARN"));
        assert!(logs.contains("Failed to generate section 7 'S7', skipping"));
        assert!(!logs.contains("Failed to generate section 8"));
    }

    #[tokio::test]
    async fn test_header_failure_uses_defaults() {
        let provider = ScriptedProvider {
            header: None,
            ..ScriptedProvider::with_outline(3)
        };
        let generation = pipeline(provider, 3).generate("Scholarship Abroad", &[]).await;

        assert_eq!(generation.draft.title, "The Definitive Guide to Scholarship Abroad");
        assert_eq!(generation.draft.labels, vec!["scholarships", "scholarship abroad"]);
        assert!(!generation.report.header_generated);
        assert!(generation.draft.content.starts_with(&section_marker("S2")));
        assert_eq!(generation.draft.content.matches(SECTION_MARKER_PREFIX).count(), 2);
    }

    #[tokio::test]
    async fn test_header_without_title_gets_ultimate_guide() {
        let provider = ScriptedProvider {
            header: Some(json!({"content": "<p>intro</p>"})),
            ..ScriptedProvider::with_outline(2)
        };
        let generation = pipeline(provider, 2).generate("Viral News", &[]).await;
        assert_eq!(generation.draft.title, "The Ultimate Guide to Viral News");
        assert_eq!(generation.draft.labels, vec!["education", "viral news"]);
    }

    #[tokio::test]
    async fn test_news_reaches_every_prompt() {
        struct Recording(Arc<Mutex<Vec<String>>>);

        #[async_trait]
        impl LlmProvider for Recording {
            async fn generate(&self, prompt: &str) -> Result<LlmResponse> {
                self.0.lock().unwrap().push(prompt.to_string());
                Err(BlogError::LlmApi("no".into()))
            }
            fn name(&self) -> &str {
                "recording"
            }
            fn model(&self) -> &str {
                "rec"
            }
        }

        let prompts = Arc::new(Mutex::new(Vec::new()));
        let chain = ProviderChainBuilder::new()
            .add_provider(Recording(Arc::clone(&prompts)))
            .build();
        let pipeline =
            SectionPipeline::new(chain, PostConfig::default(), &LogConfig::default()).unwrap();

        let news = vec![NewsItem {
            title: "Grant program announced".into(),
            content: "Details".into(),
            link: "https://example.org/grant".into(),
            source: "Wire".into(),
            published: "Mon, 05 Jan 2026 09:00:00 GMT".into(),
        }];
        pipeline.generate("Education", &news).await;

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts.iter().all(|p| p.contains("Link: https://example.org/grant")));
    }

    #[test]
    fn test_default_labels() {
        assert_eq!(default_labels("Latest Technology News"), vec!["tech", "latest technology news"]);
    }
}
