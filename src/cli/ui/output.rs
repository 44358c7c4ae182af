use console::style;

use crate::app::JobOutcome;
use crate::pipeline::GenerationPath;
use crate::types::NewsItem;

/// Styled terminal summaries for command results
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Aligned `key: value` line
    pub fn field(&self, key: &str, value: impl std::fmt::Display) {
        println!("  {:<10} {}", style(format!("{}:", key)).dim(), value);
    }

    pub fn job(&self, outcome: &JobOutcome) {
        let report = outcome.report();
        self.section("Generation");
        self.field("Session", &report.session_id);
        self.field(
            "Path",
            match report.path {
                GenerationPath::Sections => "outline + sections",
                GenerationPath::Fallback => "single-shot fallback",
                GenerationPath::Degenerate => "placeholder",
            },
        );
        if report.path == GenerationPath::Sections {
            self.field("Sections", format!("{} planned, {} skipped", report.outline_len, report.skipped.len()));
            for skipped in &report.skipped {
                self.warning(&format!("Section {} '{}' was skipped", skipped.index, skipped.title));
            }
        }

        match outcome {
            JobOutcome::Published {
                title,
                words,
                receipt,
                ..
            } => {
                self.field("Title", title);
                self.field("Words", words);
                match receipt.as_ref().and_then(|r| r.url.as_deref()) {
                    Some(url) => self.success(&format!("Posted: {}", url)),
                    None if receipt.is_some() => self.success("Posted"),
                    None => self.info("Post was not sent (dry run or missing credentials)"),
                }
            }
            JobOutcome::Skipped {
                word_count,
                min_words,
                ..
            } => {
                self.warning(&format!(
                    "Skipped: {} words < minimum {} (set FORCE_POST=true to post anyway)",
                    word_count, min_words
                ));
            }
        }
    }

    pub fn news(&self, items: &[NewsItem]) {
        self.section(&format!("News ({} items)", items.len()));
        for item in items {
            println!("{} {}", style(format!("[{}]", item.source)).cyan(), item.title);
            println!("  {}", style(&item.link).dim());
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
