//! Templated progress messages
//!
//! Messages are `info` events on the `autoblog::progress` target, emitted
//! only when `log.verbose` is set. Placeholders are `{name}`; unknown
//! placeholders are left as written.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::info;

use crate::config::{LogConfig, MessageTemplates};

#[derive(Debug, Clone)]
pub struct Progress {
    verbose: bool,
    messages: MessageTemplates,
}

impl Progress {
    pub fn new(config: &LogConfig) -> Self {
        Self {
            verbose: config.verbose,
            messages: config.messages.clone(),
        }
    }

    pub fn start(&self, topic: &str) {
        self.emit(render(&self.messages.start, &[("topic", topic.to_string())]));
    }

    pub fn outline_request(&self, n: usize) {
        self.emit(render(&self.messages.outline_request, &[("n", n.to_string())]));
    }

    pub fn outline_ready(&self, n: usize) {
        self.emit(render(&self.messages.outline_ready, &[("n", n.to_string())]));
    }

    pub fn header(&self) {
        self.emit(self.messages.header.clone());
    }

    pub fn section(&self, i: usize, total: usize, section: &str) {
        self.emit(render(
            &self.messages.section,
            &[
                ("i", i.to_string()),
                ("total", total.to_string()),
                ("section", section.to_string()),
            ],
        ));
    }

    pub fn complete(&self, wc: usize, min: usize, max: usize) {
        self.emit(render(
            &self.messages.complete,
            &[
                ("wc", wc.to_string()),
                ("min", min.to_string()),
                ("max", max.to_string()),
            ],
        ));
    }

    /// Untemplated progress line
    pub fn note(&self, message: &str) {
        self.emit(message.to_string());
    }

    fn emit(&self, message: String) {
        if self.verbose {
            info!(target: "autoblog::progress", "{}", message);
        }
    }
}

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(\w+)\}").unwrap());

/// Substitute `{key}` placeholders in one pass; inserted values are not rescanned
pub fn render(template: &str, values: &[(&str, String)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            values
                .iter()
                .find(|(key, _)| *key == &caps[1])
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
