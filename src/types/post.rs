//! Structured provider results and the post artifacts built from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::utils::{json_string, json_string_array};

// =============================================================================
// Provider Result Shapes
// =============================================================================

/// `{"topic": ..., "sections": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub topic: String,
    pub sections: Vec<String>,
}

impl Outline {
    /// Read an outline from a provider result.
    ///
    /// `None` unless `sections` is a non-empty array of strings.
    pub fn from_value(value: &Value) -> Option<Self> {
        let sections = json_string_array(value, "sections")?;
        if sections.is_empty() {
            return None;
        }
        Some(Self {
            topic: json_string(value, "topic").unwrap_or_default(),
            sections,
        })
    }

    /// Drop entries beyond `max`
    pub fn truncate(&mut self, max: usize) {
        self.sections.truncate(max);
    }
}

/// `{"content": ..., "title"?: ..., "labels"?: [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionResult {
    /// HTML fragment
    pub content: String,
    pub title: Option<String>,
    pub labels: Option<Vec<String>>,
}

impl SectionResult {
    /// Strict read: `None` unless `content` is a string.
    pub fn from_value(value: &Value) -> Option<Self> {
        let content = json_string(value, "content")?;
        Some(Self {
            content,
            ..Self::lenient(value)
        })
    }

    /// Lenient read: every field optional, content defaults to empty.
    pub fn lenient(value: &Value) -> Self {
        Self {
            content: json_string(value, "content").unwrap_or_default(),
            title: json_string(value, "title").filter(|t| !t.trim().is_empty()),
            labels: json_string_array(value, "labels"),
        }
    }
}

// =============================================================================
// Post Artifacts
// =============================================================================

/// Pipeline output before presentation constraints are applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub content: String,
    pub labels: Vec<String>,
}

/// Final publishable document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub content: String,
    pub labels: Vec<String>,
}
