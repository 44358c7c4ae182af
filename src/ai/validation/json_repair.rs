//! JSON Repair Mechanism
//!
//! Two-stage extraction for LLM responses:
//!
//! 1. Take the body of a ```` ```json ```` fence, else of a generic ```` ``` ````
//!    fence, else the whole (trimmed) text.
//! 2. Parse, tolerating raw control characters inside string literals.
//! 3. On failure, escape every bare newline (one not preceded by `\`), every
//!    carriage return and every tab, then parse once more.
//!
//! A second failure is final. There is no open-ended patching beyond this.

use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{BlogError, Result, truncate_chars};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

// =============================================================================
// Convenience Functions
// =============================================================================

/// Extract and parse JSON, returning whether the escape pass was needed
pub fn extract_json_with_repair_status(content: &str) -> Result<(Value, bool)> {
    JsonRepairer::new().parse_or_repair(content)
}

// =============================================================================
// JsonRepairer
// =============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRepairer;

impl JsonRepairer {
    pub fn new() -> Self {
        Self
    }

    /// Parse JSON, attempting the escape pass if the first parse fails
    ///
    /// Returns (Value, was_repaired)
    pub fn parse_or_repair(&self, raw: &str) -> Result<(Value, bool)> {
        let body = strip_code_fences(raw);

        let first_err = match parse_tolerant(body) {
            Ok(value) => return Ok((value, false)),
            Err(e) => e,
        };
        debug!(error = %first_err, "Initial JSON parse failed, escaping bare whitespace");

        let escaped = escape_bare_whitespace(body);
        match parse_tolerant(&escaped) {
            Ok(value) => {
                warn!("JSON repaired by escaping bare newlines/tabs");
                Ok((value, true))
            }
            Err(e) => Err(BlogError::LlmApi(format!(
                "Failed to parse JSON ({}). Content preview: {}...",
                e,
                truncate_chars(body, 200)
            ))),
        }
    }
}

// =============================================================================
// Transforms
// =============================================================================

/// Body of the first ```` ```json ```` fence, else of the first generic fence.
///
/// An unterminated fence yields everything after the opener.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();

    let after = if let Some(idx) = text.find(JSON_FENCE) {
        &text[idx + JSON_FENCE.len()..]
    } else if let Some(idx) = text.find(FENCE) {
        &text[idx + FENCE.len()..]
    } else {
        return text;
    };

    match after.find(FENCE) {
        Some(end) => after[..end].trim(),
        None => after.trim(),
    }
}

/// Every `\n` not preceded by `\` becomes `\\n`; every `\r` and `\t` are escaped.
pub fn escape_bare_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut prev: Option<char> = None;

    for ch in text.chars() {
        match ch {
            '\n' if prev != Some('\\') => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
        prev = Some(ch);
    }

    out
}

/// Parse JSON, accepting raw control characters inside string literals.
fn parse_tolerant(text: &str) -> serde_json::Result<Value> {
    serde_json::from_str(&escape_controls_in_strings(text))
}

/// Escape control characters that appear inside string literals.
///
/// Structure outside strings is left untouched, so whitespace between tokens
/// still parses as whitespace.
fn escape_controls_in_strings(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escape = false;

    for ch in text.chars() {
        if escape {
            escape = false;
            out.push(ch);
            continue;
        }

        match ch {
            '\\' if in_string => {
                escape = true;
                out.push(ch);
            }
            '"' => {
                in_string = !in_string;
                out.push(ch);
            }
            c if in_string && (c as u32) < 0x20 => match c {
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                other => out.push_str(&format!("\\u{:04x}", other as u32)),
            },
            _ => out.push(ch),
        }
    }

    out
}
