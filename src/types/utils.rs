//! Shared utility functions.
//!
//! ## JSON Extraction Helpers
//!
//! Provider responses are loosely shaped, so fields are pulled out of
//! `serde_json::Value` one by one instead of deserializing into strict structs:
//! - `json_string` - Extract a string field
//! - `json_string_array` - Extract a string array, dropping non-string entries
//!
//! ## Text Helpers
//!
//! - `truncate_chars` - Character-boundary safe prefix
//! - `slugify` - Lowercase ASCII slug for identifiers

use std::fmt::Display;

// =============================================================================
// JSON Value Extraction Helpers
// =============================================================================

/// Extract string from JSON value by key.
#[inline]
pub fn json_string(value: &serde_json::Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(String::from)
}

/// Extract string array from JSON value by key.
///
/// Returns `None` when the key is absent or not an array.
#[inline]
pub fn json_string_array(value: &serde_json::Value, key: &str) -> Option<Vec<String>> {
    value.get(key).and_then(|v| v.as_array()).map(|arr| {
        arr.iter()
            .filter_map(|s| s.as_str().map(String::from))
            .collect()
    })
}

// =============================================================================
// Text Helpers
// =============================================================================

/// First `max_chars` characters of `s`.
///
/// Plain cut, not word-boundary aware.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Lowercase ASCII slug: alphanumerics kept, runs of anything else become `-`.
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut pending_dash = false;

    for ch in s.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Like `Result::ok` but logs the discarded error at warn level.
pub fn log_filter_warn<T, E: Display>(result: Result<T, E>, context: &str) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("{}: {}", context, e);
            None
        }
    }
}
