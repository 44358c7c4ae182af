//! Section sanitization
//!
//! Body sections must not carry their own tables or table-of-contents
//! fragments; the document gets exactly one TOC trigger at the end.

use regex::Regex;

use crate::types::Result;

/// Case-insensitive, dot matches newline, non-greedy
const PATTERNS: [&str; 4] = [
    r"(?is)<table.*?</table>",
    r#"(?is)<div class="mbtTOC".*?</div>"#,
    r"(?is)<script>mbtTOC.*?</script>",
    r"(?is)<!---.*?--->",
];

/// Removes tables, TOC blocks and triple-dash comment blocks from a fragment
#[derive(Debug, Clone)]
pub struct Sanitizer {
    patterns: Vec<Regex>,
}

impl Sanitizer {
    pub fn new() -> Result<Self> {
        let patterns = PATTERNS
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Apply every removal in order
    pub fn sanitize(&self, html: &str) -> String {
        self.patterns
            .iter()
            .fold(html.to_string(), |acc, re| re.replace_all(&acc, "").into_owned())
    }
}
