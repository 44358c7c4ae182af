//! Article text extraction.
//!
//! Paragraphs are taken from the most specific container that yields enough
//! text: `<article>`, then `articleBody` microdata, then `<main>`, then any
//! `<p>` on the page.

use scraper::{Html, Selector};

use crate::constants::news::MIN_ARTICLE_CHARS;
use crate::types::{BlogError, Result};

const SELECTORS: [&str; 4] = [
    "article p",
    "[itemprop='articleBody'] p",
    "main p",
    "p",
];

#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    selectors: Vec<Selector>,
    min_chars: usize,
}

impl ArticleExtractor {
    pub fn new() -> Result<Self> {
        let selectors = SELECTORS
            .iter()
            .map(|s| {
                Selector::parse(s)
                    .map_err(|e| BlogError::Config(format!("Invalid selector {}: {}", s, e)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            selectors,
            min_chars: MIN_ARTICLE_CHARS,
        })
    }

    /// Paragraph text separated by blank lines, or `None` when the page has too little
    pub fn extract(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);

        self.selectors.iter().find_map(|selector| {
            let paragraphs: Vec<String> = document
                .select(selector)
                .map(|p| {
                    p.text()
                        .flat_map(str::split_whitespace)
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .filter(|text| !text.is_empty())
                .collect();

            let text = paragraphs.join("\n\n");
            (text.chars().count() >= self.min_chars).then_some(text)
        })
    }
}
