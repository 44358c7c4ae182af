//! RSS 2.0 / RSS 1.0 / Atom parsing.
//!
//! Only the fields the collector needs are read; everything else is skipped.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::types::{BlogError, Result};

/// One `<item>` or `<entry>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    /// `<description>` / `<summary>`
    pub summary: String,
    /// `<content:encoded>` / `<content>`
    pub content: String,
    /// `<pubDate>` / `<published>` / `<dc:date>`
    pub published: String,
    /// Atom `<updated>`
    pub updated: String,
}

impl FeedEntry {
    /// Publication date, falling back to the Atom update date
    pub fn date(&self) -> &str {
        if self.published.trim().is_empty() {
            self.updated.trim()
        } else {
            self.published.trim()
        }
    }

    /// Richest text body available
    pub fn body(&self) -> &str {
        if self.content.trim().is_empty() {
            &self.summary
        } else {
            &self.content
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFeed {
    /// Channel / feed title
    pub title: Option<String>,
    pub entries: Vec<FeedEntry>,
}

/// Parse a feed document fetched from `url`
pub fn parse_feed(xml: &str, url: &str) -> Result<ParsedFeed> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut feed = ParsedFeed::default();
    let mut path: Vec<String> = Vec::new();
    let mut entry: Option<FeedEntry> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = local_name(&e);
                if is_entry(&name) {
                    entry = Some(FeedEntry::default());
                } else if name == "link"
                    && let Some(current) = entry.as_mut()
                {
                    atom_link(&e, current);
                }
                path.push(name);
            }
            Ok(Event::Empty(e)) => {
                if local_name(&e) == "link"
                    && let Some(current) = entry.as_mut()
                {
                    atom_link(&e, current);
                }
            }
            Ok(Event::End(_)) => {
                if let Some(name) = path.pop()
                    && is_entry(&name)
                    && let Some(done) = entry.take()
                {
                    feed.entries.push(done);
                }
            }
            Ok(Event::Text(t)) => {
                let text = match t.unescape() {
                    Ok(text) => text.into_owned(),
                    // Undeclared HTML entities such as `&nbsp;`
                    Err(_) => String::from_utf8_lossy(&t).into_owned(),
                };
                append_text(&mut feed, entry.as_mut(), &path, &text);
            }
            Ok(Event::CData(c)) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                append_text(&mut feed, entry.as_mut(), &path, &text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(BlogError::feed(
                    url,
                    format!("XML error at byte {}: {}", reader.error_position(), e),
                ));
            }
        }
    }

    Ok(feed)
}

fn is_entry(name: &str) -> bool {
    name == "item" || name == "entry"
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Option<String> {
    e.try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|attr| attr.unescape_value().ok())
        .map(|value| value.into_owned())
}

/// Atom `<link href=".." rel="alternate"/>`
fn atom_link(e: &BytesStart<'_>, entry: &mut FeedEntry) {
    if !entry.link.is_empty() {
        return;
    }
    if attribute(e, "rel").is_some_and(|rel| rel != "alternate") {
        return;
    }
    if let Some(href) = attribute(e, "href") {
        entry.link = href;
    }
}

fn append_text(feed: &mut ParsedFeed, entry: Option<&mut FeedEntry>, path: &[String], text: &str) {
    let [.., parent, current] = path else {
        return;
    };

    match entry {
        Some(entry) if is_entry(parent) => {
            let field = match current.as_str() {
                "title" => &mut entry.title,
                "link" => &mut entry.link,
                "description" | "summary" => &mut entry.summary,
                "encoded" | "content" => &mut entry.content,
                "pubDate" | "published" | "date" => &mut entry.published,
                "updated" => &mut entry.updated,
                _ => return,
            };
            field.push_str(text);
        }
        Some(_) => {}
        None => {
            if current == "title" && (parent == "channel" || parent == "feed") && feed.title.is_none() {
                feed.title = Some(text.to_string());
            }
        }
    }
}
