//! Topics and content categories.
//!
//! A *topic* is what a post is about and comes from a configured allow-list.
//! A *category* is one of five fixed buckets every generated news item is
//! filed under; categories also carry the keyword lists used to filter feeds.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{BlogError, Result};

// =============================================================================
// Category
// =============================================================================

/// The five fixed content categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Education,
    Scholarships,
    International,
    Tech,
    Gadgets,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Education,
        Category::Scholarships,
        Category::International,
        Category::Tech,
        Category::Gadgets,
    ];

    /// Display name used in prompts
    pub fn title(&self) -> &'static str {
        match self {
            Self::Education => "Education & Learning",
            Self::Scholarships => "Scholarships & Study Abroad",
            Self::International => "International (Overseas) News",
            Self::Tech => "Latest Tech News",
            Self::Gadgets => "Unique & Innovative Gadget Reviews",
        }
    }

    /// Short label attached to posts
    pub fn label(&self) -> &'static str {
        match self {
            Self::Education => "education",
            Self::Scholarships => "scholarships",
            Self::International => "international",
            Self::Tech => "tech",
            Self::Gadgets => "gadgets",
        }
    }

    /// Lowercase keywords matched as substrings against feed text
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Education => &[
                "education",
                "learning",
                "university",
                "school",
                "student",
                "teacher",
                "curriculum",
                "online course",
            ],
            Self::Scholarships => &[
                "scholarship",
                "study abroad",
                "fellowship",
                "grant",
                "international student",
                "funding",
                "bursary",
            ],
            Self::International => &[
                "world news",
                "international",
                "global",
                "foreign",
                "un",
                "diplomacy",
                "overseas",
            ],
            Self::Tech => &[
                "technology",
                "tech",
                "ai",
                "artificial intelligence",
                "software",
                "innovation",
                "cyber",
                "hardware",
            ],
            Self::Gadgets => &[
                "gadget",
                "review",
                "smartphone",
                "laptop",
                "wearable",
                "iot",
                "device",
                "unboxing",
            ],
        }
    }

    /// Whether any keyword of this category occurs in `text`
    pub fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords().iter().any(|kw| lower.contains(kw))
    }

    /// Whether `text` matches any category at all
    pub fn any_matches(text: &str) -> bool {
        Self::ALL.iter().any(|c| c.matches(text))
    }

    /// Category a topic most likely belongs to; `Education` when nothing matches
    pub fn for_topic(topic: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.matches(topic))
            .unwrap_or(Self::Education)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

// =============================================================================
// Topic Selection
// =============================================================================

/// Default topic allow-list
pub const DEFAULT_TOPICS: [&str; 7] = [
    "Education",
    "Scholarship Abroad",
    "Latest Technology News",
    "Scholarship in USA/Japan/UK",
    "Global Breaking News",
    "Viral News",
    "Secret Societies",
];

/// Resolves requested topics against a non-empty allow-list
#[derive(Debug, Clone)]
pub struct TopicSelector {
    allowed: Vec<String>,
}

impl TopicSelector {
    pub fn new(allowed: Vec<String>) -> Result<Self> {
        if allowed.is_empty() {
            return Err(BlogError::Config(
                "Topic allow-list must not be empty".to_string(),
            ));
        }
        Ok(Self { allowed })
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.allowed.iter().any(|t| t == topic)
    }

    /// Uniformly random allow-listed topic
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let idx = rng.random_range(0..self.allowed.len());
        self.allowed[idx].clone()
    }

    /// Keep a requested topic only if it is allow-listed; otherwise pick one at random.
    pub fn resolve<R: Rng + ?Sized>(&self, requested: Option<&str>, rng: &mut R) -> String {
        match requested.map(str::trim).filter(|t| !t.is_empty()) {
            Some(topic) if self.contains(topic) => topic.to_string(),
            Some(topic) => {
                tracing::warn!(
                    requested = topic,
                    allowed = %self.allowed.join(", "),
                    "Requested topic is not allow-listed, choosing a random one"
                );
                self.random(rng)
            }
            None => self.random(rng),
        }
    }
}

impl Default for TopicSelector {
    fn default() -> Self {
        Self {
            allowed: DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_category_for_topic() {
        assert_eq!(Category::for_topic("Scholarship Abroad"), Category::Scholarships);
        assert_eq!(Category::for_topic("Latest Technology News"), Category::Tech);
        assert_eq!(Category::for_topic("Global Breaking News"), Category::International);
        assert_eq!(Category::for_topic("Secret Societies"), Category::Education);
    }

    #[test]
    fn test_category_matches_case_insensitive() {
        assert!(Category::Gadgets.matches("New SMARTPHONE unveiled"));
        assert!(Category::any_matches("University fees rise"));
        assert!(!Category::any_matches("zzz qqq"));
    }

    #[test]
    fn test_selector_rejects_empty_allow_list() {
        assert!(TopicSelector::new(Vec::new()).is_err());
    }

    #[test]
    fn test_resolve_keeps_allowed_topic() {
        let selector = TopicSelector::default();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(selector.resolve(Some("Viral News"), &mut rng), "Viral News");
        assert_eq!(selector.resolve(Some("  Viral News  "), &mut rng), "Viral News");
    }

    #[test]
    fn test_resolve_blank_picks_random() {
        let selector = TopicSelector::default();
        let mut rng = StdRng::seed_from_u64(7);
        let topic = selector.resolve(Some("   "), &mut rng);
        assert!(selector.contains(&topic));
        let topic = selector.resolve(None, &mut rng);
        assert!(selector.contains(&topic));
    }

    proptest! {
        #[test]
        fn prop_resolved_topic_is_always_allowed(requested in ".*", seed in any::<u64>()) {
            let selector = TopicSelector::default();
            let mut rng = StdRng::seed_from_u64(seed);
            let resolved = selector.resolve(Some(&requested), &mut rng);
            prop_assert!(selector.contains(&resolved));
        }
    }
}
