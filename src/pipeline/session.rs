//! Generation session correlation id

use chrono::{DateTime, Utc};

use crate::types::slugify;

/// Ephemeral id tying together the log lines of one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSession {
    id: String,
    topic: String,
    started_at: DateTime<Utc>,
}

impl GenerationSession {
    pub fn new(topic: &str) -> Self {
        Self::at(topic, Utc::now())
    }

    pub fn at(topic: &str, started_at: DateTime<Utc>) -> Self {
        let slug = slugify(topic);
        let slug = if slug.is_empty() { "post".to_string() } else { slug };
        Self {
            id: format!("{}-{}", slug, started_at.format("%Y%m%dT%H%M%S")),
            topic: topic.to_string(),
            started_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_session_id() {
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        let session = GenerationSession::at("Scholarship in USA/Japan/UK", at);
        assert_eq!(session.id(), "scholarship-in-usa-japan-uk-20260105T090000");
        assert_eq!(session.topic(), "Scholarship in USA/Japan/UK");
    }

    #[test]
    fn test_unsluggable_topic() {
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        assert_eq!(GenerationSession::at("!!!", at).id(), "post-20260105T090000");
    }
}
