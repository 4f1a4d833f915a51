use chrono::{DateTime, Utc};
use feed_rs::model::Entry;
use serde::{Deserialize, Serialize};

/// A single post as it came out of the feed.
///
/// Every field has a defined default, so nothing downstream has to guess
/// between alternate feed attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub link: String,
    pub published_or_updated_at: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
    pub content: String,
}

impl Post {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            published_or_updated_at: None,
            categories: Vec::new(),
            content: String::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.published_or_updated_at = Some(timestamp);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Identity of the post for link comparisons: the link without trailing `/`.
    pub fn normalized_link(&self) -> &str {
        self.link.trim_end_matches('/')
    }

    /// Normalize a parsed feed entry into a `Post`.
    pub fn from_entry(entry: Entry) -> Self {
        let title = entry.title.map(|t| t.content).unwrap_or_default();

        let link = entry
            .links
            .iter()
            .find(|l| l.rel.as_deref().is_none_or(|rel| rel == "alternate"))
            .or_else(|| entry.links.first())
            .map(|l| l.href.clone())
            .unwrap_or_default();

        let categories = entry.categories.into_iter().map(|c| c.term).collect();

        let content = entry
            .content
            .and_then(|c| c.body)
            .or_else(|| entry.summary.map(|s| s.content))
            .unwrap_or_default();

        Self {
            title,
            link,
            published_or_updated_at: entry.updated.or(entry.published),
            categories,
            content,
        }
    }
}

/// Parse a raw feed date string (RFC 2822 as used by RSS, or RFC 3339 as used by Atom).
pub fn parse_feed_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
