//! Item types for TagRelay.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One unit of source content: a channel post with extracted hashtags.
///
/// `tags` and the text fields are immutable after ingestion for the
/// purposes of matching; only metadata counters may be refreshed in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Source item id, monotonic with ingestion order where available.
    pub id: i64,
    /// Headline line of the post ("needs" section).
    pub needs: String,
    /// Main body text.
    pub body: String,
    /// Normalized hashtags extracted from the post.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Canonical URL from the post body.
    #[serde(default)]
    pub url: String,
    /// Channel message id, when known, for building a deep link back to
    /// the source post.
    #[serde(default)]
    pub message_id: Option<i64>,
    /// When the item was ingested.
    #[serde(default = "Utc::now")]
    pub ingested_at: DateTime<Utc>,
}

impl Item {
    /// Create a new item with the given id, headline, and body.
    pub fn new(id: i64, needs: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            needs: needs.into(),
            body: body.into(),
            tags: BTreeSet::new(),
            url: String::new(),
            message_id: None,
            ingested_at: Utc::now(),
        }
    }

    /// Set the tag set.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the canonical URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the channel message id.
    pub fn with_message_id(mut self, message_id: i64) -> Self {
        self.message_id = Some(message_id);
        self
    }
}
