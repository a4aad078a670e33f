//! Cards - the individual content units inside a set.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::set::NavigationMode;

/// Media content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Image,
    Video,
    Audio,
}

/// Whether a media URL has been checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Pending,
    Verified,
    Failed,
}

impl Default for ValidationStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// A media reference embedded in a card. Lifecycle is tied entirely to the
/// owning card; media is never independently addressable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaReference {
    /// Kind of media
    pub media_type: MediaType,

    /// Source URL
    pub url: String,

    /// Accessibility text
    #[serde(default)]
    pub alt_text: String,

    /// URL validation state
    #[serde(default)]
    pub validation_status: ValidationStatus,
}

impl MediaReference {
    pub fn new(media_type: MediaType, url: impl Into<String>) -> Self {
        Self {
            media_type,
            url: url.into(),
            alt_text: String::new(),
            validation_status: ValidationStatus::default(),
        }
    }

    /// Set the accessibility text.
    pub fn with_alt_text(mut self, alt_text: impl Into<String>) -> Self {
        self.alt_text = alt_text.into();
        self
    }
}

/// One content unit within a set.
///
/// `creator_id` is denormalized from the owning set and must match it; the
/// validator enforces the pair. `order_index` is 1-based and unique within
/// the set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// Derived identifier: `{set_id}_card_{order_index:03}`
    pub card_id: String,

    /// Owning set
    pub set_id: String,

    /// Owning creator (must equal the set's creator)
    pub creator_id: String,

    /// Card title
    pub title: String,

    /// One-paragraph summary
    #[serde(default)]
    pub summary: String,

    /// Full body text
    #[serde(default)]
    pub detailed_content: String,

    /// 1-based position within the set
    pub order_index: u32,

    /// Mode name → free-form context object. Known keys by convention:
    /// `chronological_key` (timeline), `theme` (thematic), `tier`
    /// (difficulty).
    #[serde(default)]
    pub navigation_contexts: BTreeMap<String, Value>,

    /// Embedded media references
    #[serde(default)]
    pub media: Vec<MediaReference>,

    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Domain-specific passthrough data; the migration importer parks
    /// unrecognized legacy fields here
    #[serde(default)]
    pub domain_data: BTreeMap<String, Value>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last replaced
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// Create a new card with empty content fields.
    pub fn new(
        card_id: impl Into<String>,
        set_id: impl Into<String>,
        creator_id: impl Into<String>,
        title: impl Into<String>,
        order_index: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            card_id: card_id.into(),
            set_id: set_id.into(),
            creator_id: creator_id.into(),
            title: title.into(),
            summary: String::new(),
            detailed_content: String::new(),
            order_index,
            navigation_contexts: BTreeMap::new(),
            media: Vec::new(),
            tags: Vec::new(),
            domain_data: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Set the body text.
    pub fn with_detailed_content(mut self, content: impl Into<String>) -> Self {
        self.detailed_content = content.into();
        self
    }

    /// Attach a context object for a navigation mode.
    pub fn with_context(mut self, mode: NavigationMode, context: Value) -> Self {
        self.navigation_contexts
            .insert(mode.as_str().to_string(), context);
        self
    }

    /// Attach a media reference.
    pub fn with_media(mut self, media: MediaReference) -> Self {
        self.media.push(media);
        self
    }

    /// The context object for a mode, if the card carries one.
    pub fn nav_context(&self, mode: NavigationMode) -> Option<&Value> {
        self.navigation_contexts.get(mode.as_str())
    }

    /// String value under `key` in the mode's context.
    pub fn context_str(&self, mode: NavigationMode, key: &str) -> Option<&str> {
        self.nav_context(mode)?.get(key)?.as_str()
    }

    /// Integer value under `key` in the mode's context.
    pub fn context_i64(&self, mode: NavigationMode, key: &str) -> Option<i64> {
        self.nav_context(mode)?.get(key)?.as_i64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_accessors() {
        let card = Card::new("s1_card_001", "s1", "c1", "First landing", 1)
            .with_context(NavigationMode::Timeline, json!({"chronological_key": 1969}))
            .with_context(NavigationMode::Thematic, json!({"theme": "apollo"}));

        assert_eq!(
            card.context_i64(NavigationMode::Timeline, "chronological_key"),
            Some(1969)
        );
        assert_eq!(
            card.context_str(NavigationMode::Thematic, "theme"),
            Some("apollo")
        );
        assert_eq!(card.context_str(NavigationMode::Difficulty, "tier"), None);
    }

    #[test]
    fn test_card_serde_defaults() {
        let json = json!({
            "card_id": "s1_card_001",
            "set_id": "s1",
            "creator_id": "c1",
            "title": "First landing",
            "order_index": 1,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        });

        let card: Card = serde_json::from_value(json).unwrap();
        assert!(card.media.is_empty());
        assert!(card.navigation_contexts.is_empty());
        assert!(card.domain_data.is_empty());
    }

    #[test]
    fn test_media_defaults_to_pending() {
        let media = MediaReference::new(MediaType::Video, "https://example.com/v.mp4");
        assert_eq!(media.validation_status, ValidationStatus::Pending);
    }
}
