//! Creator profiles - the root entities of the content graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::set::Category;

/// A platform/handle pair, e.g. `youtube` / `@somechannel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformHandle {
    /// Platform name (youtube, instagram, tiktok, website, ...)
    pub platform: String,

    /// Handle or URL on that platform
    pub handle: String,
}

impl PlatformHandle {
    pub fn new(platform: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            handle: handle.into(),
        }
    }
}

/// A content author. Identifier is globally unique and immutable after
/// creation; display names may repeat (the validator warns, never rejects).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creator {
    /// Unique identifier (slug + random suffix)
    pub creator_id: String,

    /// Human-readable name shown on creator cards
    pub display_name: String,

    /// Platform handles (zero or more)
    #[serde(default)]
    pub handles: Vec<PlatformHandle>,

    /// Short bio / content focus description
    #[serde(default)]
    pub description: String,

    /// Declared content categories
    #[serde(default)]
    pub categories: Vec<Category>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last replaced
    pub updated_at: DateTime<Utc>,
}

impl Creator {
    /// Create a new creator with the given identity.
    pub fn new(creator_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            creator_id: creator_id.into(),
            display_name: display_name.into(),
            handles: Vec::new(),
            description: String::new(),
            categories: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a platform handle.
    pub fn with_handle(mut self, platform: impl Into<String>, handle: impl Into<String>) -> Self {
        self.handles.push(PlatformHandle::new(platform, handle));
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a content category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_builder() {
        let creator = Creator::new("astro_channel_ab12cd34", "Canal do Astrofísico")
            .with_handle("youtube", "@canaldoastrofisico")
            .with_description("Física e astronomia descomplicadas")
            .with_category(Category::SpaceExploration);

        assert_eq!(creator.creator_id, "astro_channel_ab12cd34");
        assert_eq!(creator.handles.len(), 1);
        assert_eq!(creator.categories, vec![Category::SpaceExploration]);
    }

    #[test]
    fn test_creator_serde_field_names() {
        let creator = Creator::new("c1", "Name").with_handle("website", "example.com");
        let json = serde_json::to_value(&creator).unwrap();

        assert!(json.get("creator_id").is_some());
        assert!(json.get("display_name").is_some());
        assert_eq!(json["handles"][0]["platform"], "website");
        assert!(json.get("created_at").is_some());
    }
}
