//! Content sets - named card collections owned by one creator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Closed set of content categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TechnologyGaming,
    HealthFitness,
    FoodCooking,
    TravelLifestyle,
    EducationScience,
    EntertainmentPopculture,
    BusinessFinance,
    ArtsCrafts,
    ParentingFamily,
    FashionBeauty,
    SpaceExploration,
    Wellness,
    Nutrition,
    EarthMysteries,
    General,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::TechnologyGaming => "technology_gaming",
            Category::HealthFitness => "health_fitness",
            Category::FoodCooking => "food_cooking",
            Category::TravelLifestyle => "travel_lifestyle",
            Category::EducationScience => "education_science",
            Category::EntertainmentPopculture => "entertainment_popculture",
            Category::BusinessFinance => "business_finance",
            Category::ArtsCrafts => "arts_crafts",
            Category::ParentingFamily => "parenting_family",
            Category::FashionBeauty => "fashion_beauty",
            Category::SpaceExploration => "space_exploration",
            Category::Wellness => "wellness",
            Category::Nutrition => "nutrition",
            Category::EarthMysteries => "earth_mysteries",
            Category::General => "general",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Category {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "technology_gaming" => Ok(Category::TechnologyGaming),
            "health_fitness" => Ok(Category::HealthFitness),
            "food_cooking" => Ok(Category::FoodCooking),
            "travel_lifestyle" => Ok(Category::TravelLifestyle),
            "education_science" => Ok(Category::EducationScience),
            "entertainment_popculture" => Ok(Category::EntertainmentPopculture),
            "business_finance" => Ok(Category::BusinessFinance),
            "arts_crafts" => Ok(Category::ArtsCrafts),
            "parenting_family" => Ok(Category::ParentingFamily),
            "fashion_beauty" => Ok(Category::FashionBeauty),
            "space_exploration" => Ok(Category::SpaceExploration),
            "wellness" => Ok(Category::Wellness),
            "nutrition" => Ok(Category::Nutrition),
            "earth_mysteries" => Ok(Category::EarthMysteries),
            "general" => Ok(Category::General),
            other => Err(EngineError::InvalidInput(format!(
                "unknown category: {}",
                other
            ))),
        }
    }
}

/// Navigation patterns a set can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMode {
    /// Chronological order (historical events, mission timelines)
    Timeline,

    /// Grouped by theme labels
    Thematic,

    /// Beginner to advanced progression
    Difficulty,

    /// Session-stable shuffled order
    Random,
}

impl NavigationMode {
    /// Serialized name, used as the key into a card's navigation contexts.
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationMode::Timeline => "timeline",
            NavigationMode::Thematic => "thematic",
            NavigationMode::Difficulty => "difficulty",
            NavigationMode::Random => "random",
        }
    }
}

impl std::fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NavigationMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "timeline" => Ok(NavigationMode::Timeline),
            "thematic" => Ok(NavigationMode::Thematic),
            "difficulty" => Ok(NavigationMode::Difficulty),
            "random" => Ok(NavigationMode::Random),
            other => Err(EngineError::InvalidInput(format!(
                "unknown navigation mode: {}",
                other
            ))),
        }
    }
}

/// Lifecycle status of a content set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetStatus {
    Draft,
    Published,
    Archived,
}

impl Default for SetStatus {
    fn default() -> Self {
        Self::Draft
    }
}

/// A named collection of cards belonging to one creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSet {
    /// Unique identifier (creator id + title slug + random suffix)
    pub set_id: String,

    /// Owning creator (must resolve at write time)
    pub creator_id: String,

    /// Display title
    pub title: String,

    /// Short description for discovery surfaces
    #[serde(default)]
    pub description: String,

    /// Content category
    pub category: Category,

    /// Declared number of cards in the set
    #[serde(default)]
    pub card_count: u32,

    /// Navigation modes the viewer may request for this set
    #[serde(default)]
    pub supported_navigation: Vec<NavigationMode>,

    /// Homepage hero flag; at most one set store-wide may carry it
    #[serde(default)]
    pub is_hero: bool,

    /// Lifecycle status
    #[serde(default)]
    pub status: SetStatus,

    /// Free-form tags; discovery rows match on these
    #[serde(default)]
    pub tags: Vec<String>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last replaced
    pub updated_at: DateTime<Utc>,
}

impl ContentSet {
    /// Create a new draft set.
    pub fn new(
        set_id: impl Into<String>,
        creator_id: impl Into<String>,
        title: impl Into<String>,
        category: Category,
    ) -> Self {
        let now = Utc::now();
        Self {
            set_id: set_id.into(),
            creator_id: creator_id.into(),
            title: title.into(),
            description: String::new(),
            category,
            card_count: 0,
            supported_navigation: Vec::new(),
            is_hero: false,
            status: SetStatus::default(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare the supported navigation modes.
    pub fn with_navigation(mut self, modes: impl IntoIterator<Item = NavigationMode>) -> Self {
        self.supported_navigation.extend(modes);
        self
    }

    /// Set the lifecycle status.
    pub fn with_status(mut self, status: SetStatus) -> Self {
        self.status = status;
        self
    }

    /// Add a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Whether the set declares the given navigation mode.
    pub fn supports(&self, mode: NavigationMode) -> bool {
        self.supported_navigation.contains(&mode)
    }
}
