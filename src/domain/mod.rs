//! Domain types for the content graph.
//!
//! Three entity kinds form the ownership chain Creator → ContentSet → Card.
//! Cross-references are by identifier only; no record owns another record's
//! memory. Serialized field names are the persisted schema and must not
//! drift once data has been migrated.

pub mod card;
pub mod creator;
pub mod ids;
pub mod set;

pub use card::{Card, MediaReference, MediaType, ValidationStatus};
pub use creator::{Creator, PlatformHandle};
pub use set::{Category, ContentSet, NavigationMode, SetStatus};

use serde::{Deserialize, Serialize};

/// The three addressable entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Creator,
    ContentSet,
    Card,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Creator => write!(f, "creator"),
            EntityKind::ContentSet => write!(f, "content_set"),
            EntityKind::Card => write!(f, "card"),
        }
    }
}
