//! cardgraph - Content graph store and discovery engine
//!
//! A library-level engine for assembling and traversing educational card
//! collections (Creator → ContentSet → Card).
//!
//! # Architecture
//!
//! The engine is built around three persisted entity containers:
//! - Every write goes through the batch writer: validate everything,
//!   then commit everything, or commit nothing
//! - Containers rewrite atomically (stage-then-swap), so a crash never
//!   leaves a half-written file
//! - Reads serve from per-kind in-memory caches
//!
//! # Modules
//!
//! - `domain`: Entity types and identifier generation
//! - `store`: Persistence, validation, batch writes, legacy migration
//! - `view`: Navigation sequencing and homepage curation
//! - `engine`: The public handle combining all of the above
//!
//! # Usage
//!
//! ```rust,ignore
//! use cardgraph::{Engine, NavigationMode};
//!
//! let mut engine = Engine::open_default()?;
//! let homepage = engine.build_homepage().await?;
//! let order = engine.sequence("some_set_id", NavigationMode::Timeline, "").await?;
//! ```

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod store;
pub mod view;

// Re-export main types at crate root for convenience
pub use domain::{
    Card, Category, ContentSet, Creator, EntityKind, MediaReference, MediaType, NavigationMode,
    PlatformHandle, SetStatus, ValidationStatus,
};
pub use engine::{CascadeReport, Engine, EngineConfig, NewCard, NewCreator, NewSet, SetFilter};
pub use error::{BatchFailure, EngineError, Result};
pub use store::{import_legacy_cards, EntityStore, LegacyCard, MigrationReport, Record};
pub use view::{Homepage, HomepageRow, Position};
