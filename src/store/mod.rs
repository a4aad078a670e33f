//! Persistence and write-path logic.
//!
//! This module contains:
//! - EntityStore: per-kind JSON containers with caching and atomic rewrites
//! - Validator: referential-integrity checks over a merged store view
//! - BatchWriter: all-or-nothing multi-record commits
//! - Migration: one-shot legacy flat-card import

pub mod batch;
pub mod entity_store;
pub mod migrate;
pub mod validate;

pub use batch::{BatchWriter, Record};
pub use entity_store::{Entity, EntityStore};
pub use migrate::{import_legacy_cards, LegacyCard, MigrationReport};
pub use validate::StoreView;
