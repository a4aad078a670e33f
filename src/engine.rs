//! The engine handle: one context object owning the store.
//!
//! Editing surfaces call the write API (validated, batched, atomic); the
//! viewer calls the read API, which serves from the store's caches. The
//! handle is explicit rather than a module-level singleton so tests can
//! run isolated engines in parallel.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::config;
use crate::domain::{
    ids, Card, Category, ContentSet, Creator, MediaReference, NavigationMode, PlatformHandle,
    SetStatus,
};
use crate::error::{EngineError, Result};
use crate::store::batch::{BatchWriter, Record};
use crate::store::entity_store::EntityStore;
use crate::store::migrate::{self, LegacyCard, MigrationReport};
use crate::view::homepage::{build_homepage, Homepage};
use crate::view::sequence::{self, Position};

/// Engine construction options.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding the three entity containers
    pub data_dir: PathBuf,

    /// Wrap prev/next at sequence ends. Off by default; ends are `None`.
    pub cyclic_navigation: bool,
}

impl EngineConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cyclic_navigation: false,
        }
    }
}

/// Filter for `list_sets`; empty filter matches everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetFilter {
    pub creator_id: Option<String>,
    pub category: Option<Category>,
    pub status: Option<SetStatus>,
}

impl SetFilter {
    fn matches(&self, set: &ContentSet) -> bool {
        self.creator_id
            .as_ref()
            .map_or(true, |id| &set.creator_id == id)
            && self.category.map_or(true, |c| set.category == c)
            && self.status.map_or(true, |s| set.status == s)
    }
}

/// Payload for `create_creator`. Strict: unknown fields are rejected at
/// the boundary; flexibility lives in the entity's free-form maps only.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCreator {
    pub display_name: String,
    #[serde(default)]
    pub handles: Vec<PlatformHandle>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Payload for `create_set`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewSet {
    pub creator_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub supported_navigation: Vec<NavigationMode>,
    #[serde(default)]
    pub is_hero: bool,
    #[serde(default)]
    pub status: SetStatus,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Payload for `create_cards_batch`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCard {
    pub set_id: String,
    pub creator_id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub detailed_content: String,
    pub order_index: u32,
    #[serde(default)]
    pub navigation_contexts: BTreeMap<String, Value>,
    #[serde(default)]
    pub media: Vec<MediaReference>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub domain_data: BTreeMap<String, Value>,
}

/// What a cascading delete removed.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CascadeReport {
    pub sets_removed: usize,
    pub cards_removed: usize,
}

/// The content graph engine.
pub struct Engine {
    store: EntityStore,
    cyclic_navigation: bool,
}

impl Engine {
    /// Open an engine over `data_dir` with default options.
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_config(EngineConfig::new(data_dir))
    }

    /// Open an engine over the configured default data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::open(config::data_dir()?))
    }

    /// Open an engine with explicit options.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            store: EntityStore::open(config.data_dir),
            cyclic_navigation: config.cyclic_navigation,
        }
    }

    /// Direct store access, for callers layering their own logic.
    pub fn store(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    // ------------------------------------------------------------------
    // Read API
    // ------------------------------------------------------------------

    /// All creators, insertion order.
    pub async fn list_creators(&mut self) -> Result<Vec<Creator>> {
        Ok(self.store.creators().await?.to_vec())
    }

    /// Sets matching `filter`, insertion order.
    pub async fn list_sets(&mut self, filter: &SetFilter) -> Result<Vec<ContentSet>> {
        Ok(self
            .store
            .sets()
            .await?
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }

    /// Set by ID.
    pub async fn get_set(&mut self, set_id: &str) -> Result<ContentSet> {
        self.store.set(set_id).await
    }

    /// A set's cards in `order_index` order.
    pub async fn list_cards(&mut self, set_id: &str) -> Result<Vec<Card>> {
        // Resolve the set first so an unknown id reports NotFound rather
        // than an empty list.
        let set = self.store.set(set_id).await?;
        let mut cards: Vec<Card> = self
            .store
            .cards()
            .await?
            .iter()
            .filter(|c| c.set_id == set.set_id)
            .cloned()
            .collect();
        cards.sort_by_key(|c| c.order_index);
        Ok(cards)
    }

    /// Card by ID.
    pub async fn get_card(&mut self, card_id: &str) -> Result<Card> {
        self.store.card(card_id).await
    }

    /// Ordered card IDs for a set under a navigation mode. `session`
    /// seeds the `random` mode only; other modes ignore it.
    pub async fn sequence(
        &mut self,
        set_id: &str,
        mode: NavigationMode,
        session: &str,
    ) -> Result<Vec<String>> {
        let set = self.store.set(set_id).await?;
        let cards = self.store.cards().await?;
        sequence::sequence(&set, cards, mode, session)
    }

    /// Position, predecessor, and successor of a card within a mode's
    /// ordering.
    pub async fn position_of(
        &mut self,
        set_id: &str,
        mode: NavigationMode,
        card_id: &str,
        session: &str,
    ) -> Result<Position> {
        let set = self.store.set(set_id).await?;
        let cyclic = self.cyclic_navigation;
        let cards = self.store.cards().await?;
        sequence::position_of(&set, cards, mode, card_id, session, cyclic)
    }

    /// The curated landing view.
    pub async fn build_homepage(&mut self) -> Result<Homepage> {
        Ok(build_homepage(self.store.sets().await?))
    }

    // ------------------------------------------------------------------
    // Write API
    // ------------------------------------------------------------------

    /// Create a creator. The identifier derives from the first platform
    /// handle, falling back to the display name.
    pub async fn create_creator(&mut self, payload: NewCreator) -> Result<Creator> {
        let basis = payload
            .handles
            .first()
            .map(|h| h.handle.as_str())
            .unwrap_or(&payload.display_name);
        let creator_id = ids::creator_id(basis)?;

        let mut creator = Creator::new(creator_id, payload.display_name);
        creator.handles = payload.handles;
        creator.description = payload.description;
        creator.categories = payload.categories;

        let committed = BatchWriter::new(&mut self.store)
            .write_all(vec![Record::Creator(creator)])
            .await
            .map_err(flatten_single_failure)?;
        match committed.into_iter().next() {
            Some(Record::Creator(creator)) => Ok(creator),
            _ => Err(EngineError::Storage(
                "batch returned no creator record".to_string(),
            )),
        }
    }

    /// Create a content set owned by an existing creator.
    pub async fn create_set(&mut self, payload: NewSet) -> Result<ContentSet> {
        let set_id = ids::set_id(&payload.creator_id, &payload.title)?;

        let mut set = ContentSet::new(set_id, payload.creator_id, payload.title, payload.category);
        set.description = payload.description;
        set.supported_navigation = payload.supported_navigation;
        set.is_hero = payload.is_hero;
        set.status = payload.status;
        set.tags = payload.tags;

        let committed = BatchWriter::new(&mut self.store)
            .write_all(vec![Record::ContentSet(set)])
            .await
            .map_err(flatten_single_failure)?;
        match committed.into_iter().next() {
            Some(Record::ContentSet(set)) => Ok(set),
            _ => Err(EngineError::Storage(
                "batch returned no set record".to_string(),
            )),
        }
    }

    /// Create a batch of cards as one atomic unit. Card IDs derive from
    /// `(set_id, order_index)`; duplicate ordinals inside the batch are
    /// caught by validation.
    pub async fn create_cards_batch(&mut self, payloads: Vec<NewCard>) -> Result<Vec<Card>> {
        let records: Vec<Record> = payloads
            .into_iter()
            .map(|payload| {
                let card_id = ids::card_id(&payload.set_id, payload.order_index);
                let mut card = Card::new(
                    card_id,
                    payload.set_id,
                    payload.creator_id,
                    payload.title,
                    payload.order_index,
                );
                card.summary = payload.summary;
                card.detailed_content = payload.detailed_content;
                card.navigation_contexts = payload.navigation_contexts;
                card.media = payload.media;
                card.tags = payload.tags;
                card.domain_data = payload.domain_data;
                Record::Card(card)
            })
            .collect();

        let committed = BatchWriter::new(&mut self.store).write_all(records).await?;
        Ok(committed
            .into_iter()
            .filter_map(|record| match record {
                Record::Card(card) => Some(card),
                _ => None,
            })
            .collect())
    }

    /// Replace an existing record wholesale. There are no partial-patch
    /// semantics: read, modify, and pass the full record back. Bumps
    /// `updated_at`.
    pub async fn update_record(&mut self, record: Record) -> Result<Record> {
        // The identifier must already exist; updates never create.
        match &record {
            Record::Creator(c) => {
                self.store.creator(&c.creator_id).await?;
            }
            Record::ContentSet(s) => {
                self.store.set(&s.set_id).await?;
            }
            Record::Card(c) => {
                self.store.card(&c.card_id).await?;
            }
        }

        let record = stamp_updated(record);
        let committed = BatchWriter::new(&mut self.store)
            .write_all(vec![record])
            .await
            .map_err(flatten_single_failure)?;
        committed
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::Storage("batch returned no record".to_string()))
    }

    /// Delete a creator and everything it owns: all its sets and all
    /// those sets' cards. Children are removed first so an interrupted
    /// delete never orphans a record.
    pub async fn delete_creator_cascade(&mut self, creator_id: &str) -> Result<CascadeReport> {
        // Resolve first: deleting an unknown creator is NotFound, not a
        // silent no-op.
        let creator = self.store.creator(creator_id).await?;

        let set_ids: Vec<String> = self
            .store
            .sets()
            .await?
            .iter()
            .filter(|s| s.creator_id == creator.creator_id)
            .map(|s| s.set_id.clone())
            .collect();

        let remaining_cards: Vec<Card> = self
            .store
            .cards()
            .await?
            .iter()
            .filter(|c| !set_ids.contains(&c.set_id))
            .cloned()
            .collect();
        let cards_removed = self.store.cards().await?.len() - remaining_cards.len();

        let remaining_sets: Vec<ContentSet> = self
            .store
            .sets()
            .await?
            .iter()
            .filter(|s| s.creator_id != creator.creator_id)
            .cloned()
            .collect();

        let remaining_creators: Vec<Creator> = self
            .store
            .creators()
            .await?
            .iter()
            .filter(|c| c.creator_id != creator.creator_id)
            .cloned()
            .collect();

        self.store.save_cards(remaining_cards).await?;
        self.store.save_sets(remaining_sets).await?;
        self.store.save_creators(remaining_creators).await?;

        tracing::info!(
            creator_id = %creator.creator_id,
            sets_removed = set_ids.len(),
            cards_removed,
            "creator cascade delete"
        );
        Ok(CascadeReport {
            sets_removed: set_ids.len(),
            cards_removed,
        })
    }

    /// Delete one set and all its cards.
    pub async fn delete_set_cascade(&mut self, set_id: &str) -> Result<CascadeReport> {
        let set = self.store.set(set_id).await?;

        let remaining_cards: Vec<Card> = self
            .store
            .cards()
            .await?
            .iter()
            .filter(|c| c.set_id != set.set_id)
            .cloned()
            .collect();
        let cards_removed = self.store.cards().await?.len() - remaining_cards.len();

        let remaining_sets: Vec<ContentSet> = self
            .store
            .sets()
            .await?
            .iter()
            .filter(|s| s.set_id != set.set_id)
            .cloned()
            .collect();

        self.store.save_cards(remaining_cards).await?;
        self.store.save_sets(remaining_sets).await?;

        tracing::info!(set_id = %set.set_id, cards_removed, "set cascade delete");
        Ok(CascadeReport {
            sets_removed: 1,
            cards_removed,
        })
    }

    /// One-shot legacy import; see [`crate::store::migrate`].
    pub async fn import_legacy_cards(&mut self, legacy: &[LegacyCard]) -> Result<MigrationReport> {
        migrate::import_legacy_cards(&mut self.store, legacy).await
    }
}

/// A single-record write that fails validation reports the integrity
/// violation directly instead of a one-element batch aggregate.
fn flatten_single_failure(err: EngineError) -> EngineError {
    match err {
        EngineError::Batch(mut failures) if failures.len() == 1 => {
            let failure = failures.remove(0);
            EngineError::Integrity(format!("{}: {}", failure.record_id, failure.reason))
        }
        other => other,
    }
}

/// Refresh `updated_at` on a full-record replacement.
fn stamp_updated(record: Record) -> Record {
    let now = Utc::now();
    match record {
        Record::Creator(mut c) => {
            c.updated_at = now;
            Record::Creator(c)
        }
        Record::ContentSet(mut s) => {
            s.updated_at = now;
            Record::ContentSet(s)
        }
        Record::Card(mut c) => {
            c.updated_at = now;
            Record::Card(c)
        }
    }
}
