//! All-or-nothing batch writes.
//!
//! Every record in a batch validates against the merged view (persisted
//! state plus the batch itself) before anything persists. If any record
//! fails, the caller gets the complete failure list and the store is left
//! byte-identical to its pre-call state.

use serde::{Deserialize, Serialize};

use crate::domain::{Card, ContentSet, Creator, EntityKind};
use crate::error::{BatchFailure, EngineError, Result};
use crate::store::entity_store::{Entity, EntityStore};
use crate::store::validate::{validate_record, StoreView};

/// A write-API payload: one record of any kind, tagged for the strict
/// boundary schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Creator(Creator),
    ContentSet(ContentSet),
    Card(Card),
}

impl Record {
    /// The record's identifier.
    pub fn id(&self) -> &str {
        match self {
            Record::Creator(c) => c.id(),
            Record::ContentSet(s) => s.id(),
            Record::Card(c) => c.id(),
        }
    }

    /// The record's kind.
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Creator(_) => EntityKind::Creator,
            Record::ContentSet(_) => EntityKind::ContentSet,
            Record::Card(_) => EntityKind::Card,
        }
    }
}

/// Wraps a store to provide atomic multi-record writes.
pub struct BatchWriter<'a> {
    store: &'a mut EntityStore,
}

impl<'a> BatchWriter<'a> {
    pub fn new(store: &'a mut EntityStore) -> Self {
        Self { store }
    }

    /// Validate and commit `records` as one unit.
    ///
    /// New records append; records whose identifier already exists replace
    /// the persisted version. Within the batch, later records win over
    /// earlier ones with the same identifier. On any validation failure
    /// the full failure list comes back as [`EngineError::Batch`] and no
    /// container is touched.
    pub async fn write_all(&mut self, records: Vec<Record>) -> Result<Vec<Record>> {
        if records.is_empty() {
            return Ok(records);
        }

        // Working copies with the batch overlaid.
        let mut creators = self.store.creators().await?.to_vec();
        let mut sets = self.store.sets().await?.to_vec();
        let mut cards = self.store.cards().await?.to_vec();

        let mut touched_creators = false;
        let mut touched_sets = false;
        let mut touched_cards = false;

        for record in &records {
            match record {
                Record::Creator(creator) => {
                    upsert(&mut creators, creator.clone());
                    touched_creators = true;
                }
                Record::ContentSet(set) => {
                    upsert(&mut sets, set.clone());
                    touched_sets = true;
                }
                Record::Card(card) => {
                    upsert(&mut cards, card.clone());
                    touched_cards = true;
                }
            }
        }

        // Independent validation of every record; no short-circuiting.
        let view = StoreView {
            creators: &creators,
            sets: &sets,
            cards: &cards,
        };
        let failures: Vec<BatchFailure> = records
            .iter()
            .filter_map(|record| {
                validate_record(&view, record)
                    .err()
                    .map(|reason| BatchFailure::new(record.id(), reason))
            })
            .collect();

        if !failures.is_empty() {
            tracing::warn!(
                rejected = failures.len(),
                total = records.len(),
                "batch rejected; nothing persisted"
            );
            return Err(EngineError::Batch(failures));
        }

        // Parents persist before children so an interrupted multi-container
        // commit never leaves a dangling reference on disk.
        if touched_creators {
            self.store.save_creators(creators).await?;
        }
        if touched_sets {
            self.store.save_sets(sets).await?;
        }
        if touched_cards {
            self.store.save_cards(cards).await?;
        }

        tracing::info!(count = records.len(), "batch committed");
        Ok(records)
    }
}

/// Replace the record with the same id, or append.
fn upsert<T: Entity>(collection: &mut Vec<T>, record: T) {
    if let Some(existing) = collection.iter_mut().find(|r| r.id() == record.id()) {
        *existing = record;
    } else {
        collection.push(record);
    }
}
