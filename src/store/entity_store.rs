//! Durable entity containers with in-memory caching.
//!
//! Each entity kind persists as one JSON array file in the data directory
//! (`creators.json`, `content_sets.json`, `cards.json`), holding records in
//! insertion order. A container is read fully into memory on first access
//! and stays cached; every write rewrites the whole container through a
//! stage-then-swap (`.tmp` + rename), so a crash mid-write leaves the prior
//! file intact. A write refreshes only the affected kind's cache.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;

use crate::domain::{Card, ContentSet, Creator, EntityKind};
use crate::error::{EngineError, Result};

/// A record type persisted in its own container.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// Which of the three kinds this is.
    const KIND: EntityKind;

    /// Container file name inside the data directory.
    const FILE_NAME: &'static str;

    /// The record's unique identifier.
    fn id(&self) -> &str;
}

impl Entity for Creator {
    const KIND: EntityKind = EntityKind::Creator;
    const FILE_NAME: &'static str = "creators.json";

    fn id(&self) -> &str {
        &self.creator_id
    }
}

impl Entity for ContentSet {
    const KIND: EntityKind = EntityKind::ContentSet;
    const FILE_NAME: &'static str = "content_sets.json";

    fn id(&self) -> &str {
        &self.set_id
    }
}

impl Entity for Card {
    const KIND: EntityKind = EntityKind::Card;
    const FILE_NAME: &'static str = "cards.json";

    fn id(&self) -> &str {
        &self.card_id
    }
}

/// One kind's persisted container plus its cache.
struct Collection<T: Entity> {
    path: PathBuf,
    cache: Option<Vec<T>>,
}

impl<T: Entity> Collection<T> {
    fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(T::FILE_NAME),
            cache: None,
        }
    }

    /// Load the container into the cache on first access.
    ///
    /// A missing file is an empty container (fresh store). An unparseable
    /// file is a `Storage` error; the engine never substitutes an empty
    /// container for a corrupt one.
    async fn load(&mut self) -> Result<&[T]> {
        if self.cache.is_none() {
            let records = if self.path.exists() {
                let content = fs::read_to_string(&self.path)
                    .await
                    .map_err(|e| EngineError::storage(&self.path, e))?;
                serde_json::from_str(&content).map_err(|e| {
                    EngineError::storage(&self.path, format!("corrupt container: {}", e))
                })?
            } else {
                Vec::new()
            };

            tracing::debug!(
                kind = %T::KIND,
                count = records.len(),
                "container loaded"
            );
            self.cache = Some(records);
        }

        Ok(self.cache.as_deref().unwrap_or(&[]))
    }

    /// Replace the persisted container with `records`.
    ///
    /// The new content is staged to a sibling `.tmp` file and renamed over
    /// the target, so the prior file survives any interrupted write.
    async fn save(&mut self, records: Vec<T>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| EngineError::storage(parent, e))?;
        }

        let content = serde_json::to_string_pretty(&records)
            .map_err(|e| EngineError::storage(&self.path, e))?;

        let staged = self.path.with_extension("json.tmp");
        fs::write(&staged, content)
            .await
            .map_err(|e| EngineError::storage(&staged, e))?;
        fs::rename(&staged, &self.path)
            .await
            .map_err(|e| EngineError::storage(&self.path, e))?;

        tracing::info!(kind = %T::KIND, count = records.len(), "container persisted");
        self.cache = Some(records);
        Ok(())
    }

    async fn get(&mut self, id: &str) -> Result<T> {
        self.load()
            .await?
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(T::KIND, id))
    }
}

/// The store handle: three containers behind one explicit context object.
///
/// Not a process-wide singleton - tests instantiate isolated stores against
/// temporary directories in parallel.
pub struct EntityStore {
    data_dir: PathBuf,
    creators: Collection<Creator>,
    sets: Collection<ContentSet>,
    cards: Collection<Card>,
}

impl EntityStore {
    /// Open a store rooted at `data_dir`. No I/O happens until first
    /// access; the directory is created on first write.
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            creators: Collection::new(&data_dir),
            sets: Collection::new(&data_dir),
            cards: Collection::new(&data_dir),
            data_dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// All creators, insertion order.
    pub async fn creators(&mut self) -> Result<&[Creator]> {
        self.creators.load().await
    }

    /// All sets, insertion order.
    pub async fn sets(&mut self) -> Result<&[ContentSet]> {
        self.sets.load().await
    }

    /// All cards, insertion order.
    pub async fn cards(&mut self) -> Result<&[Card]> {
        self.cards.load().await
    }

    /// Creator by ID.
    pub async fn creator(&mut self, id: &str) -> Result<Creator> {
        self.creators.get(id).await
    }

    /// Set by ID.
    pub async fn set(&mut self, id: &str) -> Result<ContentSet> {
        self.sets.get(id).await
    }

    /// Card by ID.
    pub async fn card(&mut self, id: &str) -> Result<Card> {
        self.cards.get(id).await
    }

    /// Atomically replace the creators container.
    pub async fn save_creators(&mut self, records: Vec<Creator>) -> Result<()> {
        self.creators.save(records).await
    }

    /// Atomically replace the sets container.
    pub async fn save_sets(&mut self, records: Vec<ContentSet>) -> Result<()> {
        self.sets.save(records).await
    }

    /// Atomically replace the cards container.
    pub async fn save_cards(&mut self, records: Vec<Card>) -> Result<()> {
        self.cards.save(records).await
    }
}
