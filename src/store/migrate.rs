//! One-shot migration of legacy flat card lists.
//!
//! The legacy format is a bare JSON array of cards with no creator or set
//! wrapper. The importer synthesizes exactly one archive creator and one
//! archive set to own everything, folds each card's original numeric id
//! into the current deterministic card-ID scheme, and maps legacy field
//! names onto the current schema. Unrecognized legacy fields land in the
//! card's `domain_data` bucket rather than being dropped.
//!
//! Re-running the import is safe: the synthesized creator and set are
//! detected by their fixed identifiers and only genuinely new cards are
//! appended.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{ids, Card, Category, ContentSet, Creator, MediaReference, MediaType};
use crate::domain::{NavigationMode, SetStatus};
use crate::error::Result;
use crate::store::batch::{BatchWriter, Record};
use crate::store::entity_store::EntityStore;

/// Fixed identity of the synthesized archive creator.
pub const LEGACY_CREATOR_ID: &str = "legacy_archive_original";

/// Fixed identity of the synthesized archive set.
pub const LEGACY_SET_ID: &str = "legacy_archive_collection_v1";

/// A card in the legacy flat format.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyCard {
    /// Original numeric identity; becomes the order index and part of the
    /// card ID
    pub id: u32,

    /// Legacy title field
    pub titulo: String,

    /// Legacy summary field
    pub resumo: String,

    /// Legacy body field
    pub detalhado: String,

    /// Optional video attachment
    #[serde(default)]
    pub video_url: Option<String>,

    /// Everything else the legacy record carried
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// What an import run did.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct MigrationReport {
    pub creator_id: String,
    pub set_id: String,
    pub creator_created: bool,
    pub set_created: bool,
    pub cards_imported: usize,
    pub cards_skipped: usize,
}

/// Import `legacy` cards into the store under the synthesized archive
/// creator/set. Idempotent; all writes go through the batch writer.
pub async fn import_legacy_cards(
    store: &mut EntityStore,
    legacy: &[LegacyCard],
) -> Result<MigrationReport> {
    let creator_exists = store
        .creators()
        .await?
        .iter()
        .any(|c| c.creator_id == LEGACY_CREATOR_ID);

    let existing_set = store
        .sets()
        .await?
        .iter()
        .find(|s| s.set_id == LEGACY_SET_ID)
        .cloned();

    let existing_card_ids: HashSet<String> = store
        .cards()
        .await?
        .iter()
        .filter(|c| c.set_id == LEGACY_SET_ID)
        .map(|c| c.card_id.clone())
        .collect();

    let mut records = Vec::new();

    if !creator_exists {
        let creator = Creator::new(LEGACY_CREATOR_ID, "Legacy Archive")
            .with_handle("website", "@legacy_archive")
            .with_description("Original flat-file card content, migrated")
            .with_category(Category::General);
        records.push(Record::Creator(creator));
    }

    let mut new_cards = Vec::new();
    let mut skipped = 0usize;
    for legacy_card in legacy {
        let card_id = ids::card_id(LEGACY_SET_ID, legacy_card.id);
        if existing_card_ids.contains(&card_id) {
            skipped += 1;
            continue;
        }

        let mut card = Card::new(
            card_id,
            LEGACY_SET_ID,
            LEGACY_CREATOR_ID,
            &legacy_card.titulo,
            legacy_card.id,
        )
        .with_summary(&legacy_card.resumo)
        .with_detailed_content(&legacy_card.detalhado);

        if let Some(url) = &legacy_card.video_url {
            let alt: String = legacy_card.titulo.chars().take(50).collect();
            card = card.with_media(
                MediaReference::new(MediaType::Video, url).with_alt_text(format!("Video: {}", alt)),
            );
        }

        card.domain_data = legacy_card.extra.clone();
        new_cards.push(card);
    }

    let total_cards = (existing_card_ids.len() + new_cards.len()) as u32;
    let set_created = existing_set.is_none();
    match existing_set {
        Some(mut set) => {
            if set.card_count != total_cards {
                set.card_count = total_cards;
                records.push(Record::ContentSet(set));
            }
        }
        None => {
            let mut set = ContentSet::new(
                LEGACY_SET_ID,
                LEGACY_CREATOR_ID,
                "Legacy Archive Collection",
                Category::General,
            )
            .with_description("Complete legacy card archive")
            .with_navigation([
                NavigationMode::Timeline,
                NavigationMode::Thematic,
                NavigationMode::Random,
            ])
            .with_status(SetStatus::Published);
            set.card_count = total_cards;
            records.push(Record::ContentSet(set));
        }
    }

    let imported = new_cards.len();
    records.extend(new_cards.into_iter().map(Record::Card));

    if records.is_empty() {
        tracing::info!("legacy import: nothing to do");
    } else {
        BatchWriter::new(store).write_all(records).await?;
        tracing::info!(imported, skipped, "legacy import committed");
    }

    Ok(MigrationReport {
        creator_id: LEGACY_CREATOR_ID.to_string(),
        set_id: LEGACY_SET_ID.to_string(),
        creator_created: !creator_exists,
        set_created,
        cards_imported: imported,
        cards_skipped: skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_card_keeps_unrecognized_fields() {
        let legacy: LegacyCard = serde_json::from_value(json!({
            "id": 3,
            "titulo": "Primeira missão",
            "resumo": "Resumo curto",
            "detalhado": "Texto completo",
            "era": "soviet",
            "fontes": ["wiki"]
        }))
        .unwrap();

        assert_eq!(legacy.id, 3);
        assert_eq!(legacy.extra["era"], json!("soviet"));
        assert_eq!(legacy.extra["fontes"], json!(["wiki"]));
    }

    #[test]
    fn test_legacy_card_id_folds_numeric_identity() {
        assert_eq!(
            ids::card_id(LEGACY_SET_ID, 7),
            "legacy_archive_collection_v1_card_007"
        );
    }
}
