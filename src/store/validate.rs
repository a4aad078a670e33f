//! Referential-integrity validation.
//!
//! Validation runs against a [`StoreView`] - the persisted state with the
//! whole pending batch already overlaid - so in-batch siblings check
//! against each other and a single batch can atomically move the hero flag
//! or renumber cards. Checks never mutate state and every record is
//! validated independently; the batch writer collects all failures.

use crate::domain::{Card, ContentSet, Creator};
use crate::store::batch::Record;

/// A read-only view of the (prospective) store contents.
pub struct StoreView<'a> {
    pub creators: &'a [Creator],
    pub sets: &'a [ContentSet],
    pub cards: &'a [Card],
}

impl<'a> StoreView<'a> {
    fn creator_exists(&self, id: &str) -> bool {
        self.creators.iter().any(|c| c.creator_id == id)
    }

    fn set_by_id(&self, id: &str) -> Option<&ContentSet> {
        self.sets.iter().find(|s| s.set_id == id)
    }
}

/// Validate one record against the view. Returns the rejection reason on
/// failure.
pub fn validate_record(view: &StoreView<'_>, record: &Record) -> Result<(), String> {
    match record {
        Record::Creator(creator) => validate_creator(view, creator),
        Record::ContentSet(set) => validate_set(view, set),
        Record::Card(card) => validate_card(view, card),
    }
}

fn validate_creator(view: &StoreView<'_>, creator: &Creator) -> Result<(), String> {
    if creator.display_name.trim().is_empty() {
        return Err("display_name must not be empty".to_string());
    }

    // Duplicate display names are legal; surface them as a soft warning
    // only.
    let duplicate = view.creators.iter().any(|c| {
        c.creator_id != creator.creator_id
            && c.display_name.eq_ignore_ascii_case(&creator.display_name)
    });
    if duplicate {
        tracing::warn!(
            creator_id = %creator.creator_id,
            display_name = %creator.display_name,
            "display name duplicates an existing creator"
        );
    }

    Ok(())
}

fn validate_set(view: &StoreView<'_>, set: &ContentSet) -> Result<(), String> {
    if !view.creator_exists(&set.creator_id) {
        return Err(format!(
            "creator_id '{}' does not resolve to an existing creator",
            set.creator_id
        ));
    }

    if set.is_hero {
        if let Some(other) = view
            .sets
            .iter()
            .find(|s| s.set_id != set.set_id && s.is_hero)
        {
            return Err(format!(
                "hero flag already held by set '{}'",
                other.set_id
            ));
        }
    }

    Ok(())
}

fn validate_card(view: &StoreView<'_>, card: &Card) -> Result<(), String> {
    if card.order_index < 1 {
        return Err("order_index is 1-based and must be >= 1".to_string());
    }

    let set = match view.set_by_id(&card.set_id) {
        Some(set) => set,
        None => {
            return Err(format!(
                "set_id '{}' does not resolve to an existing set",
                card.set_id
            ))
        }
    };

    if set.creator_id != card.creator_id {
        return Err(format!(
            "creator_id '{}' does not match owning set's creator '{}'",
            card.creator_id, set.creator_id
        ));
    }

    if let Some(other) = view.cards.iter().find(|c| {
        c.card_id != card.card_id
            && c.set_id == card.set_id
            && c.order_index == card.order_index
    }) {
        return Err(format!(
            "order_index {} already used by card '{}'",
            card.order_index, other.card_id
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn fixture() -> (Vec<Creator>, Vec<ContentSet>, Vec<Card>) {
        let creator = Creator::new("c1", "Creator One");
        let set = ContentSet::new("s1", "c1", "Set One", Category::General);
        let card = Card::new("s1_card_001", "s1", "c1", "Card One", 1);
        (vec![creator], vec![set], vec![card])
    }

    #[test]
    fn test_set_with_dangling_creator_rejected() {
        let (creators, sets, cards) = fixture();
        let view = StoreView {
            creators: &creators,
            sets: &sets,
            cards: &cards,
        };

        let orphan = ContentSet::new("s2", "ghost", "Orphan", Category::General);
        let reason = validate_set(&view, &orphan).unwrap_err();
        assert!(reason.contains("ghost"));
    }

    #[test]
    fn test_second_hero_rejected() {
        let (creators, mut sets, cards) = fixture();
        sets[0].is_hero = true;
        let contender = {
            let mut s = ContentSet::new("s2", "c1", "Contender", Category::General);
            s.is_hero = true;
            s
        };
        let view = StoreView {
            creators: &creators,
            sets: &sets,
            cards: &cards,
        };

        let reason = validate_set(&view, &contender).unwrap_err();
        assert!(reason.contains("hero"));
    }

    #[test]
    fn test_hero_update_of_same_set_allowed() {
        let (creators, mut sets, cards) = fixture();
        sets[0].is_hero = true;
        let view = StoreView {
            creators: &creators,
            sets: &sets,
            cards: &cards,
        };

        // Replacing the holder itself keeps the flag legal.
        assert!(validate_set(&view, &sets[0]).is_ok());
    }

    #[test]
    fn test_card_creator_mismatch_rejected() {
        let (mut creators, sets, cards) = fixture();
        creators.push(Creator::new("c2", "Creator Two"));
        let view = StoreView {
            creators: &creators,
            sets: &sets,
            cards: &cards,
        };

        let card = Card::new("s1_card_002", "s1", "c2", "Mismatched", 2);
        let reason = validate_card(&view, &card).unwrap_err();
        assert!(reason.contains("does not match"));
    }

    #[test]
    fn test_duplicate_order_index_rejected_excluding_self() {
        let (creators, sets, cards) = fixture();
        let view = StoreView {
            creators: &creators,
            sets: &sets,
            cards: &cards,
        };

        // Same slot, different card: rejected.
        let intruder = Card::new("s1_card_009", "s1", "c1", "Intruder", 1);
        assert!(validate_card(&view, &intruder).is_err());

        // Full-record replacement of the occupant itself: fine.
        assert!(validate_card(&view, &cards[0]).is_ok());
    }
}
