//! Homepage curation.
//!
//! Selects the hero set and partitions the remaining published sets into
//! labeled rows. A set tagged with a row's label is placed verbatim; thin
//! rows are backfilled from the remaining published sets in store order.
//! No set appears in two rows and the hero never appears in any row.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::{ContentSet, SetStatus};

/// Row labels, in display order.
pub const ROW_LABELS: [&str; 2] = ["featured", "popular"];

/// Maximum sets per row.
pub const ROW_SIZE: usize = 8;

/// A row with fewer tagged members than this gets backfilled.
pub const MIN_TAGGED: usize = 2;

/// One labeled row of sets.
#[derive(Debug, Clone, Serialize)]
pub struct HomepageRow {
    pub label: String,
    pub sets: Vec<ContentSet>,
}

/// The landing view: a hero plus labeled rows.
#[derive(Debug, Clone, Serialize)]
pub struct Homepage {
    pub hero: Option<ContentSet>,
    pub rows: Vec<HomepageRow>,
}

/// Build the landing view from all sets, in store order.
///
/// Hero selection: the set carrying the hero flag wins even when not yet
/// published (flagging is an explicit editorial act); with no flagged set,
/// the first published set in store order steps in.
pub fn build_homepage(sets: &[ContentSet]) -> Homepage {
    let hero = sets
        .iter()
        .find(|s| s.is_hero)
        .or_else(|| sets.iter().find(|s| s.status == SetStatus::Published))
        .cloned();

    let mut placed: HashSet<String> = HashSet::new();
    if let Some(hero) = &hero {
        placed.insert(hero.set_id.clone());
    }

    let mut rows = Vec::new();
    for label in ROW_LABELS {
        let mut row: Vec<ContentSet> = sets
            .iter()
            .filter(|s| {
                s.status == SetStatus::Published
                    && !placed.contains(&s.set_id)
                    && s.tags.iter().any(|t| t == label)
            })
            .take(ROW_SIZE)
            .cloned()
            .collect();

        if row.len() < MIN_TAGGED {
            let backfill: Vec<ContentSet> = sets
                .iter()
                .filter(|s| {
                    s.status == SetStatus::Published
                        && !placed.contains(&s.set_id)
                        && !row.iter().any(|r| r.set_id == s.set_id)
                })
                .take(ROW_SIZE - row.len())
                .cloned()
                .collect();
            row.extend(backfill);
        }

        for set in &row {
            placed.insert(set.set_id.clone());
        }
        if !row.is_empty() {
            rows.push(HomepageRow {
                label: label.to_string(),
                sets: row,
            });
        }
    }

    Homepage { hero, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn published(id: &str) -> ContentSet {
        ContentSet::new(id, "c1", id, Category::General).with_status(SetStatus::Published)
    }

    #[test]
    fn test_flagged_hero_wins() {
        let mut flagged = published("s2");
        flagged.is_hero = true;
        let sets = vec![published("s1"), flagged, published("s3")];

        let homepage = build_homepage(&sets);
        assert_eq!(homepage.hero.unwrap().set_id, "s2");
    }

    #[test]
    fn test_hero_falls_back_to_first_published() {
        let draft = ContentSet::new("s1", "c1", "Draft", Category::General);
        let sets = vec![draft, published("s2"), published("s3")];

        let homepage = build_homepage(&sets);
        assert_eq!(homepage.hero.unwrap().set_id, "s2");
    }

    #[test]
    fn test_no_sets_no_hero() {
        let homepage = build_homepage(&[]);
        assert!(homepage.hero.is_none());
        assert!(homepage.rows.is_empty());
    }

    #[test]
    fn test_tagged_sets_fill_their_row() {
        let sets = vec![
            published("hero"),
            published("f1").with_tag("featured"),
            published("f2").with_tag("featured"),
            published("p1").with_tag("popular"),
            published("p2").with_tag("popular"),
        ];

        let homepage = build_homepage(&sets);
        assert_eq!(homepage.hero.as_ref().unwrap().set_id, "hero");
        assert_eq!(homepage.rows.len(), 2);
        assert_eq!(homepage.rows[0].label, "featured");
        let featured: Vec<_> = homepage.rows[0].sets.iter().map(|s| &s.set_id).collect();
        assert_eq!(featured, ["f1", "f2"]);
    }

    #[test]
    fn test_thin_row_backfills_in_store_order() {
        let sets = vec![
            published("hero"),
            published("f1").with_tag("featured"),
            published("a"),
            published("b"),
        ];

        let homepage = build_homepage(&sets);
        // One tagged member < MIN_TAGGED: backfilled from remaining
        // published sets, store order, hero excluded.
        let featured: Vec<_> = homepage.rows[0].sets.iter().map(|s| &s.set_id).collect();
        assert_eq!(featured, ["f1", "a", "b"]);
    }

    #[test]
    fn test_no_set_appears_twice_and_hero_excluded() {
        let mut sets = vec![published("hero").with_tag("featured").with_tag("popular")];
        sets[0].is_hero = true;
        for n in 0..12 {
            sets.push(published(&format!("s{}", n)));
        }

        let homepage = build_homepage(&sets);
        let mut seen = HashSet::new();
        for row in &homepage.rows {
            for set in &row.sets {
                assert_ne!(set.set_id, "hero");
                assert!(seen.insert(set.set_id.clone()), "set placed twice");
            }
        }
    }

    #[test]
    fn test_row_size_cap() {
        let mut sets = vec![published("hero")];
        for n in 0..20 {
            sets.push(published(&format!("f{}", n)).with_tag("featured"));
        }

        let homepage = build_homepage(&sets);
        assert_eq!(homepage.rows[0].sets.len(), ROW_SIZE);
    }
}
