//! Navigation sequencing.
//!
//! Each mode is a pure ordering function over a set's cards. Orderings
//! start from `order_index` order, so every tie-break and fallback is
//! stable. Only `random` depends on anything beyond persisted data: its
//! shuffle is seeded from `(set_id, mode, session)`, which keeps
//! prev/next stable for one browsing session and different across
//! sessions.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use sha2::{Digest, Sha256};

use crate::domain::{Card, ContentSet, EntityKind, NavigationMode};
use crate::error::{EngineError, Result};

/// Context key holding a card's explicit chronological position.
pub const TIMELINE_KEY: &str = "chronological_key";

/// Context key holding a card's theme label.
pub const THEME_KEY: &str = "theme";

/// Context key holding a card's difficulty tier.
pub const TIER_KEY: &str = "tier";

/// A card's place within one mode's ordering.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Position {
    /// 1-based index within the ordering
    pub index: usize,

    /// Total cards in the ordering
    pub total: usize,

    /// Predecessor, `None` at the start unless navigation is cyclic
    pub prev_id: Option<String>,

    /// Successor, `None` at the end unless navigation is cyclic
    pub next_id: Option<String>,
}

/// Compute the ordered card IDs for `set` under `mode`.
///
/// The mode must appear in the set's `supported_navigation`; there is no
/// silent fallback to another mode. Cards not belonging to the set are
/// ignored.
pub fn sequence(
    set: &ContentSet,
    cards: &[Card],
    mode: NavigationMode,
    session: &str,
) -> Result<Vec<String>> {
    if !set.supports(mode) {
        return Err(EngineError::UnsupportedMode {
            set_id: set.set_id.clone(),
            mode,
        });
    }

    let mut ordered: Vec<&Card> = cards.iter().filter(|c| c.set_id == set.set_id).collect();
    ordered.sort_by_key(|c| c.order_index);

    match mode {
        NavigationMode::Timeline => {
            // Cards without an explicit chronological key fall back to
            // their order index.
            ordered.sort_by_key(|c| {
                c.context_i64(mode, TIMELINE_KEY)
                    .unwrap_or(i64::from(c.order_index))
            });
        }
        NavigationMode::Thematic => {
            ordered = group_by_theme(ordered);
        }
        NavigationMode::Difficulty => {
            ordered.sort_by_key(|c| tier_rank(c));
        }
        NavigationMode::Random => {
            let mut rng = StdRng::seed_from_u64(session_seed(&set.set_id, mode, session));
            ordered.shuffle(&mut rng);
        }
    }

    Ok(ordered.into_iter().map(|c| c.card_id.clone()).collect())
}

/// Compute index/total/prev/next for `card_id` under `mode`.
///
/// `cyclic` wraps both ends; a single-card set never wraps.
pub fn position_of(
    set: &ContentSet,
    cards: &[Card],
    mode: NavigationMode,
    card_id: &str,
    session: &str,
    cyclic: bool,
) -> Result<Position> {
    let order = sequence(set, cards, mode, session)?;
    let index = order
        .iter()
        .position(|id| id == card_id)
        .ok_or_else(|| EngineError::not_found(EntityKind::Card, card_id))?;

    let total = order.len();
    let (prev_id, next_id) = if cyclic && total > 1 {
        (
            Some(order[(index + total - 1) % total].clone()),
            Some(order[(index + 1) % total].clone()),
        )
    } else {
        (
            index.checked_sub(1).map(|i| order[i].clone()),
            order.get(index + 1).cloned(),
        )
    };

    Ok(Position {
        index: index + 1,
        total,
        prev_id,
        next_id,
    })
}

/// Stable group-by on the theme label: themes ordered by first appearance,
/// cards within a theme kept in incoming (order_index) order. Cards with
/// no theme label form their own group at their first-appearance slot.
fn group_by_theme<'a>(ordered: Vec<&'a Card>) -> Vec<&'a Card> {
    let mut themes: Vec<Option<&str>> = Vec::new();
    for card in &ordered {
        let theme = card.context_str(NavigationMode::Thematic, THEME_KEY);
        if !themes.contains(&theme) {
            themes.push(theme);
        }
    }

    let mut grouped = Vec::with_capacity(ordered.len());
    for theme in themes {
        grouped.extend(
            ordered
                .iter()
                .filter(|c| c.context_str(NavigationMode::Thematic, THEME_KEY) == theme)
                .copied(),
        );
    }
    grouped
}

/// Three-tier ordinal; a missing or unknown tier counts as intermediate.
fn tier_rank(card: &Card) -> u8 {
    match card.context_str(NavigationMode::Difficulty, TIER_KEY) {
        Some("beginner") => 0,
        Some("advanced") => 2,
        _ => 1,
    }
}

/// Fold `(set_id, mode, session)` into a shuffle seed.
pub fn session_seed(set_id: &str, mode: NavigationMode, session: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(set_id.as_bytes());
    hasher.update(b":");
    hasher.update(mode.as_str().as_bytes());
    hasher.update(b":");
    hasher.update(session.as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use serde_json::json;

    fn set_with_all_modes() -> ContentSet {
        ContentSet::new("s1", "c1", "Set", Category::General).with_navigation([
            NavigationMode::Timeline,
            NavigationMode::Thematic,
            NavigationMode::Difficulty,
            NavigationMode::Random,
        ])
    }

    fn card(n: u32) -> Card {
        Card::new(format!("s1_card_{:03}", n), "s1", "c1", format!("Card {}", n), n)
    }

    #[test]
    fn test_unsupported_mode_is_an_error() {
        let set = ContentSet::new("s1", "c1", "Set", Category::General)
            .with_navigation([NavigationMode::Timeline]);
        let cards = vec![card(1)];

        let err = sequence(&set, &cards, NavigationMode::Random, "sess").unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedMode { .. }));
    }

    #[test]
    fn test_timeline_uses_chronological_key_with_fallback() {
        let set = set_with_all_modes();
        let cards = vec![
            card(1).with_context(NavigationMode::Timeline, json!({TIMELINE_KEY: 1969})),
            card(2).with_context(NavigationMode::Timeline, json!({TIMELINE_KEY: 1957})),
            // No key: falls back to order_index 3.
            card(3),
        ];

        let order = sequence(&set, &cards, NavigationMode::Timeline, "").unwrap();
        assert_eq!(order, vec!["s1_card_003", "s1_card_002", "s1_card_001"]);
    }

    #[test]
    fn test_thematic_groups_by_first_appearance() {
        let set = set_with_all_modes();
        // Themes [A, B, A]: theme A groups ahead of B per first appearance.
        let cards = vec![
            card(1).with_context(NavigationMode::Thematic, json!({THEME_KEY: "A"})),
            card(2).with_context(NavigationMode::Thematic, json!({THEME_KEY: "B"})),
            card(3).with_context(NavigationMode::Thematic, json!({THEME_KEY: "A"})),
        ];

        let order = sequence(&set, &cards, NavigationMode::Thematic, "").unwrap();
        assert_eq!(order, vec!["s1_card_001", "s1_card_003", "s1_card_002"]);
    }

    #[test]
    fn test_thematic_already_grouped_keeps_order() {
        let set = set_with_all_modes();
        let cards = vec![
            card(1).with_context(NavigationMode::Thematic, json!({THEME_KEY: "A"})),
            card(2).with_context(NavigationMode::Thematic, json!({THEME_KEY: "A"})),
            card(3).with_context(NavigationMode::Thematic, json!({THEME_KEY: "B"})),
        ];

        let order = sequence(&set, &cards, NavigationMode::Thematic, "").unwrap();
        assert_eq!(order, vec!["s1_card_001", "s1_card_002", "s1_card_003"]);
    }

    #[test]
    fn test_difficulty_orders_tiers_with_stable_ties() {
        let set = set_with_all_modes();
        let cards = vec![
            card(1).with_context(NavigationMode::Difficulty, json!({TIER_KEY: "advanced"})),
            card(2), // no tier: counts as intermediate
            card(3).with_context(NavigationMode::Difficulty, json!({TIER_KEY: "beginner"})),
            card(4).with_context(NavigationMode::Difficulty, json!({TIER_KEY: "intermediate"})),
        ];

        let order = sequence(&set, &cards, NavigationMode::Difficulty, "").unwrap();
        assert_eq!(
            order,
            vec!["s1_card_003", "s1_card_002", "s1_card_004", "s1_card_001"]
        );
    }

    #[test]
    fn test_random_is_stable_within_a_session() {
        let set = set_with_all_modes();
        let cards: Vec<Card> = (1..=12).map(card).collect();

        let a = sequence(&set, &cards, NavigationMode::Random, "session-1").unwrap();
        let b = sequence(&set, &cards, NavigationMode::Random, "session-1").unwrap();
        assert_eq!(a, b);

        // Still a permutation of the full set.
        let mut sorted = a.clone();
        sorted.sort();
        let mut expected: Vec<String> = cards.iter().map(|c| c.card_id.clone()).collect();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_random_differs_across_sessions() {
        let set = set_with_all_modes();
        let cards: Vec<Card> = (1..=12).map(card).collect();

        let a = sequence(&set, &cards, NavigationMode::Random, "session-1").unwrap();
        let b = sequence(&set, &cards, NavigationMode::Random, "session-2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_position_endpoints_do_not_wrap() {
        let set = set_with_all_modes();
        let cards: Vec<Card> = (1..=3).map(card).collect();

        let first = position_of(&set, &cards, NavigationMode::Timeline, "s1_card_001", "", false)
            .unwrap();
        assert_eq!(first.index, 1);
        assert_eq!(first.prev_id, None);
        assert_eq!(first.next_id, Some("s1_card_002".to_string()));

        let last = position_of(&set, &cards, NavigationMode::Timeline, "s1_card_003", "", false)
            .unwrap();
        assert_eq!(last.index, 3);
        assert_eq!(last.total, 3);
        assert_eq!(last.prev_id, Some("s1_card_002".to_string()));
        assert_eq!(last.next_id, None);
    }

    #[test]
    fn test_position_cyclic_wraps_both_ends() {
        let set = set_with_all_modes();
        let cards: Vec<Card> = (1..=3).map(card).collect();

        let first =
            position_of(&set, &cards, NavigationMode::Timeline, "s1_card_001", "", true).unwrap();
        assert_eq!(first.prev_id, Some("s1_card_003".to_string()));

        let last =
            position_of(&set, &cards, NavigationMode::Timeline, "s1_card_003", "", true).unwrap();
        assert_eq!(last.next_id, Some("s1_card_001".to_string()));
    }

    #[test]
    fn test_single_card_has_no_neighbours_even_cyclic() {
        let set = set_with_all_modes();
        let cards = vec![card(1)];

        for cyclic in [false, true] {
            let pos = position_of(
                &set,
                &cards,
                NavigationMode::Timeline,
                "s1_card_001",
                "",
                cyclic,
            )
            .unwrap();
            assert_eq!(pos.index, 1);
            assert_eq!(pos.total, 1);
            assert_eq!(pos.prev_id, None);
            assert_eq!(pos.next_id, None);
        }
    }

    #[test]
    fn test_position_of_unknown_card_is_not_found() {
        let set = set_with_all_modes();
        let cards = vec![card(1)];

        let err = position_of(&set, &cards, NavigationMode::Timeline, "ghost", "", false)
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[test]
    fn test_session_seed_is_deterministic_and_input_sensitive() {
        let a = session_seed("s1", NavigationMode::Random, "sess");
        let b = session_seed("s1", NavigationMode::Random, "sess");
        let c = session_seed("s1", NavigationMode::Random, "other");
        let d = session_seed("s2", NavigationMode::Random, "sess");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }
}
