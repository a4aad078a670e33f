//! Identifier construction for the three entity kinds.
//!
//! Creator and set IDs combine a normalized human-readable slug with a
//! short random suffix, so similarly named entities never collide while
//! staying recognizable in logs and URLs. Card IDs carry no randomness at
//! all: they derive from the owning set and the ordinal, so generating
//! twice for the same ordinal yields the same ID (bump the ordinal to get
//! a new card).

use uuid::Uuid;

use crate::error::{EngineError, Result};

/// Build a creator ID from a platform handle or display name.
///
/// `@CanalDoAstro` → `canaldoastro_1a2b3c4d`.
pub fn creator_id(handle: &str) -> Result<String> {
    let slug = normalize_handle(handle)?;
    Ok(format!("{}_{}", slug, suffix()))
}

/// Build a set ID from the owning creator and a title.
///
/// `("astro_1a2b", "Lunar History")` → `astro_1a2b_lunar_history_5e6f7a8b`.
pub fn set_id(creator_id: &str, title: &str) -> Result<String> {
    if creator_id.trim().is_empty() {
        return Err(EngineError::InvalidInput(
            "creator_id must not be empty".to_string(),
        ));
    }
    let slug = normalize_title(title)?;
    Ok(format!("{}_{}_{}", creator_id, slug, suffix()))
}

/// Build a card ID from the owning set and the 1-based ordinal.
///
/// Fully deterministic: `("lunar_v1", 7)` → `lunar_v1_card_007`.
pub fn card_id(set_id: &str, order_index: u32) -> String {
    format!("{}_card_{:03}", set_id, order_index)
}

/// Lowercase a handle, strip the leading `@`, keep alphanumerics only.
fn normalize_handle(handle: &str) -> Result<String> {
    let slug: String = handle
        .trim()
        .trim_start_matches('@')
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    if slug.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "handle '{}' normalizes to an empty slug",
            handle
        )));
    }
    Ok(slug)
}

/// Lowercase a title, keep alphanumerics and hyphens, collapse whitespace
/// runs to a single underscore.
fn normalize_title(title: &str) -> Result<String> {
    let cleaned: String = title
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();

    let slug = cleaned.split_whitespace().collect::<Vec<_>>().join("_");

    if slug.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "title '{}' normalizes to an empty slug",
            title
        )));
    }
    Ok(slug)
}

/// Eight hex chars of a fresh UUIDv4.
fn suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_id_format() {
        let id = creator_id("@CanalDoAstro").unwrap();
        let (slug, suffix) = id.rsplit_once('_').unwrap();
        assert_eq!(slug, "canaldoastro");
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_creator_ids_do_not_collide() {
        let a = creator_id("@same").unwrap();
        let b = creator_id("@same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_set_id_slugs_title() {
        let id = set_id("astro_1a2b3c4d", "Lunar History  - Complete").unwrap();
        assert!(id.starts_with("astro_1a2b3c4d_lunar_history_-_complete_"));
    }

    #[test]
    fn test_card_id_is_deterministic() {
        assert_eq!(card_id("lunar_v1", 7), "lunar_v1_card_007");
        assert_eq!(card_id("lunar_v1", 7), card_id("lunar_v1", 7));
        assert_eq!(card_id("lunar_v1", 120), "lunar_v1_card_120");
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(creator_id("").is_err());
        assert!(creator_id("@!!!").is_err());
        assert!(set_id("c1", "   ").is_err());
        assert!(set_id("", "Title").is_err());
    }
}
