//! Key filtering for query execution
//!
//! Runs over listed key segments before any record is loaded. Prefix
//! matching is case-sensitive and compares raw bytes, no normalization.

use crate::store::is_folder_segment;

use super::arguments::BoundPredicate;

/// Prunes listed keys against a bound predicate
pub struct KeyFilter;

impl KeyFilter {
    /// Checks if an entity key matches the predicate
    pub fn matches(key: &str, predicate: &BoundPredicate) -> bool {
        match predicate {
            BoundPredicate::All => true,
            BoundPredicate::IdEquals(id) => key == id,
            BoundPredicate::IdPrefix(prefix) => key.starts_with(prefix.as_str()),
        }
    }

    /// Keeps the entity keys that match, in listing order.
    ///
    /// Folder segments are never entities and are always dropped.
    pub fn apply(keys: Vec<String>, predicate: &BoundPredicate) -> Vec<String> {
        keys.into_iter()
            .filter(|key| !is_folder_segment(key) && Self::matches(key, predicate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_keeps_entities() {
        let kept = KeyFilter::apply(keys(&["archive/", "skyler", "walter"]), &BoundPredicate::All);
        assert_eq!(kept, keys(&["skyler", "walter"]));
    }

    #[test]
    fn test_prefix() {
        let predicate = BoundPredicate::IdPrefix("walt".into());
        let kept = KeyFilter::apply(keys(&["skyler", "walt", "walter", "walt/"]), &predicate);
        assert_eq!(kept, keys(&["walt", "walter"]));
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        let predicate = BoundPredicate::IdPrefix("Walt".into());
        assert!(!KeyFilter::matches("walter", &predicate));
        assert!(KeyFilter::matches("Walter", &predicate));
    }

    #[test]
    fn test_prefix_no_normalization() {
        // precomposed vs combining accent
        let predicate = BoundPredicate::IdPrefix("caf\u{e9}".into());
        assert!(KeyFilter::matches("caf\u{e9}-1", &predicate));
        assert!(!KeyFilter::matches("cafe\u{301}-1", &predicate));
    }

    #[test]
    fn test_empty_prefix_matches_everything() {
        let predicate = BoundPredicate::IdPrefix(String::new());
        let kept = KeyFilter::apply(keys(&["a", "b"]), &predicate);
        assert_eq!(kept, keys(&["a", "b"]));
    }

    #[test]
    fn test_exact() {
        let predicate = BoundPredicate::IdEquals("walter".into());
        assert!(KeyFilter::matches("walter", &predicate));
        assert!(!KeyFilter::matches("walter2", &predicate));
    }
}
