//! In-memory secret store
//!
//! Hierarchical key space held in a sorted map. Listing follows the
//! backend contract: immediate children only, sub-folders carry a
//! trailing `/`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use super::client::{SecretFields, SecretStore};
use super::errors::{StoreError, StoreResult};

/// Secret store backed by a `BTreeMap`.
///
/// Used for tests, the CLI and embedding without a remote backend.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    entries: RwLock<BTreeMap<String, SecretFields>>,
}

impl MemorySecretStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held, across all paths
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Returns true if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn validate_path(path: &str) -> StoreResult<()> {
        if path.is_empty() || path.starts_with('/') || path.ends_with('/') || path.contains("//") {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        Ok(())
    }

    fn poisoned() -> StoreError {
        StoreError::Backend("memory store lock poisoned".into())
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, path: &str) -> StoreResult<Option<SecretFields>> {
        Self::validate_path(path)?;
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries.get(path).cloned())
    }

    fn put(&self, path: &str, fields: &SecretFields) -> StoreResult<()> {
        Self::validate_path(path)?;
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.insert(path.to_string(), fields.clone());
        Ok(())
    }

    fn delete(&self, path: &str) -> StoreResult<()> {
        Self::validate_path(path)?;
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.remove(path);
        Ok(())
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let trimmed = prefix.trim_end_matches('/');
        let base = if trimmed.is_empty() {
            String::new()
        } else {
            format!("{}/", trimmed)
        };

        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        let mut children = BTreeSet::new();

        for path in entries.range(base.clone()..).map(|(k, _)| k) {
            let Some(rest) = path.strip_prefix(base.as_str()) else {
                break;
            };
            let child = match rest.find('/') {
                Some(i) => &rest[..=i],
                None => rest,
            };
            children.insert(child.to_string());
        }

        Ok(children.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> SecretFields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_put_get_roundtrip() {
        let store = MemorySecretStore::new();
        store.put("people/walter", &fields(json!({"firstname": "Walter"}))).unwrap();

        let loaded = store.get("people/walter").unwrap().unwrap();
        assert_eq!(loaded["firstname"], "Walter");
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = MemorySecretStore::new();
        assert!(store.get("people/nobody").unwrap().is_none());
    }

    #[test]
    fn test_delete_missing_is_ok() {
        let store = MemorySecretStore::new();
        assert!(store.delete("people/nobody").is_ok());
    }

    #[test]
    fn test_list_immediate_children_only() {
        let store = MemorySecretStore::new();
        let f = fields(json!({}));
        store.put("people/walter", &f).unwrap();
        store.put("people/skyler", &f).unwrap();
        store.put("people/archive/hank", &f).unwrap();
        store.put("peoplex/marie", &f).unwrap();

        let children = store.list("people").unwrap();
        assert_eq!(children, vec!["archive/", "skyler", "walter"]);
    }

    #[test]
    fn test_list_empty_collection() {
        let store = MemorySecretStore::new();
        assert!(store.list("people").unwrap().is_empty());
    }

    #[test]
    fn test_list_with_trailing_slash() {
        let store = MemorySecretStore::new();
        store.put("people/walter", &fields(json!({}))).unwrap();
        assert_eq!(store.list("people/").unwrap(), vec!["walter"]);
    }

    #[test]
    fn test_invalid_paths_rejected() {
        let store = MemorySecretStore::new();
        let f = fields(json!({}));
        assert!(matches!(store.put("", &f), Err(StoreError::InvalidPath(_))));
        assert!(matches!(store.put("a//b", &f), Err(StoreError::InvalidPath(_))));
        assert!(matches!(store.get("/a"), Err(StoreError::InvalidPath(_))));
    }
}
