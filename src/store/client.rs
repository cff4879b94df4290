//! # Secret Store Client Trait

use std::sync::Arc;

use serde_json::{Map, Value};

use super::errors::StoreResult;

/// A record as the backend stores it: named fields with JSON values.
pub type SecretFields = Map<String, Value>;

/// Key-addressed client for a secrets backend.
///
/// Implementations own transport, retries and timeouts. Nothing in this
/// crate adds its own.
pub trait SecretStore: Send + Sync {
    /// Read the record at `path`. A missing record is `Ok(None)`.
    fn get(&self, path: &str) -> StoreResult<Option<SecretFields>>;

    /// Write the record at `path`, replacing any previous value.
    fn put(&self, path: &str, fields: &SecretFields) -> StoreResult<()>;

    /// Delete the record at `path`. Deleting a missing record succeeds.
    fn delete(&self, path: &str) -> StoreResult<()>;

    /// List the immediate child segments of `prefix`.
    ///
    /// Sub-folders are reported with a trailing `/`. An empty or missing
    /// prefix yields an empty list.
    fn list(&self, prefix: &str) -> StoreResult<Vec<String>>;
}

impl<T> SecretStore for Arc<T>
where
    T: SecretStore + ?Sized,
{
    fn get(&self, path: &str) -> StoreResult<Option<SecretFields>> {
        (**self).get(path)
    }

    fn put(&self, path: &str, fields: &SecretFields) -> StoreResult<()> {
        (**self).put(path, fields)
    }

    fn delete(&self, path: &str) -> StoreResult<()> {
        (**self).delete(path)
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        (**self).list(prefix)
    }
}

impl<T> SecretStore for Box<T>
where
    T: SecretStore + ?Sized,
{
    fn get(&self, path: &str) -> StoreResult<Option<SecretFields>> {
        (**self).get(path)
    }

    fn put(&self, path: &str, fields: &SecretFields) -> StoreResult<()> {
        (**self).put(path, fields)
    }

    fn delete(&self, path: &str) -> StoreResult<()> {
        (**self).delete(path)
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        (**self).list(prefix)
    }
}
