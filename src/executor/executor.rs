//! Query executor for vaultrepo
//!
//! Runs descriptors and CRUD requests against a secret store.
//!
//! Derived query flow (strict order):
//! 1. Reject descriptors that can never run, before touching the store
//! 2. Id equality: one point read, no enumeration
//! 3. Otherwise `list` the collection once
//! 4. Prune keys against the predicate before any load
//! 5. `get` each surviving key; vanished keys are skipped
//! 6. Sort when an order or limit is present (ties broken by key)
//! 7. Apply limit
//! 8. Unmarshal only what is returned

use crate::entity::{from_fields, to_fields, Entity};
use crate::observability::{log_event, Event};
use crate::planner::{QueryMethodDescriptor, ReturnShape};
use crate::store::{is_folder_segment, join_path, SecretStore};

use super::arguments::{Argument, BoundPredicate, BoundQuery};
use super::errors::{ExecutorError, ExecutorResult};
use super::filters::KeyFilter;
use super::result::{ExecutionResult, ExecutionStats, LoadedRecord, QueryResult};
use super::sorter::{RecordComparator, ResultSorter};

/// Executes repository requests against one collection of a store
pub struct QueryExecutor<'a, S: SecretStore + ?Sized> {
    store: &'a S,
    collection: &'a str,
}

impl<'a, S: SecretStore + ?Sized> QueryExecutor<'a, S> {
    pub fn new(store: &'a S, collection: &'a str) -> Self {
        Self { store, collection }
    }

    /// Backend path of an entity key
    pub fn path(&self, id: &str) -> String {
        join_path(self.collection, id)
    }

    /// Ids are single path segments
    pub fn validate_id(id: &str) -> ExecutorResult<()> {
        if id.is_empty() {
            return Err(ExecutorError::InvalidEntity("id must not be empty".into()));
        }
        if id.contains('/') {
            return Err(ExecutorError::InvalidEntity(format!(
                "id '{}' must not contain '/'",
                id
            )));
        }
        Ok(())
    }

    /// Writes an entity at `collection/id`. No id is ever generated.
    pub fn save<E: Entity>(&self, entity: &E) -> ExecutorResult<()> {
        let id = entity.id();
        Self::validate_id(id)?;
        let path = self.path(id);
        let fields = to_fields(entity).map_err(|source| ExecutorError::Marshalling {
            path: path.clone(),
            source,
        })?;
        self.store.put(&path, &fields)?;
        log_event(
            Event::EntitySaved,
            &[("collection", self.collection), ("id", id)],
        );
        Ok(())
    }

    /// Point read. Absence is `None`, never an error.
    pub fn find_by_id<E: Entity>(&self, id: &str) -> ExecutorResult<Option<E>> {
        Self::validate_id(id)?;
        match self.store.get(&self.path(id))? {
            Some(fields) => self.unmarshal(LoadedRecord::new(id, fields)).map(Some),
            None => Ok(None),
        }
    }

    pub fn exists_by_id(&self, id: &str) -> ExecutorResult<bool> {
        Self::validate_id(id)?;
        Ok(self.store.get(&self.path(id))?.is_some())
    }

    /// Deleting a missing id succeeds
    pub fn delete_by_id(&self, id: &str) -> ExecutorResult<()> {
        Self::validate_id(id)?;
        self.store.delete(&self.path(id))?;
        log_event(
            Event::EntityDeleted,
            &[("collection", self.collection), ("id", id)],
        );
        Ok(())
    }

    /// Entity keys currently listed under the collection, folders excluded
    pub fn entity_keys(&self) -> ExecutorResult<Vec<String>> {
        let keys = self.store.list(self.collection)?;
        Ok(keys.into_iter().filter(|k| !is_folder_segment(k)).collect())
    }

    /// Lists once, then deletes each entity key in listing order.
    ///
    /// Not atomic. The first store failure stops the sweep and is returned
    /// unchanged; `on_removed` has then seen every key already deleted.
    pub fn delete_all<F: FnMut(&str)>(&self, mut on_removed: F) -> ExecutorResult<usize> {
        let keys = self.entity_keys()?;
        for key in &keys {
            self.store.delete(&self.path(key))?;
            on_removed(key);
        }
        Ok(keys.len())
    }

    /// Runs a derived query.
    ///
    /// Same descriptor, arguments and stored data always give the same
    /// result.
    pub fn execute<E: Entity>(
        &self,
        descriptor: &QueryMethodDescriptor,
        args: &[Argument],
    ) -> ExecutorResult<ExecutionResult<E>> {
        // Step 1: fails for unsupported properties regardless of arguments
        let query = BoundQuery::bind(descriptor, args)?;
        let returns = descriptor.returns();
        let mut stats = ExecutionStats::default();

        // Steps 2-5
        let mut records = match &query.predicate {
            BoundPredicate::IdEquals(id) => {
                Self::validate_id(id)?;
                match self.store.get(&self.path(id))? {
                    Some(fields) => {
                        stats.loaded = 1;
                        vec![LoadedRecord::new(id.as_str(), fields)]
                    }
                    None => Vec::new(),
                }
            }
            predicate => {
                let keys = self.store.list(self.collection)?;
                stats.listed = keys.len();
                let candidates = KeyFilter::apply(keys, predicate);
                stats.pruned = stats.listed - candidates.len();

                // existence needs one record unless a limit of zero applies
                let stop_after = match (returns, query.limit) {
                    (ReturnShape::Boolean, Some(0)) => Some(0),
                    (ReturnShape::Boolean, _) => Some(1),
                    _ => None,
                };
                self.load(candidates, stop_after, &mut stats)?
            }
        };

        // Step 6: order only matters when entities are returned
        if query.ordered && descriptor.returns_entities() {
            let comparator = RecordComparator::new(query.order, E::ID_PROPERTY);
            ResultSorter::sort(&mut records, &comparator);
        }

        // Step 7
        if let Some(limit) = query.limit {
            stats.limit_applied = records.len() > limit;
            records.truncate(limit);
        }
        stats.returned = records.len();

        // Step 8
        let result = match returns {
            ReturnShape::List => QueryResult::List(
                records
                    .into_iter()
                    .map(|record| self.unmarshal(record))
                    .collect::<ExecutorResult<Vec<E>>>()?,
            ),
            ReturnShape::Optional => {
                if records.len() > 1 {
                    return Err(ExecutorError::IncorrectResultSize {
                        method: descriptor.method().to_string(),
                        actual: records.len(),
                    });
                }
                QueryResult::Optional(
                    records
                        .pop()
                        .map(|record| self.unmarshal(record))
                        .transpose()?,
                )
            }
            ReturnShape::Boolean => QueryResult::Boolean(!records.is_empty()),
            ReturnShape::Count => QueryResult::Count(records.len() as u64),
        };

        Ok(ExecutionResult { result, stats })
    }

    fn load(
        &self,
        keys: Vec<String>,
        stop_after: Option<usize>,
        stats: &mut ExecutionStats,
    ) -> ExecutorResult<Vec<LoadedRecord>> {
        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            if stop_after.map_or(false, |n| records.len() >= n) {
                break;
            }
            match self.store.get(&self.path(&key))? {
                Some(fields) => {
                    stats.loaded += 1;
                    records.push(LoadedRecord::new(key, fields));
                }
                None => {
                    // deleted between list and get
                    stats.vanished += 1;
                    log_event(
                        Event::KeyVanished,
                        &[("collection", self.collection), ("key", &key)],
                    );
                }
            }
        }
        Ok(records)
    }

    fn unmarshal<E: Entity>(&self, record: LoadedRecord) -> ExecutorResult<E> {
        let path = self.path(&record.key);
        from_fields(&record.key, record.fields)
            .map_err(|source| ExecutorError::Marshalling { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::DynamicEntity;
    use crate::planner::{MethodNameParser, MethodSignature, SortSpec};
    use crate::store::{MemorySecretStore, SecretFields, StoreError, StoreResult};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PEOPLE: &str = "secret/people";

    /// Counts point reads made through it
    #[derive(Default)]
    struct CountingStore {
        inner: MemorySecretStore,
        gets: AtomicUsize,
        lists: AtomicUsize,
    }

    impl SecretStore for CountingStore {
        fn get(&self, path: &str) -> StoreResult<Option<SecretFields>> {
            self.gets.fetch_add(1, Ordering::Relaxed);
            self.inner.get(path)
        }
        fn put(&self, path: &str, fields: &SecretFields) -> StoreResult<()> {
            self.inner.put(path, fields)
        }
        fn delete(&self, path: &str) -> StoreResult<()> {
            self.inner.delete(path)
        }
        fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
            self.lists.fetch_add(1, Ordering::Relaxed);
            self.inner.list(prefix)
        }
    }

    /// Lists a key that no longer exists
    struct GhostStore {
        inner: MemorySecretStore,
    }

    impl SecretStore for GhostStore {
        fn get(&self, path: &str) -> StoreResult<Option<SecretFields>> {
            self.inner.get(path)
        }
        fn put(&self, path: &str, fields: &SecretFields) -> StoreResult<()> {
            self.inner.put(path, fields)
        }
        fn delete(&self, path: &str) -> StoreResult<()> {
            self.inner.delete(path)
        }
        fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
            let mut keys = self.inner.list(prefix)?;
            keys.push("ghost".to_string());
            Ok(keys)
        }
    }

    fn person(id: &str, firstname: &str) -> DynamicEntity {
        DynamicEntity::new(id).with("firstname", json!(firstname))
    }

    fn seeded<S: SecretStore>(store: &S) {
        let executor = QueryExecutor::new(store, PEOPLE);
        executor.save(&person("walter", "Walter")).unwrap();
        executor.save(&person("skyler", "Skyler")).unwrap();
    }

    fn run<S: SecretStore>(
        store: &S,
        sig: MethodSignature,
        args: &[Argument],
    ) -> ExecutorResult<ExecutionResult<DynamicEntity>> {
        let descriptor = MethodNameParser::parse(&sig).unwrap();
        QueryExecutor::new(store, PEOPLE).execute(&descriptor, args)
    }

    fn ids(result: ExecutionResult<DynamicEntity>) -> Vec<String> {
        result
            .result
            .into_list()
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect()
    }

    #[test]
    fn test_save_then_find_by_id() {
        let store = MemorySecretStore::new();
        let executor = QueryExecutor::new(&store, PEOPLE);
        let walter = person("walter", "Walter");

        executor.save(&walter).unwrap();
        let found: Option<DynamicEntity> = executor.find_by_id("walter").unwrap();
        assert_eq!(found, Some(walter));

        let missing: Option<DynamicEntity> = executor.find_by_id("jesse").unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_invalid_ids_rejected() {
        let store = MemorySecretStore::new();
        let executor = QueryExecutor::new(&store, PEOPLE);

        let err = executor.save(&person("", "Nobody")).unwrap_err();
        assert_eq!(err.code(), "VAULT_INVALID_ENTITY");

        let err = executor.exists_by_id("a/b").unwrap_err();
        assert_eq!(err.code(), "VAULT_INVALID_ENTITY");
        assert!(store.is_empty());
    }

    #[test]
    fn test_prefix_pruned_before_load() {
        let store = CountingStore::default();
        seeded(&store);
        store.gets.store(0, Ordering::Relaxed);

        let result = run(
            &store,
            MethodSignature::list("findByIdStartsWith").value_param(),
            &["walt".into()],
        )
        .unwrap();

        assert_eq!(result.stats.listed, 2);
        assert_eq!(result.stats.pruned, 1);
        assert_eq!(store.gets.load(Ordering::Relaxed), 1);
        assert_eq!(ids(result), vec!["walter"]);
    }

    #[test]
    fn test_point_read_skips_list() {
        let store = CountingStore::default();
        seeded(&store);

        let result = run(
            &store,
            MethodSignature::optional("findById").value_param(),
            &["skyler".into()],
        )
        .unwrap();

        assert_eq!(store.lists.load(Ordering::Relaxed), 0);
        let found = result.result.into_optional().unwrap().unwrap();
        assert_eq!(found.id, "skyler");
    }

    #[test]
    fn test_order_by_firstname() {
        let store = MemorySecretStore::new();
        seeded(&store);

        let asc = run(&store, MethodSignature::list("findAllByOrderByFirstnameAsc"), &[]).unwrap();
        assert_eq!(ids(asc), vec!["skyler", "walter"]);

        let desc = run(&store, MethodSignature::list("findAllByOrderByFirstnameDesc"), &[]).unwrap();
        assert_eq!(ids(desc), vec!["walter", "skyler"]);
    }

    #[test]
    fn test_top_n_with_runtime_sort() {
        let store = MemorySecretStore::new();
        seeded(&store);

        let result = run(
            &store,
            MethodSignature::list("findTop1By").sort_param(),
            &[SortSpec::asc("firstname").into()],
        )
        .unwrap();
        assert!(result.stats.limit_applied);
        assert_eq!(ids(result), vec!["skyler"]);

        let result = run(
            &store,
            MethodSignature::list("findTop1By").sort_param(),
            &[SortSpec::desc("firstname").into()],
        )
        .unwrap();
        assert_eq!(ids(result), vec!["walter"]);
    }

    #[test]
    fn test_limit_beyond_data_and_zero() {
        let store = MemorySecretStore::new();
        seeded(&store);

        let all = run(&store, MethodSignature::list("findTop10By"), &[]).unwrap();
        assert!(!all.stats.limit_applied);
        assert_eq!(ids(all), vec!["skyler", "walter"]);

        let none = run(
            &store,
            MethodSignature::list("findAllBy").limit_param(),
            &[Argument::Limit(0)],
        )
        .unwrap();
        assert!(ids(none).is_empty());
    }

    #[test]
    fn test_unsupported_fails_on_empty_collection() {
        let store = CountingStore::default();
        let sig = MethodSignature::list("findInvalidByFirstname").value_param();

        for _ in 0..3 {
            let err = run(&store, sig.clone(), &["Walter".into()]).unwrap_err();
            assert!(err.is_unsupported_property());
        }
        assert_eq!(store.lists.load(Ordering::Relaxed), 0);
        assert_eq!(store.gets.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_vanished_key_is_absent() {
        let store = GhostStore {
            inner: MemorySecretStore::new(),
        };
        seeded(&store);

        let result = run(&store, MethodSignature::list("findAll"), &[]).unwrap();
        assert_eq!(result.stats.vanished, 1);
        assert_eq!(ids(result), vec!["skyler", "walter"]);

        let count = run(&store, MethodSignature::count("countBy"), &[]).unwrap();
        assert_eq!(count.result.as_count(), Some(2));
    }

    #[test]
    fn test_optional_with_many_matches() {
        let store = MemorySecretStore::new();
        seeded(&store);

        let err = run(
            &store,
            MethodSignature::optional("findByIdStartsWith").value_param(),
            &["".into()],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ExecutorError::IncorrectResultSize { actual: 2, .. }
        ));
    }

    #[test]
    fn test_exists_stops_after_first_record() {
        let store = CountingStore::default();
        seeded(&store);
        store.gets.store(0, Ordering::Relaxed);

        let result = run(&store, MethodSignature::boolean("existsBy"), &[]).unwrap();
        assert_eq!(result.result.as_bool(), Some(true));
        assert_eq!(store.gets.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_folders_skipped() {
        let store = MemorySecretStore::new();
        seeded(&store);
        store
            .put("secret/people/archive/gus", &SecretFields::new())
            .unwrap();

        let result = run(&store, MethodSignature::list("findAll"), &[]).unwrap();
        assert_eq!(ids(result), vec!["skyler", "walter"]);
    }

    #[test]
    fn test_backend_error_unchanged() {
        struct DeniedStore;
        impl SecretStore for DeniedStore {
            fn get(&self, _: &str) -> StoreResult<Option<SecretFields>> {
                Err(StoreError::PermissionDenied("get".into()))
            }
            fn put(&self, _: &str, _: &SecretFields) -> StoreResult<()> {
                Err(StoreError::PermissionDenied("put".into()))
            }
            fn delete(&self, _: &str) -> StoreResult<()> {
                Err(StoreError::PermissionDenied("delete".into()))
            }
            fn list(&self, _: &str) -> StoreResult<Vec<String>> {
                Err(StoreError::PermissionDenied("list".into()))
            }
        }

        let err = run(&DeniedStore, MethodSignature::list("findAll"), &[]).unwrap_err();
        assert_eq!(
            err.backend(),
            Some(&StoreError::PermissionDenied("list".into()))
        );
    }

    #[test]
    fn test_delete_all_reports_progress() {
        let store = MemorySecretStore::new();
        seeded(&store);
        let executor = QueryExecutor::new(&store, PEOPLE);

        let mut removed = Vec::new();
        let count = executor.delete_all(|key| removed.push(key.to_string())).unwrap();

        assert_eq!(count, 2);
        assert_eq!(removed, vec!["skyler", "walter"]);
        assert!(store.is_empty());
    }
}
