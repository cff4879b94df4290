//! Per-collection repository
//!
//! Owns its store handle, configuration, descriptor cache and counters.
//! Every declared method is parsed at construction, so an unparsable name
//! never survives bootstrap. Unsupported-property methods fail on every
//! invocation, or at construction when validation is eager.

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::config::{RepositoryConfig, ValidationMode};
use crate::entity::Entity;
use crate::executor::{
    Argument, ExecutionStats, ExecutorError, ExecutorResult, QueryExecutor, QueryResult,
};
use crate::observability::{
    log_event, Event, Logger, MetricsRegistry, MetricsSnapshot, ObservationScope, Severity,
};
use crate::planner::{
    CacheLookup, DescriptorCache, ExplainPlan, MethodSignature, OrderSpec,
    QueryMethodDescriptor, ReturnShape,
};
use crate::store::SecretStore;

use super::errors::{BootstrapError, BootstrapResult};

/// Repository of entities `E` stored under one collection of `S`
pub struct Repository<E: Entity, S: SecretStore> {
    store: S,
    config: RepositoryConfig,
    methods: HashMap<String, MethodSignature>,
    cache: DescriptorCache,
    builtins: DescriptorCache,
    metrics: MetricsRegistry,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, S: SecretStore> Repository<E, S> {
    /// Creates a repository with no derived query methods
    pub fn new(store: S, config: RepositoryConfig) -> BootstrapResult<Self> {
        Self::with_methods(store, config, Vec::new())
    }

    /// Creates a repository and parses every declared method.
    ///
    /// Fails on the first unparsable method, naming it. With eager
    /// validation, unsupported-property methods fail here too.
    ///
    /// Also sets the process-wide log level from `config.log_level`.
    pub fn with_methods(
        store: S,
        config: RepositoryConfig,
        methods: impl IntoIterator<Item = MethodSignature>,
    ) -> BootstrapResult<Self> {
        config.validate()?;
        Logger::set_min_severity(config.log_level.severity());

        let validation = match config.validation {
            ValidationMode::Lazy => "lazy",
            ValidationMode::Eager => "eager",
        };
        let scope = ObservationScope::with_fields(
            Event::RepositoryBootstrap,
            &[("collection", &config.collection), ("validation", validation)],
        );

        let mut repository = Self {
            store,
            config,
            methods: HashMap::new(),
            cache: DescriptorCache::new(),
            builtins: DescriptorCache::new(),
            metrics: MetricsRegistry::new(),
            _entity: PhantomData,
        };

        for signature in methods {
            if let Err(err) = repository.declare(signature) {
                scope.fail(&err.to_string());
                return Err(err);
            }
        }

        let declared = repository.methods.len().to_string();
        scope.complete_with_fields(&[("methods", &declared)]);
        Ok(repository)
    }

    fn declare(&mut self, signature: MethodSignature) -> BootstrapResult<()> {
        if self.methods.contains_key(&signature.name) {
            return Err(BootstrapError::DuplicateMethod(signature.name));
        }

        let parsed = self
            .cache
            .get_or_parse(&signature)
            .and_then(|(descriptor, lookup)| {
                self.record_lookup(lookup);
                if self.config.validation == ValidationMode::Eager {
                    descriptor.validate()?;
                }
                Ok(descriptor)
            });

        match parsed {
            Ok(descriptor) => {
                log_event(
                    Event::QueryMethodParsed,
                    &[
                        ("method", descriptor.method()),
                        ("predicate", descriptor.predicate().name()),
                        ("returns", descriptor.returns().as_str()),
                    ],
                );
                self.methods.insert(signature.name.clone(), signature);
                Ok(())
            }
            Err(err) => {
                log_event(
                    Event::QueryMethodRejected,
                    &[("method", err.method()), ("code", err.code().code())],
                );
                Err(err.into())
            }
        }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Names of declared derived query methods, sorted
    pub fn methods(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn executor(&self) -> QueryExecutor<'_, S> {
        QueryExecutor::new(&self.store, &self.config.collection)
    }

    fn record_lookup(&self, lookup: CacheLookup) {
        match lookup {
            CacheLookup::Hit => self.metrics.increment_cache_hits(),
            CacheLookup::Miss => self.metrics.increment_cache_misses(),
        }
    }

    // ---- derived queries ----

    /// Invokes a declared derived query method
    pub fn invoke(&self, method: &str, args: &[Argument]) -> ExecutorResult<QueryResult<E>> {
        let signature = self
            .methods
            .get(method)
            .ok_or_else(|| ExecutorError::UnknownQueryMethod(method.to_string()))?;
        let (descriptor, lookup) = self.cache.get_or_parse(signature)?;
        self.record_lookup(lookup);
        self.run(&descriptor, args)
    }

    /// Invokes a method declared to return a collection
    pub fn invoke_list(&self, method: &str, args: &[Argument]) -> ExecutorResult<Vec<E>> {
        match self.invoke(method, args)? {
            QueryResult::List(items) => Ok(items),
            other => Err(shape_mismatch(method, ReturnShape::List, other.shape())),
        }
    }

    /// Invokes a method declared to return at most one entity
    pub fn invoke_optional(&self, method: &str, args: &[Argument]) -> ExecutorResult<Option<E>> {
        match self.invoke(method, args)? {
            QueryResult::Optional(item) => Ok(item),
            other => Err(shape_mismatch(method, ReturnShape::Optional, other.shape())),
        }
    }

    pub fn invoke_exists(&self, method: &str, args: &[Argument]) -> ExecutorResult<bool> {
        match self.invoke(method, args)? {
            QueryResult::Boolean(value) => Ok(value),
            other => Err(shape_mismatch(method, ReturnShape::Boolean, other.shape())),
        }
    }

    pub fn invoke_count(&self, method: &str, args: &[Argument]) -> ExecutorResult<u64> {
        match self.invoke(method, args)? {
            QueryResult::Count(value) => Ok(value),
            other => Err(shape_mismatch(method, ReturnShape::Count, other.shape())),
        }
    }

    /// Describes how a declared method runs, or why it cannot
    pub fn explain(&self, method: &str) -> ExecutorResult<ExplainPlan> {
        let signature = self
            .methods
            .get(method)
            .ok_or_else(|| ExecutorError::UnknownQueryMethod(method.to_string()))?;
        let (descriptor, _) = self.cache.get_or_parse(signature)?;
        Ok(ExplainPlan::from_descriptor(&descriptor))
    }

    fn run(
        &self,
        descriptor: &QueryMethodDescriptor,
        args: &[Argument],
    ) -> ExecutorResult<QueryResult<E>> {
        match self.executor().execute::<E>(descriptor, args) {
            Ok(execution) => {
                self.record_execution(descriptor, &execution.stats);
                Ok(execution.result)
            }
            Err(err) => {
                if err.rejection().is_some() {
                    self.metrics.increment_queries_rejected();
                }
                log_event(
                    Event::QueryFailed,
                    &[
                        ("collection", self.collection()),
                        ("method", descriptor.method()),
                        ("code", err.code()),
                        ("reason", &err.to_string()),
                    ],
                );
                Err(err)
            }
        }
    }

    fn record_execution(&self, descriptor: &QueryMethodDescriptor, stats: &ExecutionStats) {
        self.metrics.increment_queries_executed();
        self.metrics.add_keys_listed(stats.listed as u64);
        self.metrics.add_keys_pruned(stats.pruned as u64);
        self.metrics.add_records_loaded(stats.loaded as u64);
        self.metrics.add_keys_vanished(stats.vanished as u64);

        if Logger::enabled(Severity::Trace) {
            let listed = stats.listed.to_string();
            let pruned = stats.pruned.to_string();
            let loaded = stats.loaded.to_string();
            let returned = stats.returned.to_string();
            log_event(
                Event::QueryExecuted,
                &[
                    ("collection", self.collection()),
                    ("method", descriptor.method()),
                    ("listed", &listed),
                    ("pruned", &pruned),
                    ("loaded", &loaded),
                    ("returned", &returned),
                ],
            );
        }
    }

    fn run_builtin(
        &self,
        signature: MethodSignature,
        args: &[Argument],
    ) -> ExecutorResult<QueryResult<E>> {
        let (descriptor, _) = self.builtins.get_or_parse(&signature)?;
        self.run(&descriptor, args)
    }

    // ---- CRUD surface ----

    /// Writes an entity and returns it unchanged
    pub fn save(&self, entity: E) -> ExecutorResult<E> {
        self.executor().save(&entity)?;
        self.metrics.increment_writes();
        Ok(entity)
    }

    /// Saves in order; stops at the first failure
    pub fn save_all(&self, entities: impl IntoIterator<Item = E>) -> ExecutorResult<Vec<E>> {
        entities.into_iter().map(|entity| self.save(entity)).collect()
    }

    pub fn find_by_id(&self, id: &str) -> ExecutorResult<Option<E>> {
        let found = self.executor().find_by_id(id)?;
        if found.is_some() {
            self.metrics.add_records_loaded(1);
        }
        Ok(found)
    }

    pub fn exists_by_id(&self, id: &str) -> ExecutorResult<bool> {
        self.executor().exists_by_id(id)
    }

    /// All entities in listing order
    pub fn find_all(&self) -> ExecutorResult<Vec<E>> {
        into_list(self.run_builtin(MethodSignature::list("findAll"), &[])?)
    }

    /// All entities ordered by `order`, ties broken by ascending id
    pub fn find_all_sorted(&self, order: OrderSpec) -> ExecutorResult<Vec<E>> {
        let signature = MethodSignature::list("findAllBy").sort_param();
        into_list(self.run_builtin(signature, &[Argument::Sort(order)])?)
    }

    /// Entities for the given ids, in argument order; missing ids are skipped
    pub fn find_all_by_id<I, T>(&self, ids: I) -> ExecutorResult<Vec<E>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut found = Vec::new();
        for id in ids {
            if let Some(entity) = self.find_by_id(id.as_ref())? {
                found.push(entity);
            }
        }
        Ok(found)
    }

    pub fn count(&self) -> ExecutorResult<u64> {
        match self.run_builtin(MethodSignature::count("countBy"), &[])? {
            QueryResult::Count(count) => Ok(count),
            other => Err(shape_mismatch("countBy", ReturnShape::Count, other.shape())),
        }
    }

    pub fn delete_by_id(&self, id: &str) -> ExecutorResult<()> {
        self.executor().delete_by_id(id)?;
        self.metrics.increment_deletes();
        Ok(())
    }

    pub fn delete(&self, entity: &E) -> ExecutorResult<()> {
        self.delete_by_id(entity.id())
    }

    pub fn delete_all_entities<'e>(
        &self,
        entities: impl IntoIterator<Item = &'e E>,
    ) -> ExecutorResult<()>
    where
        E: 'e,
    {
        for entity in entities {
            self.delete(entity)?;
        }
        Ok(())
    }

    /// Deletes every entity in the collection.
    ///
    /// Not atomic: on failure the keys already removed stay removed and the
    /// store error is returned unchanged.
    pub fn delete_all(&self) -> ExecutorResult<usize> {
        let scope = ObservationScope::with_fields(
            Event::CollectionClear,
            &[("collection", self.collection())],
        );

        let mut removed = 0usize;
        let outcome = self.executor().delete_all(|_| {
            removed += 1;
            self.metrics.increment_deletes();
        });

        match outcome {
            Ok(count) => {
                scope.complete_with_fields(&[("removed", &count.to_string())]);
                Ok(count)
            }
            Err(err) => {
                scope.fail_with_fields(&err.to_string(), &[("removed", &removed.to_string())]);
                Err(err)
            }
        }
    }
}

fn into_list<E>(result: QueryResult<E>) -> ExecutorResult<Vec<E>> {
    let shape = result.shape();
    result
        .into_list()
        .ok_or_else(|| shape_mismatch("findAll", ReturnShape::List, shape))
}

fn shape_mismatch(method: &str, expected: ReturnShape, actual: ReturnShape) -> ExecutorError {
    ExecutorError::argument_mismatch(
        method,
        format!(
            "called as {} but declared to return {}",
            expected.as_str(),
            actual.as_str()
        ),
    )
}
