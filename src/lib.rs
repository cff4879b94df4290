//! vaultrepo - derived-query repositories over key-addressed secret stores
//!
//! Method names such as `findByIdStartsWith` or
//! `findTop1ByOrderByFirstnameAsc` are parsed into query plans. The parts a
//! key-addressed store can do (point reads, key-prefix pruning) run before
//! any record is loaded; ordering and limits run over loaded records.
//! Filters on any property other than the id are rejected, never ignored.

pub mod cli;
pub mod config;
pub mod entity;
pub mod executor;
pub mod observability;
pub mod planner;
pub mod repository;
pub mod store;

pub use config::{ConfigError, LogLevel, RepositoryConfig, ValidationMode};
pub use entity::{DynamicEntity, Entity};
pub use executor::{Argument, ExecutorError, ExecutorResult, QueryResult};
pub use planner::{MethodSignature, OrderSpec, PlannerError, SortSpec};
pub use repository::{BootstrapError, Repository};
pub use store::{MemorySecretStore, SecretFields, SecretStore, StoreError};
