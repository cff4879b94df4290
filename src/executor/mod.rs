//! Query executor subsystem for vaultrepo
//!
//! Consumes descriptors and call arguments, produces results in the
//! declared shape.
//!
//! # Execution Flow (strict order)
//!
//! 1. Bind arguments; rejected descriptors fail here
//! 2. Point read for id equality, otherwise one `list`
//! 3. Prune keys against the predicate
//! 4. Load surviving keys; vanished keys are absent, not errors
//! 5. Sort (ties broken by ascending key)
//! 6. Apply limit
//! 7. Shape the result
//!
//! Store errors are returned unmodified and never retried.

mod arguments;
mod errors;
mod executor;
mod filters;
mod result;
mod sorter;

pub use arguments::{Argument, BoundPredicate, BoundQuery};
pub use errors::{ExecutorError, ExecutorResult};
pub use executor::QueryExecutor;
pub use filters::KeyFilter;
pub use result::{ExecutionResult, ExecutionStats, LoadedRecord, QueryResult};
pub use sorter::{RecordComparator, ResultSorter};
