//! Query planner subsystem for vaultrepo
//!
//! Turns declared repository method signatures into immutable query
//! descriptors.
//!
//! # Design Principles
//!
//! - Pure: same signature → equal descriptor or equal error
//! - Metadata only: call arguments never influence a descriptor
//! - Loud: a name outside the grammar is rejected, and a clause the store
//!   cannot evaluate is marked so it fails on every invocation
//!
//! # Pushdown
//!
//! 1. `Id` equality: point read, no enumeration
//! 2. `IdStartsWith`: keys pruned after `list`, before any load
//!
//! Ordering, tie-break and limits always run over loaded records.

mod ast;
mod cache;
mod descriptor;
mod errors;
mod explain;
mod parser;

pub use ast::{
    LimitSpec, MethodSignature, OrderSpec, ParameterKind, PredicateSpec, ReturnShape,
    SortDirection, SortSpec, Subject, KEY_PROPERTY,
};
pub use cache::{CacheLookup, DescriptorCache};
pub use descriptor::QueryMethodDescriptor;
pub use errors::{PlannerError, PlannerErrorCode, PlannerResult, Severity};
pub use explain::ExplainPlan;
pub use parser::MethodNameParser;
