//! Parsed query plan for one declared method
//!
//! Built once from method metadata, never changed afterwards.

use super::ast::{LimitSpec, OrderSpec, ParameterKind, PredicateSpec, ReturnShape, Subject};
use super::errors::{PlannerError, PlannerResult};

/// Immutable query plan (no runtime state)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMethodDescriptor {
    pub(super) method: String,
    pub(super) subject: Subject,
    pub(super) predicate: PredicateSpec,
    /// Name-derived ordering. Empty when a sort parameter is declared.
    pub(super) order: OrderSpec,
    pub(super) limit: Option<LimitSpec>,
    pub(super) sort_parameter: Option<usize>,
    pub(super) limit_parameter: Option<usize>,
    pub(super) parameters: Vec<ParameterKind>,
    pub(super) returns: ReturnShape,
}

impl QueryMethodDescriptor {
    /// Method name this plan was parsed from
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    pub fn predicate(&self) -> &PredicateSpec {
        &self.predicate
    }

    /// Name-derived ordering
    pub fn order(&self) -> &OrderSpec {
        &self.order
    }

    /// Name-derived limit
    pub fn limit(&self) -> Option<LimitSpec> {
        self.limit
    }

    /// Position of the runtime sort argument, if declared
    pub fn sort_parameter(&self) -> Option<usize> {
        self.sort_parameter
    }

    /// Position of the runtime limit argument, if declared
    pub fn limit_parameter(&self) -> Option<usize> {
        self.limit_parameter
    }

    /// Declared parameter kinds
    pub fn parameters(&self) -> &[ParameterKind] {
        &self.parameters
    }

    pub fn returns(&self) -> ReturnShape {
        self.returns
    }

    /// Returns true if the result carries entities, so their order matters
    pub fn returns_entities(&self) -> bool {
        matches!(self.returns, ReturnShape::List | ReturnShape::Optional)
    }

    /// Returns true if this plan can ever run
    pub fn is_executable(&self) -> bool {
        self.predicate.is_executable()
    }

    /// Returns true if a point read replaces enumeration
    pub fn is_point_read(&self) -> bool {
        matches!(self.predicate, PredicateSpec::IdEquals { .. })
    }

    /// Returns true if results must be ordered before they are returned.
    ///
    /// Any limit forces an ordering so top-N is reproducible.
    pub fn requires_ordering(&self) -> bool {
        !self.order.is_empty()
            || self.sort_parameter.is_some()
            || self.limit.is_some()
            || self.limit_parameter.is_some()
    }

    /// Fails for plans that can never run.
    ///
    /// Returns the same error on every call.
    pub fn validate(&self) -> PlannerResult<()> {
        match &self.predicate {
            PredicateSpec::UnsupportedProperty { property } => {
                Err(PlannerError::unsupported_property(&self.method, property))
            }
            _ => Ok(()),
        }
    }
}
