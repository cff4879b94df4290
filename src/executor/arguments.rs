//! Call arguments and their binding against a descriptor
//!
//! Descriptors only record parameter positions. Binding reads the values at
//! those positions for one call and never changes the descriptor.

use serde_json::Value;

use crate::planner::{
    OrderSpec, ParameterKind, PredicateSpec, QueryMethodDescriptor, SortSpec,
};

use super::errors::{ExecutorError, ExecutorResult};

/// One argument of a derived query call
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Bound to a predicate
    Value(Value),
    /// Runtime ordering; replaces any name-derived ordering
    Sort(OrderSpec),
    /// Runtime result cap; zero yields an empty result
    Limit(usize),
}

impl Argument {
    pub fn value(value: impl Into<Value>) -> Self {
        Argument::Value(value.into())
    }

    pub fn kind(&self) -> ParameterKind {
        match self {
            Argument::Value(_) => ParameterKind::Value,
            Argument::Sort(_) => ParameterKind::Sort,
            Argument::Limit(_) => ParameterKind::Limit,
        }
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::Value(Value::String(value.to_string()))
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Argument::Value(Value::String(value))
    }
}

impl From<OrderSpec> for Argument {
    fn from(order: OrderSpec) -> Self {
        Argument::Sort(order)
    }
}

impl From<SortSpec> for Argument {
    fn from(order: SortSpec) -> Self {
        Argument::Sort(OrderSpec::by(order))
    }
}

/// Predicate with its value resolved for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundPredicate {
    All,
    IdEquals(String),
    IdPrefix(String),
}

/// Everything the executor needs for one call
#[derive(Debug, Clone)]
pub struct BoundQuery {
    pub predicate: BoundPredicate,
    /// Static order, or the runtime sort argument when one is declared
    pub order: OrderSpec,
    pub limit: Option<usize>,
    /// Whether loaded records are sorted before limiting
    pub ordered: bool,
}

impl BoundQuery {
    /// Binds call arguments to a descriptor.
    ///
    /// Rejected descriptors fail here, before any argument is inspected.
    pub fn bind(descriptor: &QueryMethodDescriptor, args: &[Argument]) -> ExecutorResult<Self> {
        descriptor.validate()?;

        let method = descriptor.method();
        let declared = descriptor.parameters();
        if args.len() != declared.len() {
            return Err(ExecutorError::argument_mismatch(
                method,
                format!("expected {} argument(s), got {}", declared.len(), args.len()),
            ));
        }
        for (position, (arg, kind)) in args.iter().zip(declared).enumerate() {
            if arg.kind() != *kind {
                return Err(ExecutorError::argument_mismatch(
                    method,
                    format!(
                        "argument {} must be {:?}, got {:?}",
                        position,
                        kind,
                        arg.kind()
                    ),
                ));
            }
        }

        let predicate = match descriptor.predicate() {
            PredicateSpec::IdEquals { parameter } => {
                BoundPredicate::IdEquals(id_argument(method, args, *parameter)?)
            }
            PredicateSpec::IdPrefix { parameter } => {
                BoundPredicate::IdPrefix(id_argument(method, args, *parameter)?)
            }
            _ => BoundPredicate::All,
        };

        let order = match descriptor.sort_parameter().map(|p| &args[p]) {
            Some(Argument::Sort(order)) => order.clone(),
            _ => descriptor.order().clone(),
        };

        let limit = match descriptor.limit() {
            Some(limit) => Some(usize::try_from(limit.get()).unwrap_or(usize::MAX)),
            None => match descriptor.limit_parameter().map(|p| &args[p]) {
                Some(Argument::Limit(limit)) => Some(*limit),
                _ => None,
            },
        };

        Ok(Self {
            predicate,
            order,
            limit,
            ordered: descriptor.requires_ordering(),
        })
    }
}

fn id_argument(method: &str, args: &[Argument], position: usize) -> ExecutorResult<String> {
    match &args[position] {
        Argument::Value(Value::String(id)) => Ok(id.clone()),
        other => Err(ExecutorError::argument_mismatch(
            method,
            format!("argument {} must be a string id, got {:?}", position, other),
        )),
    }
}
