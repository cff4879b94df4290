//! Result types for query execution

use crate::planner::ReturnShape;
use crate::store::SecretFields;

/// A record read from the store, before unmarshalling
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRecord {
    /// Entity key (the id)
    pub key: String,
    pub fields: SecretFields,
}

impl LoadedRecord {
    pub fn new(key: impl Into<String>, fields: SecretFields) -> Self {
        Self {
            key: key.into(),
            fields,
        }
    }
}

/// Result of a derived query in its declared shape
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult<E> {
    List(Vec<E>),
    Optional(Option<E>),
    Boolean(bool),
    Count(u64),
}

impl<E> QueryResult<E> {
    pub fn shape(&self) -> ReturnShape {
        match self {
            QueryResult::List(_) => ReturnShape::List,
            QueryResult::Optional(_) => ReturnShape::Optional,
            QueryResult::Boolean(_) => ReturnShape::Boolean,
            QueryResult::Count(_) => ReturnShape::Count,
        }
    }

    pub fn into_list(self) -> Option<Vec<E>> {
        match self {
            QueryResult::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_optional(self) -> Option<Option<E>> {
        match self {
            QueryResult::Optional(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            QueryResult::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            QueryResult::Count(value) => Some(*value),
            _ => None,
        }
    }
}

/// What one execution did against the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Segments returned by `list`, folders included
    pub listed: usize,
    /// Segments dropped before load
    pub pruned: usize,
    /// Records read successfully
    pub loaded: usize,
    /// Keys listed but absent on read
    pub vanished: usize,
    /// Records in the result after limiting
    pub returned: usize,
    /// Whether the limit dropped records
    pub limit_applied: bool,
}

/// Result of query execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult<E> {
    pub result: QueryResult<E>,
    pub stats: ExecutionStats,
}
