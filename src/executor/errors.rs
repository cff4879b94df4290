//! Executor error types
//!
//! Codes:
//! - VAULT_QUERY_UNPARSABLE / VAULT_QUERY_UNSUPPORTED_PROPERTY (planner)
//! - VAULT_BACKEND_ERROR (store, passed through unmodified)
//! - VAULT_INVALID_ENTITY
//! - VAULT_MARSHALLING_FAILED
//! - VAULT_ARGUMENT_MISMATCH
//! - VAULT_INCORRECT_RESULT_SIZE
//! - VAULT_UNKNOWN_QUERY_METHOD

use thiserror::Error;

use crate::entity::MarshalError;
use crate::planner::PlannerError;
use crate::store::StoreError;

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Failures while running repository operations
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The method can never run
    #[error(transparent)]
    Rejected(#[from] PlannerError),

    /// Store client failure, not wrapped and not retried
    #[error(transparent)]
    Backend(#[from] StoreError),

    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    #[error("Cannot marshal record at '{path}': {source}")]
    Marshalling {
        path: String,
        #[source]
        source: MarshalError,
    },

    #[error("Arguments do not match '{method}': {reason}")]
    ArgumentMismatch { method: String, reason: String },

    #[error("'{method}' expected at most one result but matched {actual}")]
    IncorrectResultSize { method: String, actual: usize },

    #[error("No query method '{0}' is declared on this repository")]
    UnknownQueryMethod(String),
}

impl ExecutorError {
    pub(crate) fn argument_mismatch(method: &str, reason: impl Into<String>) -> Self {
        ExecutorError::ArgumentMismatch {
            method: method.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorError::Rejected(err) => err.code().code(),
            ExecutorError::Backend(_) => "VAULT_BACKEND_ERROR",
            ExecutorError::InvalidEntity(_) => "VAULT_INVALID_ENTITY",
            ExecutorError::Marshalling { .. } => "VAULT_MARSHALLING_FAILED",
            ExecutorError::ArgumentMismatch { .. } => "VAULT_ARGUMENT_MISMATCH",
            ExecutorError::IncorrectResultSize { .. } => "VAULT_INCORRECT_RESULT_SIZE",
            ExecutorError::UnknownQueryMethod(_) => "VAULT_UNKNOWN_QUERY_METHOD",
        }
    }

    /// The original store error, if this is a backend failure
    pub fn backend(&self) -> Option<&StoreError> {
        match self {
            ExecutorError::Backend(err) => Some(err),
            _ => None,
        }
    }

    /// The planner error, if the method was rejected
    pub fn rejection(&self) -> Option<&PlannerError> {
        match self {
            ExecutorError::Rejected(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_unsupported_property(&self) -> bool {
        self.rejection()
            .map(PlannerError::is_unsupported_property)
            .unwrap_or(false)
    }
}
