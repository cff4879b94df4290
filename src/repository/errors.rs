//! Repository bootstrap errors

use thiserror::Error;

use crate::config::ConfigError;
use crate::planner::PlannerError;

/// Result type for repository construction
pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Failures while constructing a repository. All are permanent.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A declared method was rejected by the planner
    #[error(transparent)]
    Rejected(#[from] PlannerError),

    #[error("Query method '{0}' is declared more than once")]
    DuplicateMethod(String),
}

impl BootstrapError {
    pub fn code(&self) -> &'static str {
        match self {
            BootstrapError::Config(_) => "VAULT_CONFIG_INVALID",
            BootstrapError::Rejected(err) => err.code().code(),
            BootstrapError::DuplicateMethod(_) => "VAULT_DUPLICATE_QUERY_METHOD",
        }
    }

    /// The planner error naming the offending method, if any
    pub fn rejection(&self) -> Option<&PlannerError> {
        match self {
            BootstrapError::Rejected(err) => Some(err),
            _ => None,
        }
    }
}
