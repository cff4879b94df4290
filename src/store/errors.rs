//! # Secret Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a secret store client.
///
/// These travel through the repository layer untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Get the HTTP-style status the backend would report
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::PermissionDenied(_) => 403,
            StoreError::InvalidPath(_) => 400,
            StoreError::Unavailable(_) => 503,
            StoreError::Backend(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(StoreError::PermissionDenied("people".into()).status_code(), 403);
        assert_eq!(StoreError::Unavailable("sealed".into()).status_code(), 503);
    }

    #[test]
    fn test_display() {
        let err = StoreError::InvalidPath("a//b".into());
        assert_eq!(err.to_string(), "Invalid path: a//b");
    }
}
