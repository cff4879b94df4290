//! Planner error types
//!
//! Error codes:
//! - VAULT_QUERY_UNPARSABLE (REJECT)
//! - VAULT_QUERY_UNSUPPORTED_PROPERTY (REJECT)

use std::fmt;

/// Severity levels for planner errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Method rejected, never retried
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Planner-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerErrorCode {
    /// Method name or signature does not match the supported grammar
    UnparsableQueryMethod,
    /// Predicate clause targets a property the store cannot filter on
    UnsupportedQueryProperty,
}

impl PlannerErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            PlannerErrorCode::UnparsableQueryMethod => "VAULT_QUERY_UNPARSABLE",
            PlannerErrorCode::UnsupportedQueryProperty => "VAULT_QUERY_UNSUPPORTED_PROPERTY",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for PlannerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Planner error type with full context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerError {
    /// Error code
    code: PlannerErrorCode,
    /// Human-readable message
    message: String,
    /// Offending method
    method: String,
    /// Property name if applicable
    property: Option<String>,
}

impl PlannerError {
    /// Create an unparsable method error
    pub fn unparsable(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: PlannerErrorCode::UnparsableQueryMethod,
            message: reason.into(),
            method: method.into(),
            property: None,
        }
    }

    /// Create an unsupported property error
    pub fn unsupported_property(method: impl Into<String>, property: impl Into<String>) -> Self {
        let p = property.into();
        Self {
            code: PlannerErrorCode::UnsupportedQueryProperty,
            message: format!(
                "Cannot filter on property '{}': the store only supports id-based criteria",
                p
            ),
            method: method.into(),
            property: Some(p),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> PlannerErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending method name
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the property name if applicable
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    pub fn is_unsupported_property(&self) -> bool {
        self.code == PlannerErrorCode::UnsupportedQueryProperty
    }
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} (method '{}')",
            self.code.severity(),
            self.code.code(),
            self.message,
            self.method
        )
    }
}

impl std::error::Error for PlannerError {}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PlannerErrorCode::UnparsableQueryMethod.code(),
            "VAULT_QUERY_UNPARSABLE"
        );
        assert_eq!(
            PlannerErrorCode::UnsupportedQueryProperty.code(),
            "VAULT_QUERY_UNSUPPORTED_PROPERTY"
        );
    }

    #[test]
    fn test_unsupported_property_context() {
        let err = PlannerError::unsupported_property("findInvalidByFirstname", "firstname");
        assert!(err.is_unsupported_property());
        assert_eq!(err.property(), Some("firstname"));
        assert_eq!(err.method(), "findInvalidByFirstname");
    }

    #[test]
    fn test_error_display() {
        let err = PlannerError::unparsable("deleteEverything", "unsupported verb");
        let display = format!("{}", err);
        assert!(display.contains("REJECT"));
        assert!(display.contains("VAULT_QUERY_UNPARSABLE"));
        assert!(display.contains("deleteEverything"));
    }
}
