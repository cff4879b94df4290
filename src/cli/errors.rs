//! CLI-specific error types

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::executor::ExecutorError;
use crate::repository::BootstrapError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdout)
    IoError,
    /// Data file is not an object of id -> field record
    InvalidData,
    /// A flag value could not be interpreted
    InvalidArgument,
    /// Repository bootstrap or query execution failed
    QueryFailed,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "VAULT_CLI_CONFIG_ERROR",
            Self::IoError => "VAULT_CLI_IO_ERROR",
            Self::InvalidData => "VAULT_CLI_INVALID_DATA",
            Self::InvalidArgument => "VAULT_CLI_INVALID_ARGUMENT",
            Self::QueryFailed => "VAULT_CLI_QUERY_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
    /// Code of the library error behind a query failure
    cause_code: Option<&'static str>,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            cause_code: None,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidData, msg)
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidArgument, msg)
    }

    fn query_failed(cause_code: &'static str, msg: impl Into<String>) -> Self {
        Self {
            code: CliErrorCode::QueryFailed,
            message: msg.into(),
            cause_code: Some(cause_code),
        }
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Code reported in error responses: the library code when there is one
    pub fn code_str(&self) -> &'static str {
        self.cause_code.unwrap_or_else(|| self.code.code())
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<BootstrapError> for CliError {
    fn from(e: BootstrapError) -> Self {
        match e {
            BootstrapError::Config(config) => config.into(),
            other => Self::query_failed(other.code(), other.to_string()),
        }
    }
}

impl From<ExecutorError> for CliError {
    fn from(e: ExecutorError) -> Self {
        Self::query_failed(e.code(), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
