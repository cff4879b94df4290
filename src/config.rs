//! Repository configuration
//!
//! Loaded from a JSON file, defaults filled by serde, then validated.
//!
//! ```json
//! {"collection": "secret/people", "validation": "eager", "log_level": "trace"}
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::Severity;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid config value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// When unsupported-property methods are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Fail on every invocation
    #[default]
    Lazy,
    /// Fail at repository construction
    Eager,
}

/// Log threshold as written in config files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn severity(&self) -> Severity {
        match self {
            LogLevel::Trace => Severity::Trace,
            LogLevel::Info => Severity::Info,
            LogLevel::Warn => Severity::Warn,
            LogLevel::Error => Severity::Error,
        }
    }
}

/// Configuration of one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Backend path prefix entities live under (required)
    pub collection: String,

    #[serde(default)]
    pub validation: ValidationMode,

    /// Minimum severity of the process-wide logger. Constructing a
    /// repository applies it for every repository in the process, so the
    /// last one built wins.
    #[serde(default)]
    pub log_level: LogLevel,
}

impl RepositoryConfig {
    /// Config for a collection with every other field defaulted
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            validation: ValidationMode::default(),
            log_level: LogLevel::default(),
        }
    }

    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    /// Sets the process-wide log level applied at repository construction
    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: RepositoryConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.collection.is_empty() {
            return Err(ConfigError::invalid("collection", "must not be empty"));
        }
        if self.collection.starts_with('/') || self.collection.ends_with('/') {
            return Err(ConfigError::invalid(
                "collection",
                format!("'{}' must not start or end with '/'", self.collection),
            ));
        }
        if self.collection.contains("//") {
            return Err(ConfigError::invalid(
                "collection",
                format!("'{}' contains an empty segment", self.collection),
            ));
        }
        Ok(())
    }
}
