//! Error Handling
//!
//! Run-level error type for the harness. Uses thiserror for ergonomic error
//! definitions. The first four variants are the failure kinds a ruling run
//! can end with; the rest are plumbing errors that get folded into one of
//! them by the driver.

use ruling_baseline::DifferenceReport;
use ruling_core::CoreError;
use thiserror::Error;

/// Harness-wide error type
#[derive(Error, Debug)]
pub enum HarnessError {
    /// The service never reached a healthy state
    #[error("Environment startup failure: {0}")]
    EnvironmentStartup(String),

    /// The service rejected project registration
    #[error("Provisioning failure: {0}")]
    Provisioning(String),

    /// The build adapter did not run to completion
    #[error("Build failure for project: {0}")]
    Build(String),

    /// The build succeeded but its artifacts differ from the baseline
    #[error("Comparison mismatch: {}", .0.summary())]
    ComparisonMismatch(Box<DifferenceReport>),

    /// Configuration errors (including bad baseline wiring)
    #[error("Configuration error: {0}")]
    Config(String),

    /// API misuse, e.g. a second active service handle
    #[error("Usage error: {0}")]
    Usage(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP errors talking to the service
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for harness errors
pub type HarnessResult<T> = Result<T, HarnessError>;

impl HarnessError {
    /// Create an environment startup error
    pub fn environment_startup(msg: impl Into<String>) -> Self {
        Self::EnvironmentStartup(msg.into())
    }

    /// Create a provisioning error
    pub fn provisioning(msg: impl Into<String>) -> Self {
        Self::Provisioning(msg.into())
    }

    /// Create a build error
    pub fn build(msg: impl Into<String>) -> Self {
        Self::Build(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a usage error
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Short label of the failure kind, used in logs and the CLI summary.
    pub fn kind_label(&self) -> &'static str {
        match self {
            HarnessError::EnvironmentStartup(_) => "environment-startup",
            HarnessError::Provisioning(_) => "provisioning",
            HarnessError::Build(_) => "build",
            HarnessError::ComparisonMismatch(_) => "comparison-mismatch",
            HarnessError::Config(_) => "config",
            HarnessError::Usage(_) => "usage",
            HarnessError::Io(_) => "io",
            HarnessError::Serialization(_) => "serialization",
            HarnessError::Http(_) => "http",
            HarnessError::Internal(_) => "internal",
        }
    }
}

impl From<CoreError> for HarnessError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config(msg) | CoreError::Validation(msg) => HarnessError::Config(msg),
            CoreError::Io(e) => HarnessError::Io(e),
            CoreError::Serialization(e) => HarnessError::Serialization(e),
            other => HarnessError::Internal(other.to_string()),
        }
    }
}

impl From<toml::de::Error> for HarnessError {
    fn from(err: toml::de::Error) -> Self {
        HarnessError::Config(format!("invalid configuration file: {}", err))
    }
}

/// Convert HarnessError to a string
impl From<HarnessError> for String {
    fn from(err: HarnessError) -> String {
        err.to_string()
    }
}
