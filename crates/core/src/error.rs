//! Core Error Types
//!
//! Errors raised by the snapshot, baseline and layout code. The harness crate
//! folds these into `HarnessError`, which adds the run-level failure kinds
//! (startup, provisioning, build, comparison mismatch).

use thiserror::Error;

/// Error type of the core and baseline crates.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Baseline or layout wiring is wrong (e.g. no baseline for a project)
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A project descriptor failed its checks
    #[error("Validation error: {0}")]
    Validation(String),

    /// A snapshot root does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Walking a tree failed for a reason other than plain I/O
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
