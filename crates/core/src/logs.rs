//! Service Log Streams
//!
//! References to the log files written by the analysis service's
//! subsystems. They are only read when a run fails.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Service subsystem that owns a log file.
///
/// The declaration order is the dump order: diagnostics must come out the
/// same way on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    /// Main application process
    Application,
    /// Background task processing (compute engine)
    BackgroundProcessing,
    /// Search indexing
    Indexing,
    /// Web server
    Web,
}

impl LogCategory {
    /// All categories in dump order.
    pub const ALL: [LogCategory; 4] = [
        LogCategory::Application,
        LogCategory::BackgroundProcessing,
        LogCategory::Indexing,
        LogCategory::Web,
    ];

    /// File name the service writes for this category under its `logs/` dir.
    pub fn file_name(&self) -> &'static str {
        match self {
            LogCategory::Application => "sonar.log",
            LogCategory::BackgroundProcessing => "ce.log",
            LogCategory::Indexing => "es.log",
            LogCategory::Web => "web.log",
        }
    }
}

impl std::fmt::Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogCategory::Application => write!(f, "application"),
            LogCategory::BackgroundProcessing => write!(f, "background-processing"),
            LogCategory::Indexing => write!(f, "indexing"),
            LogCategory::Web => write!(f, "web"),
        }
    }
}

/// A named log file belonging to one service subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStreamRef {
    pub category: LogCategory,
    /// Display name used in the dump markers
    pub name: String,
    pub path: PathBuf,
}

impl LogStreamRef {
    pub fn new(category: LogCategory, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| category.file_name().to_string());
        Self {
            category,
            name,
            path,
        }
    }

    /// The four standard streams of a service installed at `home`.
    pub fn standard_set(home: &Path) -> Vec<LogStreamRef> {
        let logs_dir = home.join("logs");
        LogCategory::ALL
            .iter()
            .map(|c| LogStreamRef::new(*c, logs_dir.join(c.file_name())))
            .collect()
    }
}
