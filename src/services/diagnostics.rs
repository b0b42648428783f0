//! Diagnostics Collector
//!
//! Tails the service log files after an infrastructure failure. Collection
//! is read-only and never fails: a file that is missing is skipped, a file
//! that cannot be read becomes a warning record.

use std::fs;
use std::path::PathBuf;

use ruling_core::LogStreamRef;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Lines kept from the end of each log file.
pub const LOGS_NUMBER_LINES: usize = 200;

/// Tail of one log stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DumpedStream {
    pub name: String,
    pub path: PathBuf,
    /// Kept lines, oldest first
    pub lines: Vec<String>,
    /// Line count of the whole file
    pub total_lines: usize,
}

/// A stream that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsWarning {
    pub name: String,
    pub path: PathBuf,
    pub message: String,
}

impl std::fmt::Display for DiagnosticsWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Diagnostics collection failure for {} ({}): {}",
            self.name,
            self.path.display(),
            self.message
        )
    }
}

/// Everything one `dump` produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsDump {
    /// Dumped streams in dump order
    pub streams: Vec<DumpedStream>,
    /// Names of streams whose file does not exist
    pub skipped: Vec<String>,
    pub warnings: Vec<DiagnosticsWarning>,
}

impl DiagnosticsDump {
    /// Names of the dumped streams, in order.
    pub fn stream_names(&self) -> Vec<&str> {
        self.streams.iter().map(|s| s.name.as_str()).collect()
    }

    /// Text form of the dump, markers included.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for stream in &self.streams {
            out.push_str(&start_marker(&stream.name));
            out.push('\n');
            for line in &stream.lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(&end_marker(&stream.name));
            out.push('\n');
        }
        out
    }
}

fn start_marker(name: &str) -> String {
    format!("=================================== START {} ===================================", name)
}

fn end_marker(name: &str) -> String {
    format!("=================================== END {} ===================================", name)
}

/// Dumps the tails of service log files.
#[derive(Debug, Clone)]
pub struct DiagnosticsCollector {
    max_lines: usize,
}

impl DiagnosticsCollector {
    pub fn new() -> Self {
        Self {
            max_lines: LOGS_NUMBER_LINES,
        }
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    /// Emit the tail of every existing stream, in category order.
    pub fn dump(&self, log_refs: &[LogStreamRef]) -> DiagnosticsDump {
        let mut refs: Vec<&LogStreamRef> = log_refs.iter().collect();
        refs.sort_by_key(|r| r.category);

        let mut dump = DiagnosticsDump::default();
        error!("[Diagnostics] DUMPING SERVER LOGS");

        for log_ref in refs {
            if !log_ref.path.exists() {
                dump.skipped.push(log_ref.name.clone());
                continue;
            }

            let bytes = match fs::read(&log_ref.path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    let warning = DiagnosticsWarning {
                        name: log_ref.name.clone(),
                        path: log_ref.path.clone(),
                        message: e.to_string(),
                    };
                    warn!("[Diagnostics] {}", warning);
                    dump.warnings.push(warning);
                    continue;
                }
            };

            let text = String::from_utf8_lossy(&bytes);
            let all: Vec<&str> = text.lines().collect();
            let skip = all.len().saturating_sub(self.max_lines);
            let lines: Vec<String> = all[skip..].iter().map(|l| l.to_string()).collect();

            error!("{}", start_marker(&log_ref.name));
            error!("{}", lines.join("\n"));
            error!("{}", end_marker(&log_ref.name));

            dump.streams.push(DumpedStream {
                name: log_ref.name.clone(),
                path: log_ref.path.clone(),
                lines,
                total_lines: all.len(),
            });
        }

        dump
    }
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new()
    }
}
