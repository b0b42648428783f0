//! Difference Report
//!
//! The outcome of comparing an actual snapshot against its baseline, and the
//! plain-text form persisted as `<target>/<name>_differences`. An empty report
//! serializes to an empty file; that emptiness is what marks a run as passed.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use ruling_core::CoreResult;
use serde::{Deserialize, Serialize};
use similar::TextDiff;

/// Kind of divergence for a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DifferenceKind {
    /// In the baseline, absent from the actual output
    Missing,
    /// In the actual output, absent from the baseline
    Extra,
    /// In both, bytes differ
    ContentMismatch,
}

impl std::fmt::Display for DifferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DifferenceKind::Missing => write!(f, "MISSING"),
            DifferenceKind::Extra => write!(f, "EXTRA"),
            DifferenceKind::ContentMismatch => write!(f, "CONTENT_MISMATCH"),
        }
    }
}

/// One divergent path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferenceEntry {
    /// Path relative to the snapshot root, `/`-separated
    pub path: String,
    pub kind: DifferenceKind,
    /// Baseline content (lossy UTF-8), absent for `Extra`
    pub expected: Option<String>,
    /// Actual content (lossy UTF-8), absent for `Missing`
    pub actual: Option<String>,
    /// Either side is not valid UTF-8
    pub binary: bool,
    /// Raw baseline size in bytes
    #[serde(default)]
    pub expected_len: Option<usize>,
    /// Raw actual size in bytes
    #[serde(default)]
    pub actual_len: Option<usize>,
}

impl DifferenceEntry {
    pub fn missing(path: impl Into<String>, expected: &[u8]) -> Self {
        Self {
            path: path.into(),
            kind: DifferenceKind::Missing,
            expected: Some(String::from_utf8_lossy(expected).into_owned()),
            actual: None,
            binary: std::str::from_utf8(expected).is_err(),
            expected_len: Some(expected.len()),
            actual_len: None,
        }
    }

    pub fn extra(path: impl Into<String>, actual: &[u8]) -> Self {
        Self {
            path: path.into(),
            kind: DifferenceKind::Extra,
            expected: None,
            actual: Some(String::from_utf8_lossy(actual).into_owned()),
            binary: std::str::from_utf8(actual).is_err(),
            expected_len: None,
            actual_len: Some(actual.len()),
        }
    }

    pub fn content_mismatch(path: impl Into<String>, expected: &[u8], actual: &[u8]) -> Self {
        Self {
            path: path.into(),
            kind: DifferenceKind::ContentMismatch,
            expected: Some(String::from_utf8_lossy(expected).into_owned()),
            actual: Some(String::from_utf8_lossy(actual).into_owned()),
            binary: std::str::from_utf8(expected).is_err() || std::str::from_utf8(actual).is_err(),
            expected_len: Some(expected.len()),
            actual_len: Some(actual.len()),
        }
    }
}

/// Ordered list of differences for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferenceReport {
    pub project_key: String,
    entries: Vec<DifferenceEntry>,
}

impl DifferenceReport {
    /// Create a report; entries are sorted by path.
    pub fn new(project_key: impl Into<String>, mut entries: Vec<DifferenceEntry>) -> Self {
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Self {
            project_key: project_key.into(),
            entries,
        }
    }

    pub fn entries(&self) -> &[DifferenceEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of entries of a given kind.
    pub fn count(&self, kind: DifferenceKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        format!(
            "{} difference(s) for {}: {} missing, {} extra, {} content mismatch",
            self.len(),
            self.project_key,
            self.count(DifferenceKind::Missing),
            self.count(DifferenceKind::Extra),
            self.count(DifferenceKind::ContentMismatch),
        )
    }

    /// Text form of the report. Empty string for an empty report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (idx, entry) in self.entries.iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "{} {}", entry.kind, entry.path);

            if entry.kind != DifferenceKind::ContentMismatch {
                continue;
            }
            if entry.binary {
                let _ = writeln!(
                    out,
                    "(binary content differs: {} bytes expected, {} bytes actual)",
                    entry.expected_len.unwrap_or_default(),
                    entry.actual_len.unwrap_or_default()
                );
                continue;
            }
            let expected = entry.expected.as_deref().unwrap_or_default();
            let actual = entry.actual.as_deref().unwrap_or_default();
            let old_header = format!("expected/{}", entry.path);
            let new_header = format!("actual/{}", entry.path);
            let diff = TextDiff::from_lines(expected, actual);
            let unified = diff
                .unified_diff()
                .context_radius(3)
                .header(&old_header, &new_header)
                .to_string();
            out.push_str(&unified);
            if !unified.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }

    /// Write the text form to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render())?;
        Ok(())
    }
}
