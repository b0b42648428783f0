//! Baseline Comparator
//!
//! Byte-for-byte comparison of an actual artifact tree against its baseline.
//! Comparison is a pure function of the two trees: running it twice over the
//! same inputs yields the same report and the same serialized file.

use std::collections::BTreeSet;
use std::path::Path;

use ruling_core::{CoreError, CoreResult};
use tracing::{debug, info};

use crate::report::{DifferenceEntry, DifferenceReport};
use crate::snapshot::Snapshot;

/// Tree comparator for golden snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineComparator;

impl BaselineComparator {
    pub fn new() -> Self {
        Self
    }

    /// Compare the trees rooted at `expected_root` and `actual_root`.
    ///
    /// A missing expected root is a configuration error. A missing actual
    /// root means the build produced nothing, so every baseline file is
    /// reported as missing.
    pub fn compare(
        &self,
        project_key: &str,
        expected_root: &Path,
        actual_root: &Path,
    ) -> CoreResult<DifferenceReport> {
        if !expected_root.is_dir() {
            return Err(CoreError::config(format!(
                "baseline directory {} for project '{}' does not exist",
                expected_root.display(),
                project_key
            )));
        }

        let expected = Snapshot::load(expected_root)?;
        let actual = if actual_root.is_dir() {
            Snapshot::load(actual_root)?
        } else {
            debug!(
                "[Comparator] actual root {} absent, treating as empty",
                actual_root.display()
            );
            Snapshot::default()
        };

        Ok(self.compare_snapshots(project_key, &expected, &actual))
    }

    /// Compare two loaded snapshots.
    pub fn compare_snapshots(
        &self,
        project_key: &str,
        expected: &Snapshot,
        actual: &Snapshot,
    ) -> DifferenceReport {
        let all_paths: BTreeSet<&str> = expected.paths().chain(actual.paths()).collect();

        let mut entries = Vec::new();
        for path in all_paths {
            match (expected.get(path), actual.get(path)) {
                (Some(exp), None) => entries.push(DifferenceEntry::missing(path, exp)),
                (None, Some(act)) => entries.push(DifferenceEntry::extra(path, act)),
                (Some(exp), Some(act)) if exp != act => {
                    entries.push(DifferenceEntry::content_mismatch(path, exp, act))
                }
                _ => {}
            }
        }

        debug!(
            "[Comparator] {}: {} expected file(s), {} actual file(s), {} difference(s)",
            project_key,
            expected.len(),
            actual.len(),
            entries.len()
        );

        DifferenceReport::new(project_key, entries)
    }

    /// Compare, then serialize the report to `differences_path`.
    pub fn compare_and_persist(
        &self,
        project_key: &str,
        expected_root: &Path,
        actual_root: &Path,
        differences_path: &Path,
    ) -> CoreResult<DifferenceReport> {
        let report = self.compare(project_key, expected_root, actual_root)?;
        report.write_to(differences_path)?;
        info!(
            "[Comparator] wrote {} ({})",
            differences_path.display(),
            if report.is_empty() {
                "no differences".to_string()
            } else {
                report.summary()
            }
        );
        Ok(report)
    }
}
