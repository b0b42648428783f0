//! Output Layout
//!
//! Every path a run reads or writes is derived here from the target
//! directory, the baseline root and the project name:
//!
//! - `<baseline_root>/<name>/…` expected snapshot
//! - `<target>/actual/<name>/…` actual snapshot
//! - `<target>/<name>_differences` serialized difference report
//! - `<target>/<name>_build.log` captured build output

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

/// Deterministic path layout for one harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunLayout {
    target_dir: PathBuf,
    baseline_root: PathBuf,
}

impl RunLayout {
    pub fn new(target_dir: impl Into<PathBuf>, baseline_root: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            baseline_root: baseline_root.into(),
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn baseline_root(&self) -> &Path {
        &self.baseline_root
    }

    /// Expected snapshot directory for a project.
    pub fn expected_root(&self, project_name: &str) -> PathBuf {
        self.baseline_root.join(project_name)
    }

    /// Actual snapshot directory for a project.
    pub fn actual_root(&self, project_name: &str) -> PathBuf {
        self.target_dir.join("actual").join(project_name)
    }

    /// Serialized difference report for a project.
    pub fn differences_path(&self, project_name: &str) -> PathBuf {
        self.target_dir.join(format!("{}_differences", project_name))
    }

    /// Captured build tool output for a project.
    pub fn build_log_path(&self, project_name: &str) -> PathBuf {
        self.target_dir.join(format!("{}_build.log", project_name))
    }

    /// Wipe and recreate the actual snapshot directory, and drop any stale
    /// differences file, so nothing from an earlier run can leak into this one.
    pub fn reset_outputs(&self, project_name: &str) -> CoreResult<PathBuf> {
        let actual = self.actual_root(project_name);
        if actual.exists() {
            fs::remove_dir_all(&actual)?;
        }
        fs::create_dir_all(&actual)?;

        let differences = self.differences_path(project_name);
        if differences.exists() {
            fs::remove_file(&differences)?;
        }
        Ok(actual)
    }
}
