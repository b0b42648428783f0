//! Baseline Store
//!
//! Read-only access to the expected ("golden") snapshots. Each project owns
//! one directory named after it under the store root.

use std::fs;
use std::path::{Path, PathBuf};

use ruling_core::{CoreError, CoreResult};

use crate::snapshot::Snapshot;

/// Read-only view over the recorded baselines.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    root: PathBuf,
}

impl BaselineStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a baseline directory exists for the project.
    pub fn has_project(&self, project_name: &str) -> bool {
        self.root.join(project_name).is_dir()
    }

    /// Expected snapshot directory for a project.
    ///
    /// A missing directory is a configuration error: a project the harness
    /// was told to check must have a recorded baseline.
    pub fn expected_root(&self, project_name: &str) -> CoreResult<PathBuf> {
        let dir = self.root.join(project_name);
        if !dir.is_dir() {
            return Err(CoreError::config(format!(
                "no baseline recorded for project '{}' (expected directory {})",
                project_name,
                dir.display()
            )));
        }
        Ok(dir)
    }

    /// Load the expected snapshot for a project.
    pub fn load(&self, project_name: &str) -> CoreResult<Snapshot> {
        let dir = self.expected_root(project_name)?;
        Snapshot::load(&dir)
    }

    /// Names of all projects with a recorded baseline, sorted.
    pub fn projects(&self) -> CoreResult<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}
