//! Project Identity
//!
//! The descriptor of the fixture project under analysis. A descriptor is
//! validated once when built and exposes no mutators afterwards.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Identity and layout of one fixture project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescriptor {
    key: String,
    name: String,
    source_dirs: Vec<PathBuf>,
    test_dirs: Vec<PathBuf>,
    binaries_path: PathBuf,
}

impl ProjectDescriptor {
    /// Create a validated descriptor.
    ///
    /// The name doubles as a path segment for the actual-output root and the
    /// differences file, so it must be a single non-empty segment. A single
    /// trailing `/` is tolerated and stripped.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        source_dirs: Vec<PathBuf>,
        test_dirs: Vec<PathBuf>,
        binaries_path: impl Into<PathBuf>,
    ) -> CoreResult<Self> {
        let key = key.into().trim().to_string();
        let name = name.into();
        let name = name.trim().trim_end_matches('/').to_string();

        if key.is_empty() {
            return Err(CoreError::validation("project key is required"));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(CoreError::validation(format!(
                "project key '{}' must not contain whitespace",
                key
            )));
        }
        if name.is_empty() {
            return Err(CoreError::validation("project name is required"));
        }
        if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(CoreError::validation(format!(
                "project name '{}' must be a single path segment",
                name
            )));
        }

        Ok(Self {
            key,
            name,
            source_dirs,
            test_dirs,
            binaries_path: binaries_path.into(),
        })
    }

    /// Project key registered with the service.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Project name; also names the output directories.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_dirs(&self) -> &[PathBuf] {
        &self.source_dirs
    }

    pub fn test_dirs(&self) -> &[PathBuf] {
        &self.test_dirs
    }

    pub fn binaries_path(&self) -> &Path {
        &self.binaries_path
    }

    /// Comma-joined source directories, the form the analyzer expects.
    pub fn joined_source_dirs(&self) -> String {
        join_paths(&self.source_dirs)
    }

    /// Comma-joined test directories.
    pub fn joined_test_dirs(&self) -> String {
        join_paths(&self.test_dirs)
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .collect::<Vec<_>>()
        .join(",")
}

/// A named rule configuration associated with a project on the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityProfileRef {
    /// Language the profile applies to (e.g. "java")
    pub language: String,
    /// Profile name on the service
    pub name: String,
}

impl QualityProfileRef {
    pub fn new(language: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            name: name.into(),
        }
    }
}

impl Default for QualityProfileRef {
    fn default() -> Self {
        Self::new("java", "rules")
    }
}
