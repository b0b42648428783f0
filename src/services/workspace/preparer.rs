//! Project Workspace Preparer
//!
//! Materializes an isolated copy of a fixture project and registers the
//! project with the service. The fixture tree itself is never written to.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ruling_core::{ProjectDescriptor, QualityProfileRef};
use tempfile::TempDir;
use tracing::info;

use crate::services::environment::ServiceHandle;
use crate::services::workspace::registry::ProjectRegistry;
use crate::utils::error::{HarnessError, HarnessResult};
use crate::utils::paths::copy_dir_recursive;

/// A fresh copy of a fixture project. The backing temporary directory is
/// removed when the workspace is dropped.
#[derive(Debug)]
pub struct Workspace {
    _dir: TempDir,
    project_dir: PathBuf,
    project_name: String,
    files_copied: usize,
}

impl Workspace {
    /// Root of the copied project.
    pub fn path(&self) -> &Path {
        &self.project_dir
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn files_copied(&self) -> usize {
        self.files_copied
    }
}

/// Copies fixtures and registers project identity.
pub struct WorkspacePreparer {
    registry: Arc<dyn ProjectRegistry>,
    profile: QualityProfileRef,
    temp_parent: Option<PathBuf>,
}

impl WorkspacePreparer {
    pub fn new(registry: Arc<dyn ProjectRegistry>) -> Self {
        Self {
            registry,
            profile: QualityProfileRef::default(),
            temp_parent: None,
        }
    }

    pub fn with_quality_profile(mut self, profile: QualityProfileRef) -> Self {
        self.profile = profile;
        self
    }

    /// Create workspaces under `dir` instead of the system temp directory.
    pub fn with_temp_parent(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_parent = Some(dir.into());
        self
    }

    /// Copy `fixture_root/<name>` into a fresh temporary directory, then
    /// register the project and its quality profile.
    pub async fn prepare(
        &self,
        handle: &ServiceHandle,
        fixture_root: &Path,
        descriptor: &ProjectDescriptor,
    ) -> HarnessResult<Workspace> {
        let workspace = self.materialize(fixture_root, descriptor)?;

        self.registry
            .provision(handle, descriptor.key(), descriptor.name())
            .await?;
        self.registry
            .associate_quality_profile(
                handle,
                descriptor.key(),
                &self.profile.language,
                &self.profile.name,
            )
            .await?;

        Ok(workspace)
    }

    /// Copy the fixture without touching the service.
    pub fn materialize(
        &self,
        fixture_root: &Path,
        descriptor: &ProjectDescriptor,
    ) -> HarnessResult<Workspace> {
        let source = fixture_root.join(descriptor.name());
        if !source.is_dir() {
            return Err(HarnessError::config(format!(
                "fixture project {} does not exist",
                source.display()
            )));
        }

        let prefix = format!("ruling-{}-", descriptor.name());
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);
        let dir = match &self.temp_parent {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };

        let project_dir = dir.path().join(descriptor.name());
        let files_copied = copy_dir_recursive(&source, &project_dir)?;
        info!(
            "[Workspace] copied {} file(s) from {} to {}",
            files_copied,
            source.display(),
            project_dir.display()
        );

        Ok(Workspace {
            _dir: dir,
            project_dir,
            project_name: descriptor.name().to_string(),
            files_copied,
        })
    }
}
