//! Build Job Executor
//!
//! Composes the ruling job for a prepared workspace and runs it through a
//! `BuildAdapter`. The executor only reports whether the build ran to
//! completion; deciding pass or fail is the comparator's job.

use std::fs;
use std::sync::Arc;
use std::time::Instant;

use ruling_core::{ProjectDescriptor, RunLayout};
use tracing::{error, info, warn};

use crate::models::{BuildJob, BuildOutcome, BuildSettings};
use crate::services::build::adapter::{AdapterRun, BuildAdapter};
use crate::services::build::properties::ruling_properties;
use crate::services::environment::ServiceHandle;
use crate::services::workspace::Workspace;

/// Runs build jobs against a live service.
pub struct BuildJobExecutor {
    adapter: Arc<dyn BuildAdapter>,
    layout: RunLayout,
}

impl BuildJobExecutor {
    pub fn new(adapter: Arc<dyn BuildAdapter>, layout: RunLayout) -> Self {
        Self { adapter, layout }
    }

    pub fn layout(&self) -> &RunLayout {
        &self.layout
    }

    /// Assemble the frozen job for a workspace. User-supplied properties are
    /// applied first so the ruling properties always win.
    pub fn job_for(
        &self,
        handle: &ServiceHandle,
        workspace: &Workspace,
        descriptor: &ProjectDescriptor,
        settings: &BuildSettings,
    ) -> BuildJob {
        let mut builder = BuildJob::builder(settings.adapter.target_for(workspace.path()))
            .properties(settings.properties.clone())
            .properties(ruling_properties(descriptor, &self.layout, handle.base_url()))
            .debug_logs(settings.debug_logs);
        for arg in &settings.arguments {
            builder = builder.argument(arg.clone());
        }
        if let Some(limit) = settings.timeout() {
            builder = builder.timeout(limit);
        }
        builder.build()
    }

    /// Run the job. The actual-output root is wiped first so nothing from a
    /// previous run survives into this one.
    pub async fn execute(
        &self,
        handle: &ServiceHandle,
        workspace: &Workspace,
        job: &BuildJob,
    ) -> BuildOutcome {
        let name = workspace.project_name();
        let started_at = chrono::Utc::now().timestamp_millis();
        let start = Instant::now();

        let run = match self.layout.reset_outputs(name) {
            Err(e) => AdapterRun::failed(None, String::new(), format!("output reset failed: {}", e)),
            Ok(_) => {
                info!(
                    "[Build] running {} job for {} ({} properties)",
                    self.adapter.name(),
                    name,
                    job.properties().len()
                );
                match self.adapter.run(job, workspace.path()).await {
                    Ok(run) => run,
                    Err(e) => AdapterRun::failed(None, String::new(), e.to_string()),
                }
            }
        };

        let build_log = self.layout.build_log_path(name);
        let build_log = match fs::write(&build_log, &run.output) {
            Ok(()) => Some(build_log),
            Err(e) => {
                warn!(
                    "[Build] could not write build log {}: {}",
                    build_log.display(),
                    e
                );
                None
            }
        };

        let outcome = BuildOutcome {
            success: run.success,
            exit_code: run.exit_code,
            message: run.message,
            duration_ms: start.elapsed().as_millis() as u64,
            started_at,
            finished_at: chrono::Utc::now().timestamp_millis(),
            log_refs: handle.log_paths().to_vec(),
            build_log,
        };

        if outcome.success {
            info!("[Build] {} {} in {}ms", name, outcome.status_label(), outcome.duration_ms);
        } else {
            error!("[Build] {} {}: {}", name, outcome.status_label(), outcome.message);
        }
        outcome
    }
}
