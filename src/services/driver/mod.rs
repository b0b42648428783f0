//! Harness Driver
//!
//! Composes the ruling run end to end:
//!
//! ```text
//! INIT -> ENVIRONMENT_UP -> PROJECT_READY -> BUILD_RAN -> COMPARED -> DONE
//!   \__________\________________\______________\____________\-> ABORTED
//! ```
//!
//! Once the environment is up, `after_session` always runs before the run
//! result is returned. Diagnostics are dumped on provisioning and build
//! failures only; a comparison mismatch is a content defect and is reported
//! through the difference report instead.

mod context;
mod state;

pub use context::SessionContext;
pub use state::HarnessState;

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use ruling_baseline::{BaselineComparator, BaselineStore, DifferenceReport};
use ruling_core::ProjectDescriptor;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::models::{BuildKind, BuildOutcome, BuildSettings, PluginArtifact, ServerOptions};
use crate::services::build::{BuildAdapter, BuildJobExecutor, MavenAdapter, ScannerAdapter};
use crate::services::diagnostics::{DiagnosticsCollector, DiagnosticsDump};
use crate::services::environment::{EnvironmentController, ProcessServiceControl};
use crate::services::measures::MeasuresClient;
use crate::services::workspace::{HttpProjectRegistry, WorkspacePreparer};
use crate::storage::config::HarnessConfig;
use crate::utils::error::{HarnessError, HarnessResult};

/// Post-run measures query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasuresPlan {
    pub component: String,
    pub metrics: Vec<String>,
}

/// Inputs of one ruling run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub descriptor: ProjectDescriptor,
    /// Directory holding one sub-directory per fixture project
    pub fixture_root: PathBuf,
    pub plugin: PluginArtifact,
    pub service_version: String,
    pub server_options: ServerOptions,
    pub build: BuildSettings,
    pub measures: Option<MeasuresPlan>,
}

impl RunPlan {
    pub fn from_config(config: &HarnessConfig) -> HarnessResult<Self> {
        let descriptor = config.descriptor()?;
        let measures = config.measures.enabled.then(|| MeasuresPlan {
            component: config
                .measures
                .component
                .clone()
                .unwrap_or_else(|| descriptor.key().to_string()),
            metrics: config.measures.metrics.clone(),
        });
        Ok(Self {
            descriptor,
            fixture_root: config.paths.fixtures.clone(),
            plugin: config.plugin_artifact(),
            service_version: config.service.version.clone(),
            server_options: config.server_options(),
            build: config.build.clone(),
            measures,
        })
    }
}

/// Everything a run observed, plus its result.
#[derive(Debug)]
pub struct RunReport {
    /// Visited states, `Init` first
    pub states: Vec<HarnessState>,
    pub build: Option<BuildOutcome>,
    /// Set when the comparator ran
    pub differences: Option<DifferenceReport>,
    /// Set when diagnostics were dumped
    pub diagnostics: Option<DiagnosticsDump>,
    pub measures: Option<BTreeMap<String, f64>>,
    pub comparator_invoked: bool,
    pub result: HarnessResult<()>,
}

impl RunReport {
    fn new() -> Self {
        Self {
            states: vec![HarnessState::Init],
            build: None,
            differences: None,
            diagnostics: None,
            measures: None,
            comparator_invoked: false,
            result: Ok(()),
        }
    }

    pub fn final_state(&self) -> HarnessState {
        self.states
            .last()
            .copied()
            .unwrap_or(HarnessState::Init)
    }

    pub fn passed(&self) -> bool {
        self.result.is_ok() && self.final_state() == HarnessState::Done
    }

    pub fn into_result(self) -> HarnessResult<()> {
        self.result
    }

    fn advance(&mut self, next: HarnessState) {
        let current = self.final_state();
        debug_assert!(
            current.can_advance_to(next),
            "illegal transition {} -> {}",
            current,
            next
        );
        info!("[Driver] {} -> {}", current, next);
        self.states.push(next);
    }

    fn finish(&mut self, result: HarnessResult<()>) {
        match &result {
            Ok(()) => self.advance(HarnessState::Done),
            Err(e) => {
                error!("[Driver] run aborted ({}): {}", e.kind_label(), e);
                self.advance(HarnessState::Aborted);
            }
        }
        debug_assert!(self.final_state().is_terminal());
        self.result = result;
    }
}

/// Runs one project through one service instance.
pub struct HarnessDriver {
    controller: EnvironmentController,
    preparer: WorkspacePreparer,
    executor: BuildJobExecutor,
    comparator: BaselineComparator,
    diagnostics: DiagnosticsCollector,
    measures: Option<MeasuresClient>,
}

impl HarnessDriver {
    pub fn new(
        controller: EnvironmentController,
        preparer: WorkspacePreparer,
        executor: BuildJobExecutor,
    ) -> Self {
        Self {
            controller,
            preparer,
            executor,
            comparator: BaselineComparator::new(),
            diagnostics: DiagnosticsCollector::new(),
            measures: None,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: DiagnosticsCollector) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_measures(mut self, client: MeasuresClient) -> Self {
        self.measures = Some(client);
        self
    }

    /// Wire the production collaborators from configuration.
    pub fn from_config(config: &HarnessConfig) -> HarnessResult<Self> {
        let control = ProcessServiceControl::new(
            config.launcher_path(),
            &config.service.home,
            &config.service.base_url,
        )
        .with_launcher_args(config.service.launcher_args.clone());
        let controller = EnvironmentController::new(Arc::new(control))
            .with_health_policy(config.health_policy());

        let mut registry = HttpProjectRegistry::new();
        if let (Some(user), Some(password)) = (&config.service.user, &config.service.password) {
            registry = registry.with_credentials(user, password);
        }
        let mut preparer = WorkspacePreparer::new(Arc::new(registry))
            .with_quality_profile(config.quality_profile());
        if let Some(parent) = &config.paths.workspace_parent {
            preparer = preparer.with_temp_parent(parent);
        }

        let adapter: Arc<dyn BuildAdapter> = match &config.build.adapter {
            BuildKind::Scanner => {
                let mut adapter = ScannerAdapter::new();
                if let Some(program) = &config.build.program {
                    adapter = adapter.with_program(program);
                }
                Arc::new(adapter)
            }
            BuildKind::Maven { .. } => {
                let mut adapter = MavenAdapter::new();
                if let Some(program) = &config.build.program {
                    adapter = adapter.with_program(program);
                }
                Arc::new(adapter)
            }
        };
        let executor = BuildJobExecutor::new(adapter, config.layout());

        let mut driver = Self::new(controller, preparer, executor);
        if config.measures.enabled {
            driver = driver.with_measures(MeasuresClient::new());
        }
        Ok(driver)
    }

    /// Start the service and open a session.
    pub async fn before_session(&mut self, plan: &RunPlan) -> HarnessResult<SessionContext> {
        let handle = self
            .controller
            .start(&plan.plugin, &plan.service_version, &plan.server_options)
            .await?;
        Ok(SessionContext::new(handle, self.executor.layout().clone()))
    }

    /// Close the session. Never fails.
    pub async fn after_session(&mut self, ctx: SessionContext) {
        self.controller.stop(ctx.into_handle()).await;
    }

    /// Run the whole state machine once.
    pub async fn run(&mut self, plan: &RunPlan) -> RunReport {
        let mut report = RunReport::new();
        info!(
            "[Driver] ruling run for {} ({})",
            plan.descriptor.key(),
            plan.descriptor.name()
        );

        let ctx = match self.before_session(plan).await {
            Ok(ctx) => ctx,
            Err(e) => {
                report.finish(Err(e));
                return report;
            }
        };
        report.advance(HarnessState::EnvironmentUp);

        let result = self.run_session(&ctx, plan, &mut report).await;
        self.after_session(ctx).await;
        report.finish(result);
        report
    }

    async fn run_session(
        &self,
        ctx: &SessionContext,
        plan: &RunPlan,
        report: &mut RunReport,
    ) -> HarnessResult<()> {
        let descriptor = &plan.descriptor;

        let workspace = match self
            .preparer
            .prepare(ctx.handle(), &plan.fixture_root, descriptor)
            .await
        {
            Ok(workspace) => workspace,
            Err(e) => {
                report.diagnostics = Some(self.diagnostics.dump(ctx.handle().log_paths()));
                return Err(as_provisioning(e));
            }
        };
        report.advance(HarnessState::ProjectReady);

        let job = self
            .executor
            .job_for(ctx.handle(), &workspace, descriptor, &plan.build);
        let outcome = self.executor.execute(ctx.handle(), &workspace, &job).await;
        report.build = Some(outcome.clone());
        report.advance(HarnessState::BuildRan);

        if !outcome.success {
            if let Some(build_log) = &outcome.build_log {
                error!("[Driver] build output: {}", build_log.display());
            }
            report.diagnostics = Some(self.diagnostics.dump(&outcome.log_refs));
            return Err(HarnessError::build(format!(
                "{} ({})",
                descriptor.key(),
                outcome.message
            )));
        }

        let layout = ctx.layout();
        let name = descriptor.name();
        let expected_root = BaselineStore::new(layout.baseline_root()).expected_root(name)?;
        let differences_path = layout.differences_path(name);

        report.comparator_invoked = true;
        let differences = self.comparator.compare_and_persist(
            descriptor.key(),
            &expected_root,
            &layout.actual_root(name),
            &differences_path,
        )?;
        report.differences = Some(differences.clone());
        report.advance(HarnessState::Compared);

        let persisted = fs::read_to_string(&differences_path)?;
        if !persisted.is_empty() {
            return Err(HarnessError::ComparisonMismatch(Box::new(differences)));
        }

        if let (Some(client), Some(measures)) = (&self.measures, &plan.measures) {
            let metrics: Vec<&str> = measures.metrics.iter().map(String::as_str).collect();
            match client
                .component_measures(ctx.handle(), &measures.component, &metrics)
                .await
            {
                Ok(values) => {
                    info!("[Driver] measures for {}: {:?}", measures.component, values);
                    report.measures = Some(values);
                }
                Err(e) => warn!("[Driver] measures query failed: {}", e),
            }
        }

        Ok(())
    }
}

fn as_provisioning(err: HarnessError) -> HarnessError {
    match err {
        HarnessError::Provisioning(_) => err,
        other => HarnessError::provisioning(other.to_string()),
    }
}
