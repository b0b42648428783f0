//! Shared fixtures for the integration tests.
//!
//! Fake service control, registry and build adapter that record every call
//! into one shared event log, so tests can assert what ran and in which
//! order.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use ruling_core::{ProjectDescriptor, RunLayout};
use ruling_harness::models::{BuildJob, BuildSettings, PluginArtifact, ServerOptions};
use ruling_harness::services::build::properties::DUMP_NEW;
use ruling_harness::services::build::{AdapterRun, BuildAdapter, BuildJobExecutor};
use ruling_harness::services::driver::{HarnessDriver, RunPlan};
use ruling_harness::services::environment::{
    EnvironmentController, HealthPolicy, HealthStatus, ServiceControl, ServiceHandle,
};
use ruling_harness::services::workspace::{ProjectRegistry, WorkspacePreparer};
use ruling_harness::utils::error::{HarnessError, HarnessResult};

pub type Events = Arc<Mutex<Vec<String>>>;

pub fn events_of(events: &Events) -> Vec<String> {
    events.lock().unwrap().clone()
}

pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

// ============================================================================
// Fakes
// ============================================================================

pub struct FakeControl {
    pub events: Events,
    pub home: PathBuf,
    pub fail_launch: bool,
}

#[async_trait]
impl ServiceControl for FakeControl {
    async fn launch(
        &self,
        _plugin: &Path,
        version: &str,
        _options: &ServerOptions,
    ) -> HarnessResult<ServiceHandle> {
        self.events.lock().unwrap().push("launch".to_string());
        if self.fail_launch {
            return Err(HarnessError::environment_startup("service did not boot"));
        }
        Ok(ServiceHandle::new("http://localhost:9000", &self.home, version))
    }

    async fn health(&self, _handle: &ServiceHandle) -> HealthStatus {
        HealthStatus::Up
    }

    async fn shutdown(&self, _handle: ServiceHandle) -> HarnessResult<()> {
        self.events.lock().unwrap().push("shutdown".to_string());
        Ok(())
    }
}

pub struct FakeRegistry {
    pub events: Events,
    pub reject: bool,
}

#[async_trait]
impl ProjectRegistry for FakeRegistry {
    async fn provision(&self, _handle: &ServiceHandle, key: &str, _name: &str) -> HarnessResult<()> {
        self.events.lock().unwrap().push(format!("provision {}", key));
        if self.reject {
            return Err(HarnessError::provisioning("insufficient privileges"));
        }
        Ok(())
    }

    async fn associate_quality_profile(
        &self,
        _handle: &ServiceHandle,
        key: &str,
        _language: &str,
        profile: &str,
    ) -> HarnessResult<()> {
        self.events
            .lock()
            .unwrap()
            .push(format!("profile {} {}", key, profile));
        Ok(())
    }
}

/// Writes a fixed artifact tree into `dump.new`, like the analyzer would.
pub struct FakeAdapter {
    pub events: Events,
    pub artifacts: BTreeMap<String, String>,
    pub succeed: bool,
    /// Property arguments of every job seen
    pub seen: Mutex<Vec<Vec<String>>>,
}

impl FakeAdapter {
    pub fn new(events: Events, artifacts: &[(&str, &str)], succeed: bool) -> Self {
        Self {
            events,
            artifacts: artifacts
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            succeed,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BuildAdapter for FakeAdapter {
    fn name(&self) -> &str {
        "fake"
    }

    async fn run(&self, job: &BuildJob, _workspace: &Path) -> HarnessResult<AdapterRun> {
        self.events.lock().unwrap().push("build".to_string());
        self.seen.lock().unwrap().push(job.property_args());
        if !self.succeed {
            return Ok(AdapterRun::failed(
                Some(1),
                "ERROR: analysis failed",
                "build exited with code 1",
            ));
        }
        let dump = PathBuf::from(job.property(DUMP_NEW).unwrap_or_default());
        for (rel, content) in &self.artifacts {
            let path = dump.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        Ok(AdapterRun::completed("ANALYSIS SUCCESSFUL"))
    }
}

// ============================================================================
// Harness fixture
// ============================================================================

/// Everything one fake ruling run needs, rooted in a temp directory:
///
/// ```text
/// root/plugin/ruling-plugin-1.0.jar
/// root/fixtures/calc/src/main/java/Calc.java
/// root/expected/calc/...      baseline
/// root/target/...             outputs
/// root/service/logs/...       service logs
/// ```
pub struct Harness {
    pub temp: TempDir,
    pub events: Events,
}

impl Harness {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write_tree(
            root,
            &[
                ("plugin/ruling-plugin-1.0.jar", "jar"),
                ("fixtures/calc/src/main/java/Calc.java", "class Calc {}"),
            ],
        );
        fs::create_dir_all(root.join("service")).unwrap();
        Self {
            temp,
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn layout(&self) -> RunLayout {
        RunLayout::new(self.root().join("target"), self.root().join("expected"))
    }

    pub fn with_baseline(self, files: &[(&str, &str)]) -> Self {
        write_tree(&self.root().join("expected/calc"), files);
        self
    }

    /// Write all four service log files with `lines` lines each.
    pub fn with_service_logs(self, lines: usize) -> Self {
        let logs = self.root().join("service/logs");
        fs::create_dir_all(&logs).unwrap();
        for file in ["sonar.log", "ce.log", "es.log", "web.log"] {
            let content: String = (0..lines).map(|i| format!("{} {}\n", file, i)).collect();
            fs::write(logs.join(file), content).unwrap();
        }
        self
    }

    pub fn plan(&self) -> RunPlan {
        RunPlan {
            descriptor: ProjectDescriptor::new(
                "checkstyle-test-project",
                "calc",
                vec![PathBuf::from("src/main/java")],
                Vec::new(),
                ".",
            )
            .unwrap(),
            fixture_root: self.root().join("fixtures"),
            plugin: PluginArtifact::wildcard(self.root().join("plugin"), "ruling-plugin-*.jar"),
            service_version: "LATEST_RELEASE[7.9]".to_string(),
            server_options: ServerOptions::default(),
            build: BuildSettings::default(),
            measures: None,
        }
    }

    pub fn control(&self, fail_launch: bool) -> Arc<FakeControl> {
        Arc::new(FakeControl {
            events: self.events.clone(),
            home: self.root().join("service"),
            fail_launch,
        })
    }

    pub fn registry(&self, reject: bool) -> Arc<FakeRegistry> {
        Arc::new(FakeRegistry {
            events: self.events.clone(),
            reject,
        })
    }

    pub fn adapter(&self, artifacts: &[(&str, &str)], succeed: bool) -> Arc<FakeAdapter> {
        Arc::new(FakeAdapter::new(self.events.clone(), artifacts, succeed))
    }

    pub fn driver(
        &self,
        control: Arc<FakeControl>,
        registry: Arc<FakeRegistry>,
        adapter: Arc<FakeAdapter>,
    ) -> HarnessDriver {
        let controller = EnvironmentController::new(control).with_health_policy(HealthPolicy {
            timeout: Duration::from_secs(1),
            interval: Duration::from_millis(5),
        });
        let preparer =
            WorkspacePreparer::new(registry).with_temp_parent(self.root().join("workspaces"));
        let executor = BuildJobExecutor::new(adapter, self.layout());
        HarnessDriver::new(controller, preparer, executor)
    }
}
