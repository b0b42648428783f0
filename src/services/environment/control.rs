//! Service Control Surface
//!
//! `ServiceControl` is the seam to the analysis service process. The
//! controller owns lifecycle policy (single active handle, health wait,
//! unconditional release); implementations only know how to launch, probe
//! and kill one instance.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::models::ServerOptions;
use crate::services::environment::handle::ServiceHandle;
use crate::utils::error::{HarnessError, HarnessResult};
use crate::utils::http::http_client;
use crate::utils::paths::ensure_dir;

/// Health endpoint of the service.
pub const STATUS_ENDPOINT: &str = "api/system/status";

/// Upper bound for a single health probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of one health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Service reports itself operational
    Up,
    /// Not answering yet, or still booting
    Starting,
    /// Service reports a terminal failure
    Down(String),
}

/// Launch, probe and stop one analysis service instance.
#[async_trait]
pub trait ServiceControl: Send + Sync {
    /// Install the plugin and launch the service. Returns once the process
    /// is spawned; the caller waits for health.
    async fn launch(
        &self,
        plugin: &Path,
        version: &str,
        options: &ServerOptions,
    ) -> HarnessResult<ServiceHandle>;

    /// Probe the service once.
    async fn health(&self, handle: &ServiceHandle) -> HealthStatus;

    /// Stop the service and release its resources.
    async fn shutdown(&self, handle: ServiceHandle) -> HarnessResult<()>;
}

/// Interpret the body of the status endpoint.
pub fn parse_status(body: &serde_json::Value) -> HealthStatus {
    match body.get("status").and_then(|s| s.as_str()) {
        Some("UP") => HealthStatus::Up,
        Some("DOWN") => HealthStatus::Down(
            body.get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("service reported DOWN")
                .to_string(),
        ),
        _ => HealthStatus::Starting,
    }
}

/// Runs the service as a local child process from an unpacked distribution.
pub struct ProcessServiceControl {
    /// Launcher executable (e.g. the distribution's start script)
    launcher: PathBuf,
    /// Extra launcher arguments placed before the server properties
    launcher_args: Vec<String>,
    /// Service installation directory
    home: PathBuf,
    /// URL the service listens on
    base_url: String,
    client: reqwest::Client,
}

impl ProcessServiceControl {
    pub fn new(
        launcher: impl Into<PathBuf>,
        home: impl Into<PathBuf>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            launcher: launcher.into(),
            launcher_args: Vec::new(),
            home: home.into(),
            base_url: base_url.into(),
            client: http_client(PROBE_TIMEOUT),
        }
    }

    pub fn with_launcher_args(mut self, args: Vec<String>) -> Self {
        self.launcher_args = args;
        self
    }

    /// Directory the service loads plugins from.
    pub fn plugins_dir(&self) -> PathBuf {
        self.home.join("extensions").join("plugins")
    }

    /// Copy the plugin jar into the service's plugin directory.
    pub fn install_plugin(&self, plugin: &Path) -> HarnessResult<PathBuf> {
        let plugins_dir = self.plugins_dir();
        ensure_dir(&plugins_dir)?;
        let file_name = plugin.file_name().ok_or_else(|| {
            HarnessError::config(format!("plugin path {} has no file name", plugin.display()))
        })?;
        let installed = plugins_dir.join(file_name);
        std::fs::copy(plugin, &installed)?;
        info!("[Environment] installed plugin {}", installed.display());
        Ok(installed)
    }

    /// Launcher arguments: fixed args then `-Dkey=value` server properties.
    pub fn launch_args(&self, options: &ServerOptions) -> Vec<String> {
        let mut args = self.launcher_args.clone();
        args.extend(
            options
                .effective_properties()
                .iter()
                .map(|(k, v)| format!("-D{}={}", k, v)),
        );
        args
    }
}

#[async_trait]
impl ServiceControl for ProcessServiceControl {
    async fn launch(
        &self,
        plugin: &Path,
        version: &str,
        options: &ServerOptions,
    ) -> HarnessResult<ServiceHandle> {
        self.install_plugin(plugin)
            .map_err(|e| HarnessError::environment_startup(format!("plugin install: {}", e)))?;

        let args = self.launch_args(options);
        debug!(
            "[Environment] launching {} {:?}",
            self.launcher.display(),
            args
        );

        let child = Command::new(&self.launcher)
            .args(&args)
            .env("RULING_SERVICE_VERSION", version)
            .env("RULING_SERVICE_HOME", &self.home)
            .current_dir(&self.home)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                HarnessError::environment_startup(format!(
                    "failed to launch {}: {}",
                    self.launcher.display(),
                    e
                ))
            })?;

        Ok(ServiceHandle::new(&self.base_url, &self.home, version).with_process(child))
    }

    async fn health(&self, handle: &ServiceHandle) -> HealthStatus {
        let response = match self.client.get(handle.url(STATUS_ENDPOINT)).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!("[Environment] health probe not answered yet: {}", e);
                return HealthStatus::Starting;
            }
        };
        match response.json::<serde_json::Value>().await {
            Ok(body) => parse_status(&body),
            Err(_) => HealthStatus::Starting,
        }
    }

    async fn shutdown(&self, mut handle: ServiceHandle) -> HarnessResult<()> {
        if let Some(mut child) = handle.take_process() {
            if let Err(e) = child.kill().await {
                warn!("[Environment] service process did not stop cleanly: {}", e);
            }
        }
        info!("[Environment] service at {} stopped", handle.base_url());
        Ok(())
    }
}
