//! Environment Controller
//!
//! Owns the lifecycle of the single service instance of a session:
//! resolve the plugin, launch, block until healthy, and release
//! unconditionally on stop.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, error, info, warn};

use crate::models::{PluginArtifact, ServerOptions};
use crate::services::environment::control::{HealthStatus, ServiceControl};
use crate::services::environment::handle::ServiceHandle;
use crate::utils::error::{HarnessError, HarnessResult};

/// How long and how often to probe for health after launch.
#[derive(Debug, Clone, Copy)]
pub struct HealthPolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for HealthPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            interval: Duration::from_secs(2),
        }
    }
}

/// Starts and stops the analysis service for one session.
pub struct EnvironmentController {
    control: Arc<dyn ServiceControl>,
    policy: HealthPolicy,
    active: bool,
}

impl EnvironmentController {
    pub fn new(control: Arc<dyn ServiceControl>) -> Self {
        Self {
            control,
            policy: HealthPolicy::default(),
            active: false,
        }
    }

    pub fn with_health_policy(mut self, policy: HealthPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether a handle from this controller is currently live.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Launch the service with the plugin installed and wait until it is
    /// healthy. A second `start` before `stop` is a usage error.
    pub async fn start(
        &mut self,
        plugin: &PluginArtifact,
        version: &str,
        options: &ServerOptions,
    ) -> HarnessResult<ServiceHandle> {
        if self.active {
            return Err(HarnessError::usage(
                "a service handle is already active; stop it before starting another",
            ));
        }

        let plugin_path = plugin.resolve().map_err(as_startup)?;
        info!(
            "[Environment] starting service {} with plugin {}",
            version,
            plugin_path.display()
        );

        let handle = self
            .control
            .launch(&plugin_path, version, options)
            .await
            .map_err(as_startup)?;

        if let Err(e) = self.wait_healthy(&handle).await {
            error!("[Environment] {}", e);
            if let Err(stop_err) = self.control.shutdown(handle).await {
                warn!(
                    "[Environment] release after failed startup also failed: {}",
                    stop_err
                );
            }
            return Err(e);
        }

        self.active = true;
        info!(
            "[Environment] service {} healthy at {} (home {})",
            handle.version(),
            handle.base_url(),
            handle.home().display()
        );
        Ok(handle)
    }

    /// Stop the service. Never fails: release problems are logged.
    pub async fn stop(&mut self, handle: ServiceHandle) {
        self.active = false;
        if let Err(e) = self.control.shutdown(handle).await {
            warn!("[Environment] error while stopping service: {}", e);
        }
    }

    async fn wait_healthy(&self, handle: &ServiceHandle) -> HarnessResult<()> {
        let deadline = Instant::now() + self.policy.timeout;
        loop {
            // A check that never answers must not outlive the deadline.
            let remaining = deadline.saturating_duration_since(Instant::now());
            match timeout(remaining, self.control.health(handle)).await {
                Ok(HealthStatus::Up) => return Ok(()),
                Ok(HealthStatus::Down(reason)) => {
                    return Err(HarnessError::environment_startup(format!(
                        "service reported DOWN: {}",
                        reason
                    )))
                }
                Ok(HealthStatus::Starting) => {}
                Err(_) => debug!("[Environment] health check cut off at deadline"),
            }
            if Instant::now() >= deadline {
                return Err(HarnessError::environment_startup(format!(
                    "service at {} not healthy after {}ms",
                    handle.base_url(),
                    self.policy.timeout.as_millis()
                )));
            }
            sleep(self.policy.interval).await;
        }
    }
}

fn as_startup(err: HarnessError) -> HarnessError {
    match err {
        HarnessError::EnvironmentStartup(_) => err,
        other => HarnessError::environment_startup(other.to_string()),
    }
}
