//! Project Registry
//!
//! Registers a project's identity with the running service. Registration is
//! idempotent: a key the service already knows is accepted as-is.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::services::environment::ServiceHandle;
use crate::utils::error::{HarnessError, HarnessResult};
use crate::utils::http::{http_client, REQUEST_TIMEOUT};

/// Registration surface of the analysis service.
#[async_trait]
pub trait ProjectRegistry: Send + Sync {
    /// Create the project if it does not exist yet.
    async fn provision(&self, handle: &ServiceHandle, key: &str, name: &str) -> HarnessResult<()>;

    /// Attach a quality profile to the project.
    async fn associate_quality_profile(
        &self,
        handle: &ServiceHandle,
        key: &str,
        language: &str,
        profile: &str,
    ) -> HarnessResult<()>;
}

/// Whether an error body says the project is already registered.
pub fn is_already_registered(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    lower.contains("already exists") || lower.contains("key already exists")
}

/// Registry backed by the service's web API.
pub struct HttpProjectRegistry {
    client: reqwest::Client,
    credentials: Option<(String, String)>,
}

impl HttpProjectRegistry {
    pub fn new() -> Self {
        Self {
            client: http_client(REQUEST_TIMEOUT),
            credentials: None,
        }
    }

    /// Authenticate API calls with basic auth.
    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((user.into(), password.into()));
        self
    }

    async fn post(&self, url: String, query: &[(&str, &str)]) -> HarnessResult<(StatusCode, String)> {
        let mut request = self.client.post(&url).query(query);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, Some(password));
        }
        let response = request
            .send()
            .await
            .map_err(|e| HarnessError::provisioning(format!("{} unreachable: {}", url, e)))?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok((status, body))
    }
}

impl Default for HttpProjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectRegistry for HttpProjectRegistry {
    async fn provision(&self, handle: &ServiceHandle, key: &str, name: &str) -> HarnessResult<()> {
        let (status, body) = self
            .post(
                handle.url("api/projects/create"),
                &[("project", key), ("name", name)],
            )
            .await?;

        if status.is_success() {
            info!("[Workspace] provisioned project {}", key);
            return Ok(());
        }
        if status == StatusCode::BAD_REQUEST && is_already_registered(&body) {
            debug!("[Workspace] project {} already provisioned", key);
            return Ok(());
        }
        Err(HarnessError::provisioning(format!(
            "provisioning of '{}' rejected: HTTP {} {}",
            key, status, body
        )))
    }

    async fn associate_quality_profile(
        &self,
        handle: &ServiceHandle,
        key: &str,
        language: &str,
        profile: &str,
    ) -> HarnessResult<()> {
        let (status, body) = self
            .post(
                handle.url("api/qualityprofiles/add_project"),
                &[
                    ("project", key),
                    ("language", language),
                    ("qualityProfile", profile),
                ],
            )
            .await?;

        if status.is_success() {
            info!(
                "[Workspace] associated {} with profile {} ({})",
                key, profile, language
            );
            return Ok(());
        }
        Err(HarnessError::provisioning(format!(
            "profile association of '{}' with '{}' rejected: HTTP {} {}",
            key, profile, status, body
        )))
    }
}
