//! TOML Configuration
//!
//! Loads the harness configuration file and applies environment overrides.
//! Every field has a default, so an absent file is a valid configuration for
//! the stock ruling project.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ruling_core::{ProjectDescriptor, QualityProfileRef, RunLayout};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{BuildSettings, PluginArtifact, ServerOptions, DEFAULT_SERVICE_VERSION};
use crate::services::environment::HealthPolicy;
use crate::services::measures::COVERAGE_METRICS;
use crate::utils::error::{HarnessError, HarnessResult};

/// Overrides the service version selector.
pub const ENV_SERVICE_VERSION: &str = "RULING_SERVICE_VERSION";
/// Overrides the plugin artifact location pattern.
pub const ENV_PLUGIN_PATTERN: &str = "RULING_PLUGIN_PATTERN";

pub const DEFAULT_PLUGIN_PATTERN: &str = "../../sonar-java-plugin/target/sonar-java-plugin-*.jar";

/// Analysis service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ServiceSection {
    /// Version selector, e.g. `LATEST_RELEASE[7.9]`
    pub version: String,
    /// Plugin jar path; may contain a wildcard in the file name
    pub plugin_pattern: String,
    /// Service installation directory
    pub home: PathBuf,
    /// Launcher executable, relative to `home` unless absolute
    pub launcher: PathBuf,
    pub launcher_args: Vec<String>,
    pub base_url: String,
    /// JVM options of the web process
    pub web_java_opts: String,
    pub properties: BTreeMap<String, String>,
    pub health_timeout_secs: u64,
    pub health_interval_secs: u64,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            version: DEFAULT_SERVICE_VERSION.to_string(),
            plugin_pattern: DEFAULT_PLUGIN_PATTERN.to_string(),
            home: PathBuf::from("target/sonarqube"),
            launcher: PathBuf::from("bin/run.sh"),
            launcher_args: Vec::new(),
            base_url: "http://localhost:9000".to_string(),
            web_java_opts: "-Xmx1G".to_string(),
            properties: BTreeMap::new(),
            health_timeout_secs: 300,
            health_interval_secs: 2,
            user: None,
            password: None,
        }
    }
}

/// Fixture project identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ProjectSection {
    pub key: String,
    pub name: String,
    pub sources: Vec<PathBuf>,
    pub tests: Vec<PathBuf>,
    pub binaries: PathBuf,
    pub profile_language: String,
    pub profile_name: String,
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            key: "checkstyle-test-project".to_string(),
            name: "calc".to_string(),
            sources: vec![PathBuf::from("src/main/java")],
            tests: Vec::new(),
            binaries: PathBuf::from("."),
            profile_language: "java".to_string(),
            profile_name: "rules".to_string(),
        }
    }
}

/// Filesystem layout of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PathsSection {
    /// Directory holding one sub-directory per fixture project
    pub fixtures: PathBuf,
    /// Root of `actual/`, differences files and build logs
    pub target: PathBuf,
    /// Baseline root holding one expected tree per project
    pub expected: PathBuf,
    /// Parent for workspace copies; system temp dir when unset
    pub workspace_parent: Option<PathBuf>,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            fixtures: PathBuf::from("../sources"),
            target: PathBuf::from("target"),
            expected: PathBuf::from("src/test/resources"),
            workspace_parent: None,
        }
    }
}

/// Optional post-run measures query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct MeasuresSection {
    pub enabled: bool,
    /// Component to query; the project key when unset
    pub component: Option<String>,
    pub metrics: Vec<String>,
}

impl Default for MeasuresSection {
    fn default() -> Self {
        Self {
            enabled: false,
            component: None,
            metrics: COVERAGE_METRICS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Complete harness configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct HarnessConfig {
    pub service: ServiceSection,
    pub project: ProjectSection,
    pub build: BuildSettings,
    pub paths: PathsSection,
    pub measures: MeasuresSection,
}

impl HarnessConfig {
    /// Load from `path` (defaults when `None`), apply process environment
    /// overrides and validate.
    pub fn load(path: Option<&Path>) -> HarnessResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate().map_err(HarnessError::config)?;
        Ok(config)
    }

    /// Parse a config file without overrides or validation.
    pub fn load_from_file(path: &Path) -> HarnessResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HarnessError::config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("[Config] loaded {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> HarnessResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply the version and plugin pattern overrides. Empty values are
    /// ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(version) = lookup(ENV_SERVICE_VERSION).filter(|v| !v.trim().is_empty()) {
            debug!("[Config] {} override: {}", ENV_SERVICE_VERSION, version);
            self.service.version = version;
        }
        if let Some(pattern) = lookup(ENV_PLUGIN_PATTERN).filter(|v| !v.trim().is_empty()) {
            debug!("[Config] {} override: {}", ENV_PLUGIN_PATTERN, pattern);
            self.service.plugin_pattern = pattern;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.service.version.trim().is_empty() {
            return Err("service.version must not be empty".to_string());
        }
        if self.service.plugin_pattern.trim().is_empty() {
            return Err("service.plugin_pattern must not be empty".to_string());
        }
        if self.service.base_url.trim().is_empty() {
            return Err("service.base_url must not be empty".to_string());
        }
        if self.service.health_timeout_secs == 0 {
            return Err("service.health_timeout_secs must be greater than zero".to_string());
        }
        if self.service.health_interval_secs == 0 {
            return Err("service.health_interval_secs must be greater than zero".to_string());
        }
        if self.project.key.trim().is_empty() {
            return Err("project.key must not be empty".to_string());
        }
        if self.project.name.trim().is_empty() {
            return Err("project.name must not be empty".to_string());
        }
        if self.measures.enabled && self.measures.metrics.is_empty() {
            return Err("measures.metrics must not be empty when measures are enabled".to_string());
        }
        Ok(())
    }

    pub fn descriptor(&self) -> HarnessResult<ProjectDescriptor> {
        Ok(ProjectDescriptor::new(
            self.project.key.clone(),
            self.project.name.clone(),
            self.project.sources.clone(),
            self.project.tests.clone(),
            self.project.binaries.clone(),
        )?)
    }

    pub fn quality_profile(&self) -> QualityProfileRef {
        QualityProfileRef::new(&self.project.profile_language, &self.project.profile_name)
    }

    pub fn plugin_artifact(&self) -> PluginArtifact {
        PluginArtifact::from_pattern(&self.service.plugin_pattern)
    }

    pub fn server_options(&self) -> ServerOptions {
        ServerOptions {
            web_java_opts: self.service.web_java_opts.clone(),
            properties: self.service.properties.clone(),
        }
    }

    pub fn health_policy(&self) -> HealthPolicy {
        HealthPolicy {
            timeout: Duration::from_secs(self.service.health_timeout_secs),
            interval: Duration::from_secs(self.service.health_interval_secs),
        }
    }

    pub fn layout(&self) -> RunLayout {
        RunLayout::new(&self.paths.target, &self.paths.expected)
    }

    /// Launcher path resolved against the service home.
    pub fn launcher_path(&self) -> PathBuf {
        if self.service.launcher.is_absolute() {
            self.service.launcher.clone()
        } else {
            self.service.home.join(&self.service.launcher)
        }
    }
}
