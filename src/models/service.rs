//! Service Models
//!
//! Inputs to the environment controller: where the plugin jar comes from and
//! how the service should be configured.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::utils::error::{HarnessError, HarnessResult};
use crate::utils::paths::resolve_wildcard;

/// Default service version selector.
pub const DEFAULT_SERVICE_VERSION: &str = "LATEST_RELEASE[7.9]";

/// Server property carrying the web process JVM options.
pub const WEB_JAVA_OPTS_PROPERTY: &str = "sonar.web.javaOpts";

/// Location of the plugin artifact under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PluginArtifact {
    /// An exact file path
    Path { path: PathBuf },
    /// A versioned file name matched by wildcard inside a directory
    Wildcard { dir: PathBuf, pattern: String },
}

impl PluginArtifact {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        PluginArtifact::Path { path: path.into() }
    }

    pub fn wildcard(dir: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        PluginArtifact::Wildcard {
            dir: dir.into(),
            pattern: pattern.into(),
        }
    }

    /// Parse a single pattern string such as
    /// `../../sonar-java-plugin/target/sonar-java-plugin-*.jar`.
    /// Patterns without a wildcard are exact paths.
    pub fn from_pattern(pattern: &str) -> Self {
        let path = PathBuf::from(pattern);
        let has_wildcard = pattern.contains('*') || pattern.contains('?');
        match (has_wildcard, path.parent(), path.file_name()) {
            (true, Some(dir), Some(name)) => {
                Self::wildcard(dir.to_path_buf(), name.to_string_lossy().into_owned())
            }
            _ => Self::path(path),
        }
    }

    /// Resolve to a concrete file on disk.
    pub fn resolve(&self) -> HarnessResult<PathBuf> {
        match self {
            PluginArtifact::Path { path } => {
                if path.is_file() {
                    Ok(path.clone())
                } else {
                    Err(HarnessError::config(format!(
                        "plugin artifact {} does not exist",
                        path.display()
                    )))
                }
            }
            PluginArtifact::Wildcard { dir, pattern } => resolve_wildcard(dir, pattern),
        }
    }
}

/// Server-side options for one service instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerOptions {
    /// JVM options for the web process (memory sizing)
    pub web_java_opts: String,
    /// Additional server properties
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            web_java_opts: "-Xmx1G".to_string(),
            properties: BTreeMap::new(),
        }
    }
}

impl ServerOptions {
    /// All server properties, including the web JVM options.
    pub fn effective_properties(&self) -> BTreeMap<String, String> {
        let mut props = self.properties.clone();
        props.insert(
            WEB_JAVA_OPTS_PROPERTY.to_string(),
            self.web_java_opts.clone(),
        );
        props
    }
}
