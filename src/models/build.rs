//! Build Job Models
//!
//! A `BuildJob` is assembled through `BuildJobBuilder` and frozen by
//! `build()`. The job itself exposes no mutators, so the property set is
//! fully determined before execution starts. Properties are kept in a sorted
//! map; insertion order never reaches the build tool.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use ruling_core::LogStreamRef;
use serde::{Deserialize, Serialize};

/// Which build adapter runs the job, and against what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BuildTarget {
    /// Standalone scanner run in a project directory
    Scanner { project_dir: PathBuf },
    /// Maven build of a compiled project described by a manifest
    Maven { pom: PathBuf, skip_tests: bool },
}

impl BuildTarget {
    pub fn label(&self) -> &'static str {
        match self {
            BuildTarget::Scanner { .. } => "scanner",
            BuildTarget::Maven { .. } => "maven",
        }
    }
}

/// A fully determined build/analysis job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildJob {
    target: BuildTarget,
    properties: BTreeMap<String, String>,
    arguments: Vec<String>,
    debug_logs: bool,
    #[serde(skip)]
    timeout: Option<Duration>,
}

impl BuildJob {
    /// Start building a job for the given target.
    pub fn builder(target: BuildTarget) -> BuildJobBuilder {
        BuildJobBuilder::new(target)
    }

    pub fn target(&self) -> &BuildTarget {
        &self.target
    }

    /// Properties in key order.
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn debug_logs(&self) -> bool {
        self.debug_logs
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Properties rendered as `-Dkey=value` arguments, in key order.
    pub fn property_args(&self) -> Vec<String> {
        self.properties
            .iter()
            .map(|(k, v)| format!("-D{}={}", k, v))
            .collect()
    }
}

/// Mutable staging area for a `BuildJob`.
#[derive(Debug, Clone)]
pub struct BuildJobBuilder {
    target: BuildTarget,
    properties: BTreeMap<String, String>,
    arguments: Vec<String>,
    debug_logs: bool,
    timeout: Option<Duration>,
}

impl BuildJobBuilder {
    pub fn new(target: BuildTarget) -> Self {
        Self {
            target,
            properties: BTreeMap::new(),
            arguments: Vec::new(),
            debug_logs: false,
            timeout: None,
        }
    }

    /// Set a property. A later value for the same key replaces the earlier one.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Set several properties.
    pub fn properties<I, K, V>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in props {
            self.properties.insert(k.into(), v.into());
        }
        self
    }

    /// Append a positional argument.
    pub fn argument(mut self, arg: impl Into<String>) -> Self {
        self.arguments.push(arg.into());
        self
    }

    pub fn debug_logs(mut self, enabled: bool) -> Self {
        self.debug_logs = enabled;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Freeze the job.
    pub fn build(self) -> BuildJob {
        BuildJob {
            target: self.target,
            properties: self.properties,
            arguments: self.arguments,
            debug_logs: self.debug_logs,
            timeout: self.timeout,
        }
    }
}

/// Whether a build ran to completion, plus where to look if it did not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutcome {
    /// The adapter reported success
    pub success: bool,
    /// Exit code of the build tool (if it exited)
    pub exit_code: Option<i32>,
    /// Human-readable status line
    pub message: String,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Timestamp when the build started
    pub started_at: i64,
    /// Timestamp when the build finished
    pub finished_at: i64,
    /// Service log streams to dump on failure
    pub log_refs: Vec<LogStreamRef>,
    /// Captured build tool output
    pub build_log: Option<PathBuf>,
}

impl BuildOutcome {
    /// Short status used in logs.
    pub fn status_label(&self) -> &'static str {
        if self.success {
            "completed"
        } else {
            "failed"
        }
    }
}

/// Which build adapter a run uses, as configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BuildKind {
    /// Scanner over the copied workspace
    #[default]
    Scanner,
    /// Maven build of the copied workspace
    Maven {
        /// Manifest path relative to the workspace
        #[serde(default = "default_pom")]
        pom: PathBuf,
        #[serde(default = "default_skip_tests")]
        skip_tests: bool,
    },
}

fn default_pom() -> PathBuf {
    PathBuf::from("pom.xml")
}

fn default_skip_tests() -> bool {
    true
}

impl BuildKind {
    /// Concrete target inside a prepared workspace.
    pub fn target_for(&self, workspace: &std::path::Path) -> BuildTarget {
        match self {
            BuildKind::Scanner => BuildTarget::Scanner {
                project_dir: workspace.to_path_buf(),
            },
            BuildKind::Maven { pom, skip_tests } => BuildTarget::Maven {
                pom: workspace.join(pom),
                skip_tests: *skip_tests,
            },
        }
    }
}

/// Per-run build settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BuildSettings {
    /// Adapter selection, e.g. `[build.adapter] kind = "maven"`
    #[serde(default)]
    pub adapter: BuildKind,
    /// Ask the build tool for debug output
    #[serde(default = "default_debug_logs")]
    pub debug_logs: bool,
    /// Kill the build after this many seconds (0 = no limit)
    #[serde(default)]
    pub timeout_secs: u64,
    /// Extra positional arguments
    #[serde(default)]
    pub arguments: Vec<String>,
    /// Extra properties; ruling properties win on conflict
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Override for the build tool executable
    #[serde(default)]
    pub program: Option<PathBuf>,
}

fn default_debug_logs() -> bool {
    true
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            adapter: BuildKind::default(),
            debug_logs: true,
            timeout_secs: 0,
            arguments: Vec::new(),
            properties: BTreeMap::new(),
            program: None,
        }
    }
}

impl BuildSettings {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}
