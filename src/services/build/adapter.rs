//! Build Adapters
//!
//! The seam to the external build tool. An adapter turns a frozen
//! `BuildJob` into a process invocation and reports whether it ran to
//! completion. Two variants exist: the standalone scanner and a Maven
//! build for compiled projects.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::models::{BuildJob, BuildTarget};
use crate::utils::error::{HarnessError, HarnessResult};

/// Maximum output captured per build (bytes).
const MAX_OUTPUT_SIZE: usize = 4 * 1024 * 1024;

/// Raw result of one adapter invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterRun {
    pub success: bool,
    pub exit_code: Option<i32>,
    /// Combined stdout and stderr
    pub output: String,
    pub message: String,
}

impl AdapterRun {
    pub fn completed(output: impl Into<String>) -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            output: output.into(),
            message: "build completed".to_string(),
        }
    }

    pub fn failed(exit_code: Option<i32>, output: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code,
            output: output.into(),
            message: message.into(),
        }
    }
}

/// Runs a build job with an external tool.
#[async_trait]
pub trait BuildAdapter: Send + Sync {
    /// Adapter name for logs.
    fn name(&self) -> &str;

    /// Run the job inside `workspace`.
    async fn run(&self, job: &BuildJob, workspace: &Path) -> HarnessResult<AdapterRun>;
}

/// Standalone scanner: `sonar-scanner [args] [-X] -Dk=v ...`.
pub struct ScannerAdapter {
    program: PathBuf,
}

impl ScannerAdapter {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("sonar-scanner"),
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Full argument list for a job.
    pub fn command_args(&self, job: &BuildJob) -> Vec<String> {
        let mut args = job.arguments().to_vec();
        if job.debug_logs() {
            args.push("-X".to_string());
        }
        args.extend(job.property_args());
        args
    }
}

impl Default for ScannerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BuildAdapter for ScannerAdapter {
    fn name(&self) -> &str {
        "scanner"
    }

    async fn run(&self, job: &BuildJob, workspace: &Path) -> HarnessResult<AdapterRun> {
        let cwd = match job.target() {
            BuildTarget::Scanner { project_dir } => project_dir.as_path(),
            BuildTarget::Maven { .. } => workspace,
        };
        Ok(run_command(&self.program, &self.command_args(job), cwd, job.timeout()).await)
    }
}

/// Maven build: `mvn -f <pom> clean package sonar:sonar [-DskipTests] ...`.
pub struct MavenAdapter {
    program: PathBuf,
}

impl MavenAdapter {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("mvn"),
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Full argument list for a job. Only Maven targets are accepted.
    pub fn command_args(&self, job: &BuildJob) -> HarnessResult<Vec<String>> {
        let BuildTarget::Maven { pom, skip_tests } = job.target() else {
            return Err(HarnessError::config(format!(
                "maven adapter cannot run a {} target",
                job.target().label()
            )));
        };

        let mut args = vec![
            "-f".to_string(),
            pom.to_string_lossy().into_owned(),
            "clean".to_string(),
            "package".to_string(),
            "sonar:sonar".to_string(),
        ];
        if *skip_tests {
            args.push("-DskipTests".to_string());
        }
        if job.debug_logs() {
            args.push("-X".to_string());
        }
        args.extend(job.arguments().iter().cloned());
        args.extend(job.property_args());
        Ok(args)
    }
}

impl Default for MavenAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BuildAdapter for MavenAdapter {
    fn name(&self) -> &str {
        "maven"
    }

    async fn run(&self, job: &BuildJob, workspace: &Path) -> HarnessResult<AdapterRun> {
        let args = self.command_args(job)?;
        Ok(run_command(&self.program, &args, workspace, job.timeout()).await)
    }
}

/// Spawn `program`, wait for it (optionally bounded), capture its output.
async fn run_command(
    program: &Path,
    args: &[String],
    cwd: &Path,
    limit: Option<Duration>,
) -> AdapterRun {
    debug!("[Build] {} {:?} (in {})", program.display(), args, cwd.display());

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match limit {
        Some(limit) => match timeout(limit, cmd.output()).await {
            Ok(result) => result,
            Err(_) => {
                return AdapterRun::failed(
                    None,
                    String::new(),
                    format!("build timed out after {} seconds", limit.as_secs()),
                )
            }
        },
        None => cmd.output().await,
    };

    match output {
        Ok(output) => {
            let mut text = truncate_output(&output.stdout);
            let stderr = truncate_output(&output.stderr);
            if !stderr.is_empty() {
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }
                text.push_str(&stderr);
            }
            if output.status.success() {
                AdapterRun::completed(text)
            } else {
                let code = output.status.code();
                AdapterRun::failed(
                    code,
                    text,
                    format!("build exited with code {}", code.unwrap_or(-1)),
                )
            }
        }
        Err(e) => AdapterRun::failed(
            None,
            String::new(),
            format!("failed to execute {}: {}", program.display(), e),
        ),
    }
}

fn truncate_output(bytes: &[u8]) -> String {
    let s = String::from_utf8_lossy(bytes);
    if s.len() > MAX_OUTPUT_SIZE {
        let mut cut = MAX_OUTPUT_SIZE;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}\n... (output truncated)", &s[..cut])
    } else {
        s.into_owned()
    }
}
