//! Service Handle
//!
//! The one reference to a running service instance. It is deliberately not
//! `Clone`: other components borrow it for the length of a session and
//! `EnvironmentController::stop` consumes it.

use std::path::{Path, PathBuf};

use ruling_core::LogStreamRef;
use tokio::process::Child;

/// A running analysis service.
#[derive(Debug)]
pub struct ServiceHandle {
    base_url: String,
    home: PathBuf,
    version: String,
    log_streams: Vec<LogStreamRef>,
    process: Option<Child>,
}

impl ServiceHandle {
    /// Create a handle for a service installed at `home`, exposing the
    /// standard four log streams under `home/logs`.
    pub fn new(
        base_url: impl Into<String>,
        home: impl Into<PathBuf>,
        version: impl Into<String>,
    ) -> Self {
        let home = home.into();
        let log_streams = LogStreamRef::standard_set(&home);
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            home,
            version: version.into(),
            log_streams,
            process: None,
        }
    }

    /// Attach the service process so it is reaped on shutdown.
    pub fn with_process(mut self, child: Child) -> Self {
        self.process = Some(child);
        self
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an API path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Log files of the service subsystems.
    pub fn log_paths(&self) -> &[LogStreamRef] {
        &self.log_streams
    }

    pub(crate) fn take_process(&mut self) -> Option<Child> {
        self.process.take()
    }
}
