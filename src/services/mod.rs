//! Services
//!
//! The components of a ruling run. Each one is driven by `driver`; none of
//! them calls another directly except through the session context.

pub mod build;
pub mod diagnostics;
pub mod driver;
pub mod environment;
pub mod measures;
pub mod workspace;

pub use build::{BuildAdapter, BuildJobExecutor, MavenAdapter, ScannerAdapter};
pub use diagnostics::{DiagnosticsCollector, DiagnosticsDump};
pub use driver::{HarnessDriver, HarnessState, RunPlan, RunReport, SessionContext};
pub use environment::{EnvironmentController, ServiceControl, ServiceHandle};
pub use measures::MeasuresClient;
pub use workspace::{ProjectRegistry, Workspace, WorkspacePreparer};
