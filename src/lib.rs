//! Ruling Harness
//!
//! Golden-file regression harness for an analyzer plugin. A run starts the
//! analysis service with the plugin installed, provisions a fixture project,
//! runs the build with a deterministic property set, and compares the
//! dumped artifacts byte for byte against the recorded baseline.
//!
//! - Service, workspace, build and diagnostics components (`services`)
//! - Data models for build jobs and service options (`models`)
//! - Configuration loading (`storage`)
//! - Errors and filesystem helpers (`utils`)

pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use models::{BuildJob, BuildOutcome, BuildSettings, PluginArtifact, ServerOptions};
pub use services::{HarnessDriver, HarnessState, RunPlan, RunReport};
pub use storage::HarnessConfig;
pub use utils::error::{HarnessError, HarnessResult};
