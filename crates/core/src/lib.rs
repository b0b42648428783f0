//! Ruling Core
//!
//! Foundational types shared by every crate in the ruling harness workspace.
//! This crate has no dependencies on the service, the build tool, or the
//! filesystem walkers.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `project` - Immutable project identity (`ProjectDescriptor`, `QualityProfileRef`)
//! - `logs` - Service log stream references (`LogCategory`, `LogStreamRef`)
//! - `layout` - Deterministic output paths for one run (`RunLayout`)

pub mod error;
pub mod layout;
pub mod logs;
pub mod project;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Project Identity ───────────────────────────────────────────────────
pub use project::{ProjectDescriptor, QualityProfileRef};

// ── Log Streams ────────────────────────────────────────────────────────
pub use logs::{LogCategory, LogStreamRef};

// ── Output Layout ──────────────────────────────────────────────────────
pub use layout::RunLayout;
