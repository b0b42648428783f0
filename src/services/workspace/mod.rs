//! Workspace Service
//!
//! Isolated fixture copies and project registration on the service.

mod preparer;
mod registry;

pub use preparer::*;
pub use registry::*;
