//! Utilities
//!
//! Common utilities used throughout the harness.

pub mod error;
pub mod http;
pub mod paths;

pub use error::*;
pub use paths::*;
