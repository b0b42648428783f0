//! Data Models
//!
//! Contains the data structures passed between harness components.

pub mod build;
pub mod service;

pub use build::*;
pub use service::*;
