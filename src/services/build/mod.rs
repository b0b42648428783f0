//! Build Service
//!
//! Deterministic build-property injection and build job execution.

mod adapter;
mod executor;
pub mod properties;

pub use adapter::*;
pub use executor::*;
pub use properties::ruling_properties;
