//! Environment Service
//!
//! Lifecycle control of the analysis service instance under test.

mod control;
mod controller;
mod handle;

pub use control::*;
pub use controller::*;
pub use handle::*;
