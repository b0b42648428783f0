//! Storage Layer
//!
//! Configuration file loading. Baseline snapshots live in `ruling-baseline`.

pub mod config;

pub use config::*;
