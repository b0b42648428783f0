//! Integration Tests Module
//!
//! End-to-end ruling runs against fake collaborators, plus the comparator,
//! diagnostics and build executor exercised through the public API.

// Fake service, registry and build adapter
mod support;

// Baseline comparison tests
mod comparator_test;

// Log tail dumping tests
mod diagnostics_test;

// Property injection tests
mod build_test;

// Full state machine runs
mod driver_test;
