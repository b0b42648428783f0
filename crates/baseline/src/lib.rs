//! Ruling Baseline
//!
//! Golden snapshot access and the byte-level tree comparison that decides
//! whether a ruling run passed:
//!
//! - `snapshot` - Reads a directory tree into a path → bytes map
//! - `store` - Read-only access to expected snapshots per project
//! - `report` - Difference report types and their text serialization
//! - `comparator` - Walks expected and actual trees and builds the report

pub mod comparator;
pub mod report;
pub mod snapshot;
pub mod store;

pub use comparator::BaselineComparator;
pub use report::{DifferenceEntry, DifferenceKind, DifferenceReport};
pub use snapshot::Snapshot;
pub use store::BaselineStore;
