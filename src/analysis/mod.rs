//! Analysis modules.
//!
//! Name resolution, weighted grading and per-assignment statistics.

pub mod aggregator;
pub mod query;

pub use aggregator::*;
