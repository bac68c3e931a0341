//! Analysis modules.
//!
//! Callsign classification and the per-area aggregation built on top of it.

pub mod aggregator;
pub mod classifier;

pub use aggregator::*;
pub use classifier::*;
