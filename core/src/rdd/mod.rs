//! Dataset implementations
//!
//! This module contains the partitioned dataset, the shuffle that backs
//! key-based aggregation, and the key-value extension trait.

pub mod base;
pub mod shuffled_rdd;
pub mod transformations;

pub use base::*;
pub use shuffled_rdd::*;
pub use transformations::*;
