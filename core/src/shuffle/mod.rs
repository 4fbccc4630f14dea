//! Core components for shuffle operations.

pub mod aggregator;
pub mod partitioner;

pub use aggregator::*;
pub use partitioner::*;
