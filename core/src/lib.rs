//! Monoflow Core - key-partitioned aggregation on a local thread pool
//!
//! This crate provides a small partitioned dataset abstraction with a
//! `reduce_by_key` shuffle, and on top of it the per-key average computed
//! through the sum-count monoid.

pub mod average;
pub mod context;
pub mod monoid;
pub mod rdd;
pub mod scheduler;
pub mod shuffle;
pub mod traits;

pub use average::{
    AveragePipeline, AverageReport, average_records, finalize_all, parse_record,
    sum_count_records,
};
pub use context::FlowContext;
pub use monoid::{SumCount, finalize, merge};
pub use rdd::{PairRdd, ShuffledRdd, SimpleRdd};
pub use scheduler::LocalScheduler;
pub use traits::{RddError, RddResult};
