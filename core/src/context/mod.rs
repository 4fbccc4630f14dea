//! Context module for monoflow
//!
//! This module provides execution contexts for dataset operations.

pub mod flow_context;

pub use flow_context::*;
