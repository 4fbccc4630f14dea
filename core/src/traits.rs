//! Core traits for the monoflow execution engine
//!
//! This module defines the error type shared by datasets, the partition
//! abstraction and the bound every dataset element has to satisfy.

use monoflow_common::CommonError;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Error types for dataset operations
#[derive(Error, Debug)]
pub enum RddError {
    /// A record did not have the `key,number` shape.
    #[error("{}", format_parse_error(.line, .record, .reason))]
    ParseError {
        /// 1-based line number, when the record came from a numbered source.
        line: Option<usize>,
        record: String,
        reason: String,
    },

    /// `finalize` was asked to divide by a zero count.
    #[error("Internal invariant violated: cannot finalize an aggregate with count 0 (sum = {sum})")]
    DivisionError { sum: i128 },

    #[error("Invalid partition: {0}")]
    InvalidPartition(usize),

    #[error("Computation failed: {0}")]
    ComputationError(String),

    #[error(transparent)]
    Common(#[from] CommonError),
}

fn format_parse_error(line: &Option<usize>, record: &str, reason: &str) -> String {
    match line {
        Some(line) => format!("Parse error at line {line}: {reason} in record {record:?}"),
        None => format!("Parse error: {reason} in record {record:?}"),
    }
}

impl RddError {
    /// Create a parse error for a record of unknown position.
    pub fn parse_error(record: impl Into<String>, reason: impl Into<String>) -> Self {
        RddError::ParseError {
            line: None,
            record: record.into(),
            reason: reason.into(),
        }
    }

    /// Attach a 1-based line number to a parse error; other errors pass through.
    pub fn at_line(self, line_number: usize) -> Self {
        match self {
            RddError::ParseError { record, reason, .. } => RddError::ParseError {
                line: Some(line_number),
                record,
                reason,
            },
            other => other,
        }
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, RddError::ParseError { .. })
    }
}

/// Result type for dataset operations
pub type RddResult<T> = Result<T, RddError>;

/// Partition represents a logical partition of data in a dataset
pub trait Partition: Send + Sync + Debug {
    /// Get the partition index
    fn index(&self) -> usize;

    /// Get a unique identifier for this partition
    fn id(&self) -> String {
        format!("partition_{}", self.index())
    }
}

/// Basic partition implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicPartition {
    index: usize,
}

impl BasicPartition {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Partition for BasicPartition {
    fn index(&self) -> usize {
        self.index
    }
}

/// A data type that can be used in a dataset.
pub trait Data:
    Send + Sync + Clone + Debug + Serialize + for<'de> Deserialize<'de> + 'static
{
}
impl<T> Data for T where
    T: Send + Sync + Clone + Debug + Serialize + for<'de> Deserialize<'de> + 'static
{
}
