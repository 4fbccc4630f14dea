//! The sum-count monoid used to average values per key.
//!
//! Merging is component-wise addition with `(0, 0)` as identity. The
//! division happens once, in [`finalize`].
//!
//! Both components use two's-complement wrapping addition, which is
//! associative and commutative for every input. Inputs are `i64` and the
//! sum is held in an `i128`, so a wrap needs more than 2^64 records of
//! extreme magnitude.

use crate::traits::{RddError, RddResult};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::Add;

/// Partial aggregate of all values seen for one key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SumCount {
    pub sum: i128,
    pub count: u64,
}

impl SumCount {
    /// The identity element, `(0, 0)`.
    pub const IDENTITY: SumCount = SumCount { sum: 0, count: 0 };

    pub fn new(sum: i128, count: u64) -> Self {
        Self { sum, count }
    }

    /// The partial aggregate of a single value, `(value, 1)`.
    pub fn of(value: i64) -> Self {
        Self {
            sum: i128::from(value),
            count: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Combine two partial aggregates for the same key.
    pub fn merge(self, other: SumCount) -> SumCount {
        merge(self, other)
    }

    /// Divide the sum by the count.
    pub fn finalize(self) -> RddResult<f64> {
        finalize(self)
    }
}

/// Combine two partial aggregates: `(a.sum + b.sum, a.count + b.count)`.
pub fn merge(a: SumCount, b: SumCount) -> SumCount {
    SumCount {
        sum: a.sum.wrapping_add(b.sum),
        count: a.count.wrapping_add(b.count),
    }
}

/// Turn a partial aggregate into its mean.
///
/// Fails with [`RddError::DivisionError`] when `count == 0`; a pipeline never
/// emits such an aggregate, so hitting this is a bug in the caller.
pub fn finalize(agg: SumCount) -> RddResult<f64> {
    if agg.count == 0 {
        return Err(RddError::DivisionError { sum: agg.sum });
    }
    Ok(agg.sum as f64 / agg.count as f64)
}

impl Add for SumCount {
    type Output = SumCount;

    fn add(self, rhs: SumCount) -> SumCount {
        merge(self, rhs)
    }
}

impl Sum for SumCount {
    fn sum<I: Iterator<Item = SumCount>>(iter: I) -> SumCount {
        iter.fold(SumCount::IDENTITY, merge)
    }
}

impl From<i64> for SumCount {
    fn from(value: i64) -> Self {
        SumCount::of(value)
    }
}
