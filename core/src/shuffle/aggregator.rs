//! Defines the Aggregator trait for combining values in shuffle operations.

use crate::monoid::{SumCount, merge};
use std::fmt::Debug;

/// Aggregator trait for combining values for a key.
/// Used in operations like `reduce_by_key` and `combine_by_key`.
///
/// K: Key type
/// V: Input value type
/// C: Combiner (intermediate/output) type
///
/// `merge_combiners` has to be associative and commutative: the shuffle
/// merges map-side combiners in whatever order the tasks finish.
pub trait Aggregator<K, V, C>: Send + Sync + Debug {
    /// Create a combiner from the first value for a key.
    fn create_combiner(&self, v: V) -> C;

    /// Merge a new value into an existing combiner.
    fn merge_value(&self, c: C, v: V) -> C;

    /// Merge two combiners.
    fn merge_combiners(&self, c1: C, c2: C) -> C;
}

/// A simple aggregator for reduce_by_key operations where the combiner type is the same as the value type
#[derive(Clone, Debug)]
pub struct ReduceAggregator<V> {
    reduce_func: fn(V, V) -> V,
}

impl<V> ReduceAggregator<V> {
    pub fn new(reduce_func: fn(V, V) -> V) -> Self {
        Self { reduce_func }
    }
}

impl<K, V> Aggregator<K, V, V> for ReduceAggregator<V>
where
    K: Send + Sync + Clone + Debug + 'static,
    V: Send + Sync + Clone + Debug + 'static,
{
    fn create_combiner(&self, v: V) -> V {
        v
    }

    fn merge_value(&self, c: V, v: V) -> V {
        (self.reduce_func)(c, v)
    }

    fn merge_combiners(&self, c1: V, c2: V) -> V {
        (self.reduce_func)(c1, c2)
    }
}

/// Reduces per-record `(value, 1)` aggregates with the sum-count merge.
#[derive(Clone, Copy, Debug, Default)]
pub struct SumCountAggregator;

impl<K> Aggregator<K, SumCount, SumCount> for SumCountAggregator
where
    K: Send + Sync + Clone + Debug + 'static,
{
    fn create_combiner(&self, v: SumCount) -> SumCount {
        v
    }

    fn merge_value(&self, c: SumCount, v: SumCount) -> SumCount {
        merge(c, v)
    }

    fn merge_combiners(&self, c1: SumCount, c2: SumCount) -> SumCount {
        merge(c1, c2)
    }
}

/// Builds sum-count combiners straight from raw integer values.
#[derive(Clone, Copy, Debug, Default)]
pub struct AverageAggregator;

impl<K> Aggregator<K, i64, SumCount> for AverageAggregator
where
    K: Send + Sync + Clone + Debug + 'static,
{
    fn create_combiner(&self, v: i64) -> SumCount {
        SumCount::of(v)
    }

    fn merge_value(&self, c: SumCount, v: i64) -> SumCount {
        merge(c, SumCount::of(v))
    }

    fn merge_combiners(&self, c1: SumCount, c2: SumCount) -> SumCount {
        merge(c1, c2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_aggregator() {
        let aggregator = ReduceAggregator::new(|a: i32, b: i32| a + b);

        let combiner = <ReduceAggregator<i32> as Aggregator<String, i32, i32>>::create_combiner(
            &aggregator,
            5,
        );
        assert_eq!(combiner, 5);

        let merged = <ReduceAggregator<i32> as Aggregator<String, i32, i32>>::merge_value(
            &aggregator,
            combiner,
            3,
        );
        assert_eq!(merged, 8);

        let combined = <ReduceAggregator<i32> as Aggregator<String, i32, i32>>::merge_combiners(
            &aggregator,
            merged,
            2,
        );
        assert_eq!(combined, 10);
    }

    #[test]
    fn test_sum_count_aggregator() {
        let aggregator = SumCountAggregator;

        let combiner = <SumCountAggregator as Aggregator<String, SumCount, SumCount>>::create_combiner(
            &aggregator,
            SumCount::of(10),
        );
        assert_eq!(combiner, SumCount::new(10, 1));

        let merged = <SumCountAggregator as Aggregator<String, SumCount, SumCount>>::merge_value(
            &aggregator,
            combiner,
            SumCount::of(20),
        );
        assert_eq!(merged, SumCount::new(30, 2));

        let combined =
            <SumCountAggregator as Aggregator<String, SumCount, SumCount>>::merge_combiners(
                &aggregator,
                merged,
                SumCount::new(15, 3),
            );
        assert_eq!(combined, SumCount::new(45, 5));
    }

    #[test]
    fn test_average_aggregator() {
        let aggregator = AverageAggregator;

        let combiner =
            <AverageAggregator as Aggregator<String, i64, SumCount>>::create_combiner(&aggregator, -10);
        assert_eq!(combiner, SumCount::new(-10, 1));

        let merged = <AverageAggregator as Aggregator<String, i64, SumCount>>::merge_value(
            &aggregator,
            combiner,
            30,
        );
        assert_eq!(merged, SumCount::new(20, 2));
        assert_eq!(merged.finalize().unwrap(), 10.0);
    }
}
