//! Key-value transformations.

use crate::rdd::{ShuffledRdd, SimpleRdd};
use crate::shuffle::{Aggregator, Partitioner, ReduceAggregator};
use crate::traits::{Data, RddResult};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// An extension trait for datasets of key-value pairs.
pub trait PairRdd<K: Data, V: Data>
where
    Self: Sized,
{
    /// Groups values by key and applies an associative, commutative reduction function.
    /// This is a wide transformation that triggers a shuffle.
    fn reduce_by_key(
        self,
        reduce_func: fn(V, V) -> V,
        partitioner: Arc<dyn Partitioner<K>>,
    ) -> ShuffledRdd<K, V, V>;

    /// Combine values with the same key using a custom aggregator.
    fn combine_by_key<C: Data>(
        self,
        aggregator: Arc<dyn Aggregator<K, V, C>>,
        partitioner: Arc<dyn Partitioner<K>>,
    ) -> ShuffledRdd<K, V, C>;

    /// Transform every value, keeping keys and partitioning.
    fn map_values<U, F>(self, f: F) -> SimpleRdd<(K, U)>
    where
        U: Data,
        F: Fn(V) -> U + Send + Sync + 'static;

    /// Fallible `map_values`; the first error aborts the action.
    fn try_map_values<U, F>(self, f: F) -> SimpleRdd<(K, U)>
    where
        U: Data,
        F: Fn(V) -> RddResult<U> + Send + Sync + 'static;

    /// Collect the pairs into a map. Later pairs overwrite earlier ones for equal keys.
    fn collect_as_map(&self) -> RddResult<HashMap<K, V>>;
}

impl<K, V> PairRdd<K, V> for SimpleRdd<(K, V)>
where
    K: Data + Hash + Eq,
    V: Data,
{
    fn reduce_by_key(
        self,
        reduce_func: fn(V, V) -> V,
        partitioner: Arc<dyn Partitioner<K>>,
    ) -> ShuffledRdd<K, V, V> {
        let aggregator = Arc::new(ReduceAggregator::new(reduce_func));
        ShuffledRdd::new(self, aggregator, partitioner)
    }

    fn combine_by_key<C: Data>(
        self,
        aggregator: Arc<dyn Aggregator<K, V, C>>,
        partitioner: Arc<dyn Partitioner<K>>,
    ) -> ShuffledRdd<K, V, C> {
        ShuffledRdd::new(self, aggregator, partitioner)
    }

    fn map_values<U, F>(self, f: F) -> SimpleRdd<(K, U)>
    where
        U: Data,
        F: Fn(V) -> U + Send + Sync + 'static,
    {
        self.map(move |(k, v)| (k, f(v)))
    }

    fn try_map_values<U, F>(self, f: F) -> SimpleRdd<(K, U)>
    where
        U: Data,
        F: Fn(V) -> RddResult<U> + Send + Sync + 'static,
    {
        self.try_map(move |(k, v)| Ok((k, f(v)?)))
    }

    fn collect_as_map(&self) -> RddResult<HashMap<K, V>> {
        Ok(self.collect()?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monoid::{SumCount, finalize, merge};
    use crate::shuffle::{AverageAggregator, HashPartitioner};

    fn pairs() -> Vec<(String, i64)> {
        vec![
            ("a".to_string(), 10),
            ("a".to_string(), 20),
            ("b".to_string(), 5),
        ]
    }

    #[test]
    fn test_reduce_by_key_then_map_values() {
        let rdd = SimpleRdd::from_vec_with_partitions(pairs(), 2)
            .map_values(SumCount::of)
            .reduce_by_key(merge, Arc::new(HashPartitioner::new(2)));
        assert_eq!(rdd.num_partitions(), 2);

        let sums = SimpleRdd::from_vec(rdd.collect().unwrap());
        let averages = sums.try_map_values(finalize).collect_as_map().unwrap();
        assert_eq!(averages.len(), 2);
        assert_eq!(averages["a"], 15.0);
        assert_eq!(averages["b"], 5.0);
    }

    #[test]
    fn test_combine_by_key_with_average_aggregator() {
        let combined = SimpleRdd::from_vec_with_partitions(pairs(), 3)
            .combine_by_key::<SumCount>(
                Arc::new(AverageAggregator),
                Arc::new(HashPartitioner::new(3)),
            )
            .collect()
            .unwrap();
        let combined: HashMap<String, SumCount> = combined.into_iter().collect();
        assert_eq!(combined["a"], SumCount::new(30, 2));
        assert_eq!(combined["b"], SumCount::new(5, 1));
    }

    #[test]
    fn test_try_map_values_propagates_errors() {
        let rdd = SimpleRdd::from_vec(vec![
            ("x".to_string(), SumCount::of(7)),
            ("y".to_string(), SumCount::IDENTITY),
        ]);
        let err = rdd.try_map_values(finalize).collect().unwrap_err();
        assert!(matches!(err, crate::traits::RddError::DivisionError { .. }));
    }

    #[test]
    fn test_collect_as_map_last_value_wins() {
        let rdd = SimpleRdd::from_vec(vec![(1, "first".to_string()), (1, "second".to_string())]);
        let map = rdd.collect_as_map().unwrap();
        assert_eq!(map[&1], "second");
    }
}
