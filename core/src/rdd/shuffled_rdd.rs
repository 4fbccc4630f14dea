//! Dataset that represents a shuffle dependency.

use crate::rdd::SimpleRdd;
use crate::scheduler::{ComputeFn, LocalScheduler, Task};
use crate::shuffle::{Aggregator, Partitioner};
use crate::traits::{BasicPartition, Data, Partition, RddResult};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

static NEXT_SHUFFLE_ID: AtomicUsize = AtomicUsize::new(1);

/// Map output of one parent partition: one bucket of combiners per reduce partition.
type MapOutput<K, C> = Vec<Vec<(K, C)>>;

/// ShuffledRdd is a dataset that has a shuffle dependency on its parent.
/// It is the result of operations like `reduce_by_key` and `combine_by_key`.
///
/// Execution has two stages. The map stage runs one task per parent
/// partition, folding its records into a partition-local map of
/// combiners and bucketing them by the partitioner. The reduce stage runs
/// one task per reduce partition and merges the buckets addressed to it.
/// Each input record therefore lands in exactly one combiner.
///
/// K: Key type
/// V: Value type of the parent dataset
/// C: Combiner type (output value type)
#[derive(Clone, Debug)]
pub struct ShuffledRdd<K: Data, V: Data, C: Data> {
    id: usize,
    pub parent: SimpleRdd<(K, V)>,
    pub aggregator: Arc<dyn Aggregator<K, V, C>>,
    pub partitioner: Arc<dyn Partitioner<K>>,
}

impl<K, V, C> ShuffledRdd<K, V, C>
where
    K: Data + Hash + Eq,
    V: Data,
    C: Data,
{
    pub fn new(
        parent: SimpleRdd<(K, V)>,
        aggregator: Arc<dyn Aggregator<K, V, C>>,
        partitioner: Arc<dyn Partitioner<K>>,
    ) -> Self {
        Self {
            id: NEXT_SHUFFLE_ID.fetch_add(1, Ordering::Relaxed),
            parent,
            aggregator,
            partitioner,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn num_partitions(&self) -> usize {
        self.partitioner.num_partitions() as usize
    }

    /// Combine one parent partition locally and split the result by reduce partition.
    pub fn map_side_combine(&self, partition: &dyn Partition) -> RddResult<MapOutput<K, C>> {
        let mut combiners: HashMap<K, C> = HashMap::new();
        for (key, value) in self.parent.compute(partition)? {
            let combined = match combiners.remove(&key) {
                Some(c) => self.aggregator.merge_value(c, value),
                None => self.aggregator.create_combiner(value),
            };
            combiners.insert(key, combined);
        }

        let mut buckets: MapOutput<K, C> = (0..self.num_partitions()).map(|_| Vec::new()).collect();
        for (key, combiner) in combiners {
            let reduce_id = self.partitioner.get_partition(&key) as usize;
            buckets[reduce_id].push((key, combiner));
        }
        debug!(
            shuffle_id = self.id,
            map_id = partition.index(),
            "map-side combine finished"
        );
        Ok(buckets)
    }

    /// Merge every bucket addressed to one reduce partition.
    fn merge_buckets<'a, I>(aggregator: &dyn Aggregator<K, V, C>, buckets: I) -> Vec<(K, C)>
    where
        I: IntoIterator<Item = &'a Vec<(K, C)>>,
        K: 'a,
        C: 'a,
    {
        let mut combiners: HashMap<K, C> = HashMap::new();
        for (key, combiner) in buckets.into_iter().flatten().cloned() {
            let merged = match combiners.remove(&key) {
                Some(existing) => aggregator.merge_combiners(existing, combiner),
                None => combiner,
            };
            combiners.insert(key, merged);
        }
        combiners.into_iter().collect()
    }

    /// Run both stages on the scheduler and return the reduced partitions.
    pub fn run(&self, scheduler: &LocalScheduler) -> RddResult<SimpleRdd<(K, C)>> {
        let map_tasks: Vec<Task<MapOutput<K, C>>> = self
            .parent
            .partitions()
            .into_iter()
            .map(|partition| {
                let shuffle = self.clone();
                let compute_fn: ComputeFn<MapOutput<K, C>> =
                    Arc::new(move |p: &dyn Partition| Ok(vec![shuffle.map_side_combine(p)?]));
                Task::new(partition, compute_fn)
            })
            .collect();
        let map_outputs: Arc<Vec<MapOutput<K, C>>> =
            Arc::new(scheduler.execute_and_collect(map_tasks)?);
        debug!(
            shuffle_id = self.id,
            map_tasks = map_outputs.len(),
            "map stage finished"
        );

        let reduce_tasks: Vec<Task<(K, C)>> = (0..self.num_partitions())
            .map(|reduce_id| {
                let outputs = Arc::clone(&map_outputs);
                let aggregator = Arc::clone(&self.aggregator);
                let compute_fn: ComputeFn<(K, C)> = Arc::new(move |p: &dyn Partition| {
                    let buckets = outputs.iter().map(|output| &output[p.index()]);
                    Ok(Self::merge_buckets(aggregator.as_ref(), buckets))
                });
                Task::new(Box::new(BasicPartition::new(reduce_id)), compute_fn)
            })
            .collect();
        let reduced = scheduler.execute_tasks(reduce_tasks)?;
        debug!(
            shuffle_id = self.id,
            reduce_tasks = reduced.len(),
            "reduce stage finished"
        );

        Ok(SimpleRdd::from_partitions(reduced))
    }

    /// Run both stages sequentially on the calling thread.
    pub fn collect(&self) -> RddResult<Vec<(K, C)>> {
        let mut map_outputs = Vec::with_capacity(self.parent.num_partitions());
        for partition in self.parent.partitions() {
            map_outputs.push(self.map_side_combine(partition.as_ref())?);
        }

        let mut result = Vec::new();
        for reduce_id in 0..self.num_partitions() {
            let buckets = map_outputs.iter().map(|output| &output[reduce_id]);
            result.extend(Self::merge_buckets(self.aggregator.as_ref(), buckets));
        }
        Ok(result)
    }
}
