//! Base dataset implementation
//!
//! `SimpleRdd` is a partitioned, immutable collection. Sources hold their
//! data behind an `Arc`; transformations are lazy and record a compute
//! function over the parent, which is evaluated per partition when an
//! action runs.

use crate::scheduler::{ComputeFn, Task};
use crate::traits::{BasicPartition, Data, Partition, RddError, RddResult};
use std::fmt::Debug;
use std::sync::Arc;

/// SimpleRdd represents the supported kinds of datasets as an enum
pub enum SimpleRdd<T: Data> {
    /// Dataset backed by a vector, split into contiguous slices
    Vec {
        data: Arc<Vec<T>>,
        num_partitions: usize,
    },
    /// Dataset whose partitions are already materialized, e.g. shuffle output
    Partitioned { partitions: Arc<Vec<Vec<T>>> },
    /// Dataset computed lazily from a parent
    Derived {
        num_partitions: usize,
        compute: ComputeFn<T>,
    },
}

impl<T: Data> Debug for SimpleRdd<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimpleRdd::Vec {
                data,
                num_partitions,
            } => f
                .debug_struct("SimpleRdd::Vec")
                .field("data_len", &data.len())
                .field("num_partitions", num_partitions)
                .finish(),
            SimpleRdd::Partitioned { partitions } => f
                .debug_struct("SimpleRdd::Partitioned")
                .field("num_partitions", &partitions.len())
                .finish(),
            SimpleRdd::Derived { num_partitions, .. } => f
                .debug_struct("SimpleRdd::Derived")
                .field("num_partitions", num_partitions)
                .field("compute", &"<compute_function>")
                .finish(),
        }
    }
}

impl<T: Data> Clone for SimpleRdd<T> {
    fn clone(&self) -> Self {
        match self {
            SimpleRdd::Vec {
                data,
                num_partitions,
            } => SimpleRdd::Vec {
                data: Arc::clone(data),
                num_partitions: *num_partitions,
            },
            SimpleRdd::Partitioned { partitions } => SimpleRdd::Partitioned {
                partitions: Arc::clone(partitions),
            },
            SimpleRdd::Derived {
                num_partitions,
                compute,
            } => SimpleRdd::Derived {
                num_partitions: *num_partitions,
                compute: Arc::clone(compute),
            },
        }
    }
}

impl<T: Data> SimpleRdd<T> {
    /// Create a new dataset from a vector of data
    pub fn from_vec(data: Vec<T>) -> Self {
        Self::from_vec_with_partitions(data, 1)
    }

    /// Create a new dataset from a vector with specified number of partitions.
    /// A partition count of 0 is treated as 1.
    pub fn from_vec_with_partitions(data: Vec<T>, num_partitions: usize) -> Self {
        Self::Vec {
            data: Arc::new(data),
            num_partitions: num_partitions.max(1),
        }
    }

    /// Create a dataset from data that is already split into partitions
    pub fn from_partitions(partitions: Vec<Vec<T>>) -> Self {
        if partitions.is_empty() {
            return Self::from_vec(Vec::new());
        }
        Self::Partitioned {
            partitions: Arc::new(partitions),
        }
    }

    /// Build a lazily computed child from a per-partition function over `self`
    pub fn map_partitions<U, F>(self, f: F) -> SimpleRdd<U>
    where
        U: Data,
        F: Fn(Vec<T>) -> RddResult<Vec<U>> + Send + Sync + 'static,
    {
        let num_partitions = self.num_partitions();
        let parent = self;
        SimpleRdd::Derived {
            num_partitions,
            compute: Arc::new(move |partition: &dyn Partition| f(parent.compute(partition)?)),
        }
    }

    /// Apply a map transformation to this dataset
    pub fn map<U, F>(self, f: F) -> SimpleRdd<U>
    where
        U: Data,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.map_partitions(move |items| Ok(items.into_iter().map(&f).collect()))
    }

    /// Apply a fallible map; the first error aborts the partition and the action
    pub fn try_map<U, F>(self, f: F) -> SimpleRdd<U>
    where
        U: Data,
        F: Fn(T) -> RddResult<U> + Send + Sync + 'static,
    {
        self.map_partitions(move |items| items.into_iter().map(&f).collect())
    }

    /// Apply a filter transformation to this dataset
    pub fn filter<F>(self, predicate: F) -> SimpleRdd<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.map_partitions(move |items| Ok(items.into_iter().filter(|x| predicate(x)).collect()))
    }

    /// Pair every element with its 0-based position in the whole dataset
    pub fn zip_with_index(self) -> SimpleRdd<(usize, T)> {
        let num_partitions = self.num_partitions();
        let parent = self;
        SimpleRdd::Derived {
            num_partitions,
            compute: Arc::new(move |partition: &dyn Partition| {
                let offset = parent.partition_offset(partition.index())?;
                Ok(parent
                    .compute(partition)?
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| (offset + i, item))
                    .collect())
            }),
        }
    }

    /// Number of elements stored before partition `index`
    fn partition_offset(&self, index: usize) -> RddResult<usize> {
        match self {
            SimpleRdd::Vec {
                data,
                num_partitions,
            } => {
                let partition_size = data.len().div_ceil(*num_partitions);
                Ok((index * partition_size).min(data.len()))
            }
            SimpleRdd::Partitioned { partitions } => {
                Ok(partitions.iter().take(index).map(Vec::len).sum())
            }
            SimpleRdd::Derived { .. } => {
                let mut offset = 0;
                for i in 0..index {
                    offset += self.compute(&BasicPartition::new(i))?.len();
                }
                Ok(offset)
            }
        }
    }

    /// Compute the elements of this dataset for the given partition
    pub fn compute(&self, partition: &dyn Partition) -> RddResult<Vec<T>> {
        let partition_index = partition.index();
        if partition_index >= self.num_partitions() {
            return Err(RddError::InvalidPartition(partition_index));
        }

        match self {
            SimpleRdd::Vec {
                data,
                num_partitions,
            } => {
                let data_len = data.len();
                let partition_size = data_len.div_ceil(*num_partitions);
                let start = partition_index * partition_size;
                let end = std::cmp::min(start + partition_size, data_len);

                if start >= data_len {
                    Ok(Vec::new())
                } else {
                    Ok(data[start..end].to_vec())
                }
            }
            SimpleRdd::Partitioned { partitions } => Ok(partitions[partition_index].clone()),
            SimpleRdd::Derived { compute, .. } => compute(partition),
        }
    }

    /// Get the list of partitions for this dataset
    pub fn partitions(&self) -> Vec<Box<dyn Partition>> {
        (0..self.num_partitions())
            .map(|i| Box::new(BasicPartition::new(i)) as Box<dyn Partition>)
            .collect()
    }

    /// Get the number of partitions
    pub fn num_partitions(&self) -> usize {
        match self {
            SimpleRdd::Vec { num_partitions, .. } | SimpleRdd::Derived { num_partitions, .. } => {
                *num_partitions
            }
            SimpleRdd::Partitioned { partitions } => partitions.len(),
        }
    }

    /// One task per partition, for execution by a scheduler
    pub fn tasks(&self) -> Vec<Task<T>> {
        self.partitions()
            .into_iter()
            .map(|partition| {
                let rdd = self.clone();
                let compute_fn: ComputeFn<T> =
                    Arc::new(move |p: &dyn Partition| rdd.compute(p));
                Task::new(partition, compute_fn)
            })
            .collect()
    }

    /// Collect all elements sequentially, partition by partition
    pub fn collect(&self) -> RddResult<Vec<T>> {
        let mut result = Vec::new();
        for partition in self.partitions() {
            result.extend(self.compute(partition.as_ref())?);
        }
        Ok(result)
    }

    /// Count all elements sequentially
    pub fn count(&self) -> RddResult<usize> {
        let mut count = 0;
        for partition in self.partitions() {
            count += self.compute(partition.as_ref())?.len();
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_partitions_are_contiguous() {
        let rdd = SimpleRdd::from_vec_with_partitions((1..=10).collect::<Vec<i32>>(), 3);
        assert_eq!(rdd.num_partitions(), 3);
        assert_eq!(rdd.compute(&BasicPartition::new(0)).unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(rdd.compute(&BasicPartition::new(1)).unwrap(), vec![5, 6, 7, 8]);
        assert_eq!(rdd.compute(&BasicPartition::new(2)).unwrap(), vec![9, 10]);
        assert_eq!(rdd.collect().unwrap(), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_partitions_becomes_one() {
        let rdd = SimpleRdd::from_vec_with_partitions(vec![1, 2, 3], 0);
        assert_eq!(rdd.num_partitions(), 1);
    }

    #[test]
    fn test_more_partitions_than_elements() {
        let rdd = SimpleRdd::from_vec_with_partitions(vec![1, 2], 5);
        assert_eq!(rdd.num_partitions(), 5);
        assert_eq!(rdd.count().unwrap(), 2);
        assert!(rdd.compute(&BasicPartition::new(4)).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_partition() {
        let rdd = SimpleRdd::from_vec_with_partitions(vec![1, 2, 3], 2);
        let err = rdd.compute(&BasicPartition::new(2)).unwrap_err();
        assert!(matches!(err, RddError::InvalidPartition(2)));

        let mapped = rdd.map(|x| x + 1);
        let err = mapped.compute(&BasicPartition::new(7)).unwrap_err();
        assert!(matches!(err, RddError::InvalidPartition(7)));
    }

    #[test]
    fn test_map_changes_type_lazily() {
        let rdd = SimpleRdd::from_vec_with_partitions(vec![1, 2, 3, 4], 2)
            .map(|x: i32| format!("n{x}"))
            .filter(|s| s != "n3");
        assert_eq!(rdd.num_partitions(), 2);
        assert_eq!(rdd.collect().unwrap(), vec!["n1", "n2", "n4"]);
    }

    #[test]
    fn test_try_map_fails_fast() {
        let rdd = SimpleRdd::from_vec_with_partitions(vec![1, 2, -3, 4], 2).try_map(|x: i32| {
            if x < 0 {
                Err(RddError::ComputationError(format!("negative: {x}")))
            } else {
                Ok(x * 10)
            }
        });
        // The first partition is still fine on its own.
        assert_eq!(rdd.compute(&BasicPartition::new(0)).unwrap(), vec![10, 20]);
        let err = rdd.collect().unwrap_err();
        assert!(err.to_string().contains("negative: -3"));
    }

    #[test]
    fn test_zip_with_index_across_partitions() {
        let data: Vec<String> = (0..7).map(|i| format!("line{i}")).collect();
        let indexed = SimpleRdd::from_vec_with_partitions(data.clone(), 3).zip_with_index();
        let expected: Vec<(usize, String)> = data.into_iter().enumerate().collect();
        assert_eq!(indexed.collect().unwrap(), expected);
    }

    #[test]
    fn test_zip_with_index_after_filter() {
        let indexed = SimpleRdd::from_vec_with_partitions((0..10).collect::<Vec<i32>>(), 4)
            .filter(|x| x % 3 == 0)
            .zip_with_index();
        assert_eq!(
            indexed.collect().unwrap(),
            vec![(0, 0), (1, 3), (2, 6), (3, 9)]
        );
    }

    #[test]
    fn test_from_partitions() {
        let rdd = SimpleRdd::from_partitions(vec![vec![1], vec![], vec![2, 3]]);
        assert_eq!(rdd.num_partitions(), 3);
        assert_eq!(rdd.collect().unwrap(), vec![1, 2, 3]);
        assert_eq!(
            rdd.zip_with_index().collect().unwrap(),
            vec![(0, 1), (1, 2), (2, 3)]
        );

        let empty: SimpleRdd<i32> = SimpleRdd::from_partitions(Vec::new());
        assert_eq!(empty.num_partitions(), 1);
        assert_eq!(empty.count().unwrap(), 0);
    }

    #[test]
    fn test_tasks_cover_every_partition() {
        let rdd = SimpleRdd::from_vec_with_partitions((1..=5).collect::<Vec<i32>>(), 2);
        let tasks = rdd.tasks();
        assert_eq!(tasks.len(), 2);
        let results: Vec<Vec<i32>> = tasks.iter().map(|t| t.execute().unwrap()).collect();
        assert_eq!(results, vec![vec![1, 2, 3], vec![4, 5]]);
    }
}
