//! Local Task Scheduler
//!
//! This module provides a local task scheduler that runs one task per
//! partition on a dedicated Rayon thread pool.

use crate::traits::{Partition, RddResult};
use monoflow_common::CommonError;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

/// Task represents a unit of work to be executed
pub struct Task<T> {
    pub partition: Box<dyn Partition>,
    pub compute_fn: ComputeFn<T>,
}

/// Type alias for complex compute function type
pub type ComputeFn<T> = Arc<dyn Fn(&dyn Partition) -> RddResult<Vec<T>> + Send + Sync>;

impl<T> Debug for Task<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("partition", &self.partition)
            .field("compute_fn", &"<function>")
            .finish()
    }
}

impl<T> Task<T> {
    pub fn new(partition: Box<dyn Partition>, compute_fn: ComputeFn<T>) -> Self {
        Self {
            partition,
            compute_fn,
        }
    }

    pub fn execute(&self) -> RddResult<Vec<T>> {
        debug!(partition = self.partition.index(), "running task");
        (self.compute_fn)(self.partition.as_ref())
    }
}

/// LocalScheduler manages parallel execution of tasks using Rayon.
///
/// Every method stops at the first failing task and returns its error;
/// results of the other tasks are dropped.
pub struct LocalScheduler {
    num_threads: usize,
    pool: ThreadPool,
}

impl Debug for LocalScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalScheduler")
            .field("num_threads", &self.num_threads)
            .finish()
    }
}

impl LocalScheduler {
    /// Create a new LocalScheduler with the specified number of threads
    pub fn new(num_threads: usize) -> RddResult<Self> {
        if num_threads == 0 {
            return Err(CommonError::configuration_error("num_threads must be positive").into());
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("monoflow-worker-{i}"))
            .build()
            .map_err(|e| {
                CommonError::internal_error_with_source("failed to build thread pool", e)
            })?;
        Ok(Self { num_threads, pool })
    }

    /// Create a new LocalScheduler with the default number of threads (CPU cores)
    pub fn with_default_threads() -> RddResult<Self> {
        Self::new(rayon::current_num_threads())
    }

    /// Get the number of threads
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Execute a collection of tasks in parallel, keeping task order in the output.
    ///
    /// When several tasks fail, the error of the lowest-indexed one is returned,
    /// whichever finished first.
    pub fn execute_tasks<T>(&self, tasks: Vec<Task<T>>) -> RddResult<Vec<Vec<T>>>
    where
        T: Send + Debug,
    {
        debug!(tasks = tasks.len(), "executing tasks");
        let results: Vec<RddResult<Vec<T>>> = self
            .pool
            .install(|| tasks.into_par_iter().map(|task| task.execute()).collect());
        results.into_iter().collect()
    }

    /// Execute a collection of tasks and collect all results into a single vector
    pub fn execute_and_collect<T>(&self, tasks: Vec<Task<T>>) -> RddResult<Vec<T>>
    where
        T: Send + Debug,
    {
        let partition_results = self.execute_tasks(tasks)?;
        Ok(partition_results.into_iter().flatten().collect())
    }

    /// Execute a collection of tasks and reduce the results using a fold operation.
    ///
    /// Partitions are folded in parallel; the partial results are reduced in
    /// task order. `reduce_fn` must be associative and `identity` its neutral element.
    pub fn execute_and_reduce<T, R, F, G>(
        &self,
        tasks: Vec<Task<T>>,
        identity: R,
        fold_fn: F,
        reduce_fn: G,
    ) -> RddResult<R>
    where
        T: Send + Debug,
        R: Send + Sync + Clone + Debug,
        F: Fn(R, T) -> R + Send + Sync,
        G: Fn(R, R) -> R + Send + Sync,
    {
        let partials: Vec<RddResult<R>> = self.pool.install(|| {
            tasks
                .into_par_iter()
                .map(|task| {
                    let partition_data = task.execute()?;
                    Ok(partition_data.into_iter().fold(identity.clone(), &fold_fn))
                })
                .collect()
        });
        partials
            .into_iter()
            .try_fold(identity.clone(), |acc, partial| Ok(reduce_fn(acc, partial?)))
    }

    /// Execute a collection of tasks and count the total number of elements
    pub fn execute_and_count<T>(&self, tasks: Vec<Task<T>>) -> RddResult<usize>
    where
        T: Send + Debug,
    {
        let counts: Vec<RddResult<usize>> = self.pool.install(|| {
            tasks
                .into_par_iter()
                .map(|task| task.execute().map(|data| data.len()))
                .collect()
        });
        counts.into_iter().sum()
    }
}
