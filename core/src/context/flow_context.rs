//! FlowContext - Local execution context for dataset operations
//!
//! This module provides a non-distributed context that owns the
//! configuration and the thread pool used to run dataset actions.

use crate::rdd::{ShuffledRdd, SimpleRdd};
use crate::scheduler::LocalScheduler;
use crate::traits::{Data, RddResult};
use monoflow_common::{FlowConfig, read_text_lines};
use std::fmt::Debug;
use std::hash::Hash;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// FlowContext manages dataset operations on a local thread pool
#[derive(Debug, Clone)]
pub struct FlowContext {
    config: FlowConfig,
    scheduler: Arc<LocalScheduler>,
}

impl FlowContext {
    /// Create a new FlowContext with the given application name and default settings
    pub fn new(app_name: impl Into<String>) -> RddResult<Self> {
        Self::with_config(FlowConfig::builder().app_name(app_name).build()?)
    }

    /// Create a new FlowContext with a specific thread count
    pub fn new_with_threads(app_name: impl Into<String>, num_threads: usize) -> RddResult<Self> {
        Self::with_config(
            FlowConfig::builder()
                .app_name(app_name)
                .num_threads(num_threads)
                .build()?,
        )
    }

    /// Create a new FlowContext from a full configuration
    pub fn with_config(config: FlowConfig) -> RddResult<Self> {
        config.validate()?;
        let scheduler = Arc::new(LocalScheduler::new(config.num_threads)?);
        info!(
            app_name = %config.app_name,
            num_threads = config.num_threads,
            default_parallelism = config.default_parallelism,
            "flow context started"
        );
        Ok(Self { config, scheduler })
    }

    /// Get the application name
    pub fn app_name(&self) -> &str {
        &self.config.app_name
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Get the number of worker threads
    pub fn num_threads(&self) -> usize {
        self.scheduler.num_threads()
    }

    pub fn default_parallelism(&self) -> usize {
        self.config.default_parallelism
    }

    pub fn scheduler(&self) -> &LocalScheduler {
        &self.scheduler
    }

    /// Create a dataset from a vector of data using the default parallelism
    pub fn parallelize<T: Data>(&self, data: Vec<T>) -> SimpleRdd<T> {
        self.parallelize_with_partitions(data, self.config.default_parallelism)
    }

    /// Create a dataset from a vector with specified number of partitions
    pub fn parallelize_with_partitions<T: Data>(
        &self,
        data: Vec<T>,
        num_partitions: usize,
    ) -> SimpleRdd<T> {
        SimpleRdd::from_vec_with_partitions(data, num_partitions)
    }

    /// Create a dataset of lines from a text file or a directory of text files
    pub fn text_file<P: AsRef<Path>>(&self, path: P) -> RddResult<SimpleRdd<String>> {
        let lines = read_text_lines(&path)?;
        debug!(
            path = %path.as_ref().display(),
            lines = lines.len(),
            "loaded text input"
        );
        Ok(self.parallelize(lines))
    }

    /// Compute every partition in parallel and return all elements in partition order
    pub fn run<T: Data>(&self, rdd: &SimpleRdd<T>) -> RddResult<Vec<T>> {
        self.scheduler.execute_and_collect(rdd.tasks())
    }

    /// Count the elements of a dataset in parallel
    pub fn count<T: Data>(&self, rdd: &SimpleRdd<T>) -> RddResult<usize> {
        self.scheduler.execute_and_count(rdd.tasks())
    }

    /// Execute a shuffle and return its reduced partitions as a new dataset
    pub fn shuffle<K, V, C>(&self, rdd: &ShuffledRdd<K, V, C>) -> RddResult<SimpleRdd<(K, C)>>
    where
        K: Data + Hash + Eq,
        V: Data,
        C: Data,
    {
        rdd.run(&self.scheduler)
    }
}
