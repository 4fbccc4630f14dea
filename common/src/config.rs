//! Configuration shared by flow contexts and the command line driver.

use crate::error::{CommonError, Result};
use serde::{Deserialize, Serialize};

/// Default application name used when none is supplied.
pub const DEFAULT_APP_NAME: &str = "monoflow-app";

/// Configuration for a flow context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Name reported in logs.
    pub app_name: String,
    /// Number of worker threads in the local thread pool.
    pub num_threads: usize,
    /// Number of partitions used when a dataset is created without an explicit count.
    pub default_parallelism: usize,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            num_threads: num_cpus::get(),
            default_parallelism: num_cpus::get(),
        }
    }
}

impl FlowConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> FlowConfigBuilder {
        FlowConfigBuilder::new()
    }

    /// Check that the configuration can drive a context.
    pub fn validate(&self) -> Result<()> {
        if self.num_threads == 0 {
            return Err(CommonError::configuration_error(
                "num_threads must be positive",
            ));
        }
        if self.default_parallelism == 0 {
            return Err(CommonError::configuration_error(
                "default_parallelism must be positive",
            ));
        }
        Ok(())
    }
}

/// Builder for [`FlowConfig`].
#[derive(Debug, Default)]
pub struct FlowConfigBuilder {
    config: FlowConfig,
}

impl FlowConfigBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: FlowConfig::default(),
        }
    }

    /// Set the application name.
    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.config.app_name = app_name.into();
        self
    }

    /// Set the number of worker threads.
    pub fn num_threads(mut self, num_threads: usize) -> Self {
        self.config.num_threads = num_threads;
        self
    }

    /// Set the default number of partitions.
    pub fn default_parallelism(mut self, partitions: usize) -> Self {
        self.config.default_parallelism = partitions;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<FlowConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
