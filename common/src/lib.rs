//! Common utilities and abstractions for the monoflow project.
//!
//! This module provides the shared error type, configuration and text input.

pub mod config;
pub mod error;
pub mod io;

pub use config::{DEFAULT_APP_NAME, FlowConfig, FlowConfigBuilder};
pub use error::{CommonError, Result};
pub use io::{list_input_files, read_lines_from_file, read_text_lines};
