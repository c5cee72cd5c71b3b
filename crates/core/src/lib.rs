//! Core utilities for the NativeScript Nx tools
//!
//! This crate provides shared functionality used by the executor and its CLI:
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Process execution**: running the NativeScript CLI with inherited stdio
//! - **Configuration**: TOML-based tool configuration with defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use nsnx_core::{config::Config, process};
//!
//! let config = Config::load(None).expect("invalid config");
//! let program = process::platform_program(&config.schema.cli.program);
//! if !process::command_exists(&program) {
//!     eprintln!("{program} is not installed");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod process;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::process::{platform_program, run_command_streaming_in_dir};
}
