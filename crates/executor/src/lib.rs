//! NativeScript build/run executor for Nx workspaces
//!
//! Turns a target's options into a NativeScript CLI invocation:
//!
//! - **Workspace**: reads `workspace.json`/`project.json` and resolves
//!   `project:target[:configuration]` selectors
//! - **Compiler**: merges configuration layers and derives CLI arguments
//! - **Executor**: patches `Info.plist`/XML resources, then runs `ns`
//!
//! # Example
//!
//! ```rust,no_run
//! use nsnx_executor::{run_executor, ExecutorSettings, TargetSelector, WorkspaceConfig};
//! use std::path::Path;
//!
//! let workspace = WorkspaceConfig::load(Path::new(".")).expect("no workspace");
//! let selector: TargetSelector = "nativescript-mobile:ios:prod".parse().expect("bad selector");
//! let argv = vec!["nativescript-mobile:ios:prod".to_string(), "--log".to_string(), "trace".to_string()];
//! let (options, context) = workspace.resolve(&selector, argv).expect("unresolved target");
//!
//! let result = run_executor(options, &context, &ExecutorSettings::default()).expect("setup failed");
//! std::process::exit(if result.success { 0 } else { 1 });
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod compiler;
pub mod context;
pub mod executor;
pub mod options;
pub mod workspace;

pub use compiler::{compile, CompiledCommand};
pub use context::ExecutorContext;
pub use executor::{run_executor, ExecutorResult, ExecutorSettings};
pub use options::{BuildOptions, FileReplacement, Platform};
pub use workspace::{ProjectConfig, TargetConfig, TargetSelector, WorkspaceConfig};
