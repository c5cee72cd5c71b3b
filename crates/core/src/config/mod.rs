//! Configuration loading and schema definitions
//!
//! Tool-level settings shared by the executor and the CLI.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
