//! CLI utilities for the NativeScript Nx tools
//!
//! Provides shared terminal output formatting and status messages.

#![warn(missing_docs)]

pub mod output;
