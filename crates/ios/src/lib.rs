//! iOS-specific tools for the NativeScript Nx executor
//!
//! This crate provides iOS-specific functionality:
//! - Property-list (`Info.plist`) key overwrites before a build

pub mod plist_updates;

pub use plist_updates::{apply_plist_updates, patch_plist_file, PlistUpdates};
