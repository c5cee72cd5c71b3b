//! Android-specific tools for the NativeScript Nx executor
//!
//! This crate provides Android-specific functionality:
//! - A small owned XML document model with parsing and pretty rendering
//! - Section rewrites of XML resource files (`strings.xml` and friends)

#![warn(missing_docs)]

pub mod xml_document;
pub mod xml_updates;

pub use xml_document::{XmlDocument, XmlElement, XmlNode};
pub use xml_updates::{apply_xml_updates, patch_xml_file, XmlEntry, XmlUpdates};
