//! Executor options
//!
//! Mirrors the `@nativescript/nx:build` options schema. Every field is
//! optional so a bundle can describe a partial override layer.

use indexmap::IndexMap;
use nsnx_android::XmlUpdates;
use nsnx_core::error::{Error, Result};
use nsnx_ios::PlistUpdates;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Target platform of the NativeScript CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    /// Name as the NativeScript CLI spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source file swapped for another at bundle time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReplacement {
    pub replace: String,
    pub with: String,
}

/// Options bundle for one executor invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emulator: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_hmr: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uglify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub for_device: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
    /// Extra CLI flags persisted in the workspace, space separated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    /// `<target>[:<configuration>]` whose file replacements are borrowed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combine_with_config: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_replacements: Option<Vec<FileReplacement>>,
    /// Application identifier set through `ns config set` before running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plist_updates: Option<PlistUpdates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml_updates: Option<XmlUpdates>,
    /// Run `ns prepare <platform>` instead of run/debug
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepare: Option<bool>,

    // ios only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provision: Option<String>,

    // android only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aab: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_store_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_store_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_store_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_store_alias_password: Option<String>,
}

impl BuildOptions {
    /// Deserialize an options object as found in a workspace file
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(|e| {
            Error::validation(format!("Invalid executor options: {}", e)).with_source(e)
        })
    }

    /// Layer `over` on top of `self`: every key present in `over` wins
    pub fn overlay(self, over: BuildOptions) -> BuildOptions {
        BuildOptions {
            platform: over.platform.or(self.platform),
            debug: over.debug.or(self.debug),
            device: over.device.or(self.device),
            emulator: over.emulator.or(self.emulator),
            clean: over.clean.or(self.clean),
            no_hmr: over.no_hmr.or(self.no_hmr),
            uglify: over.uglify.or(self.uglify),
            verbose: over.verbose.or(self.verbose),
            release: over.release.or(self.release),
            for_device: over.for_device.or(self.for_device),
            production: over.production.or(self.production),
            copy_to: over.copy_to.or(self.copy_to),
            force: over.force.or(self.force),
            flags: over.flags.or(self.flags),
            combine_with_config: over.combine_with_config.or(self.combine_with_config),
            file_replacements: over.file_replacements.or(self.file_replacements),
            id: over.id.or(self.id),
            plist_updates: over.plist_updates.or(self.plist_updates),
            xml_updates: over.xml_updates.or(self.xml_updates),
            prepare: over.prepare.or(self.prepare),
            provision: over.provision.or(self.provision),
            aab: over.aab.or(self.aab),
            key_store_path: over.key_store_path.or(self.key_store_path),
            key_store_password: over.key_store_password.or(self.key_store_password),
            key_store_alias: over.key_store_alias.or(self.key_store_alias),
            key_store_alias_password: over
                .key_store_alias_password
                .or(self.key_store_alias_password),
        }
    }

    /// Plist updates, empty when unset
    pub fn plist_updates(&self) -> PlistUpdates {
        self.plist_updates.clone().unwrap_or_else(IndexMap::new)
    }

    /// XML updates, empty when unset
    pub fn xml_updates(&self) -> XmlUpdates {
        self.xml_updates.clone().unwrap_or_else(IndexMap::new)
    }
}

/// `true` only for `Some(true)`
pub(crate) fn enabled(flag: Option<bool>) -> bool {
    flag.unwrap_or(false)
}

/// The value of a string option when it is set and non-empty
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
