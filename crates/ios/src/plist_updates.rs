//! Property-list key overwrites
//!
//! Each configured plist file has a set of top-level keys replaced with
//! values taken from the executor options. Keys that are not mentioned are
//! left untouched; the file is written back as an XML property list.

use indexmap::IndexMap;
use nsnx_core::config::ResourcesConfig;
use nsnx_core::error::{Error, Result, ResultExt};
use serde_json::Value as JsonValue;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Plist file name -> top-level key -> replacement value
pub type PlistUpdates = IndexMap<String, IndexMap<String, JsonValue>>;

/// Outcome of patching one plist file
#[derive(Debug, Clone, PartialEq)]
pub struct PatchedPlist {
    /// File name as configured
    pub file: String,
    /// Resolved path that was written
    pub path: PathBuf,
    /// Keys written, with a display form of each new value
    pub keys: Vec<(String, String)>,
}

/// Apply every configured plist update, in configuration order.
///
/// Stops at the first file that fails to read, parse or write.
pub fn apply_plist_updates(
    project_dir: &Path,
    resources: &ResourcesConfig,
    updates: &PlistUpdates,
) -> Result<Vec<PatchedPlist>> {
    let mut patched = Vec::with_capacity(updates.len());
    for (file, keys) in updates {
        let path = resources.ios_path(project_dir, file);
        let written = patch_plist_file(&path, keys).context(format!("Updating {}", file))?;
        tracing::info!(file = %file, path = %path.display(), keys = written.len(), "plist updated");
        patched.push(PatchedPlist {
            file: file.clone(),
            path,
            keys: written,
        });
    }
    Ok(patched)
}

/// Overwrite top-level keys of the plist at `path`.
pub fn patch_plist_file(
    path: &Path,
    keys: &IndexMap<String, JsonValue>,
) -> Result<Vec<(String, String)>> {
    let bytes = std::fs::read(path).map_err(|e| {
        Error::from(e).with_context(format!("Reading {}", path.display()))
    })?;

    let mut document = plist::Value::from_reader(Cursor::new(bytes)).map_err(|e| {
        Error::plist(format!("Invalid property list {}: {}", path.display(), e)).with_source(e)
    })?;

    let dict = document.as_dictionary_mut().ok_or_else(|| {
        Error::plist(format!("Root of {} is not a dictionary", path.display()))
    })?;

    let mut written = Vec::with_capacity(keys.len());
    for (key, value) in keys {
        let converted = json_to_plist(value).context(format!("Key {}", key))?;
        dict.insert(key.clone(), converted);
        written.push((key.clone(), display_value(value)));
    }

    let mut out = Vec::new();
    document.to_writer_xml(&mut out).map_err(|e| {
        Error::plist(format!("Failed to serialize {}: {}", path.display(), e)).with_source(e)
    })?;
    std::fs::write(path, out)
        .map_err(|e| Error::from(e).with_context(format!("Writing {}", path.display())))?;

    Ok(written)
}

/// Convert an options value into a plist value.
///
/// `null` has no plist representation and is rejected.
pub fn json_to_plist(value: &JsonValue) -> Result<plist::Value> {
    Ok(match value {
        JsonValue::Null => {
            return Err(Error::validation("null is not a valid property-list value")
                .with_suggestion("Remove the key from plistUpdates or give it a value"));
        }
        JsonValue::Bool(b) => plist::Value::Boolean(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                plist::Value::Integer(i.into())
            } else if let Some(u) = n.as_u64() {
                plist::Value::Integer(u.into())
            } else {
                plist::Value::Real(n.as_f64().unwrap_or_default())
            }
        }
        JsonValue::String(s) => plist::Value::String(s.clone()),
        JsonValue::Array(items) => plist::Value::Array(
            items.iter().map(json_to_plist).collect::<Result<Vec<_>>>()?,
        ),
        JsonValue::Object(map) => {
            let mut dict = plist::Dictionary::new();
            for (k, v) in map {
                dict.insert(k.clone(), json_to_plist(v)?);
            }
            plist::Value::Dictionary(dict)
        }
    })
}

fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
