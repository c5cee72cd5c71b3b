//! XML resource section rewrites
//!
//! Updates are keyed by file, then top-level section, then sub-section.
//! Every configured section is reset and each configured sub-section is
//! rebuilt from scratch as one element per `{name: value}` entry:
//!
//! ```text
//! {"strings.xml": {"resources": {"string": [{"app_name": "Demo"}]}}}
//!   -> <resources><string name="app_name">Demo</string></resources>
//! ```

use crate::xml_document::{XmlDocument, XmlElement, XmlNode};
use indexmap::IndexMap;
use nsnx_core::config::ResourcesConfig;
use nsnx_core::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

/// Attribute that carries an entry's name on the generated element
pub const NAME_ATTRIBUTE: &str = "name";

/// File -> section -> sub-section -> ordered entries
pub type XmlUpdates = IndexMap<String, IndexMap<String, IndexMap<String, Vec<XmlEntry>>>>;

/// One generated element: `<sub-section name="{name}">{value}</sub-section>`.
///
/// Written in options as a single-key object, `{"app_name": "Demo"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(
    try_from = "IndexMap<String, JsonValue>",
    into = "IndexMap<String, JsonValue>"
)]
pub struct XmlEntry {
    /// Value of the `name` attribute
    pub name: String,
    /// Text content
    pub value: String,
}

impl XmlEntry {
    /// Create an entry
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl TryFrom<IndexMap<String, JsonValue>> for XmlEntry {
    type Error = String;

    fn try_from(map: IndexMap<String, JsonValue>) -> std::result::Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(format!(
                "expected an object with exactly one key, found {} keys",
                map.len()
            ));
        }
        let (name, value) = map.into_iter().next().ok_or("empty entry")?;
        let value = match value {
            JsonValue::String(s) => s,
            JsonValue::Null => return Err(format!("entry \"{}\" has a null value", name)),
            other => other.to_string(),
        };
        Ok(Self { name, value })
    }
}

impl From<XmlEntry> for IndexMap<String, JsonValue> {
    fn from(entry: XmlEntry) -> Self {
        let mut map = IndexMap::with_capacity(1);
        map.insert(entry.name, JsonValue::String(entry.value));
        map
    }
}

/// Rewrite sections of an in-memory document
pub fn apply_sections(
    document: &mut XmlDocument,
    sections: &IndexMap<String, IndexMap<String, Vec<XmlEntry>>>,
) {
    for (section_name, sub_sections) in sections {
        let section = document.reset_section(section_name);
        for (sub_name, entries) in sub_sections {
            for entry in entries {
                section.children.push(XmlNode::Element(
                    XmlElement::new(sub_name.as_str())
                        .with_attribute(NAME_ATTRIBUTE, entry.name.as_str())
                        .with_text(entry.value.as_str()),
                ));
            }
        }
    }
}

/// Parse the file at `path`, rewrite its sections, and write it back
pub fn patch_xml_file(
    path: &Path,
    sections: &IndexMap<String, IndexMap<String, Vec<XmlEntry>>>,
) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::from(e).with_context(format!("Reading {}", path.display())))?;

    let mut document = XmlDocument::parse(&text).context(path.display().to_string())?;
    apply_sections(&mut document, sections);

    std::fs::write(path, document.render())
        .map_err(|e| Error::from(e).with_context(format!("Writing {}", path.display())))?;
    Ok(())
}

/// Apply every configured XML update, one file after another.
///
/// Returns the written paths in configuration order.
pub fn apply_xml_updates(
    project_dir: &Path,
    resources: &ResourcesConfig,
    updates: &XmlUpdates,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(updates.len());
    for (file, sections) in updates {
        let path = resources.android_path(project_dir, file);
        patch_xml_file(&path, sections).context(format!("Updating {}", file))?;
        tracing::info!(file = %file, path = %path.display(), "xml updated");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsnx_core::error::ErrorCode;

    fn sections(json: &str) -> IndexMap<String, IndexMap<String, Vec<XmlEntry>>> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_entry_from_single_key_object() {
        let entry: XmlEntry = serde_json::from_str(r#"{"app_name": "Demo"}"#).unwrap();
        assert_eq!(entry, XmlEntry::new("app_name", "Demo"));

        let entry: XmlEntry = serde_json::from_str(r#"{"enabled": true}"#).unwrap();
        assert_eq!(entry.value, "true");
    }

    #[test]
    fn test_entry_rejects_multiple_keys() {
        let result: std::result::Result<XmlEntry, _> =
            serde_json::from_str(r#"{"a": "1", "b": "2"}"#);
        assert!(result.is_err());

        let result: std::result::Result<XmlEntry, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn test_single_entry_replaces_section() {
        let mut doc = XmlDocument::parse("<root><items name=\"old\">x</items><other/></root>").unwrap();
        apply_sections(&mut doc, &sections(r#"{"root": {"items": [{"foo": "bar"}]}}"#));

        let root = doc.section("root").unwrap();
        let items: Vec<_> = root.elements_named("items").collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text(), "bar");
        assert_eq!(items[0].attribute("name"), Some("foo"));
        assert_eq!(root.elements_named("other").count(), 0);
    }

    #[test]
    fn test_entries_keep_configured_order() {
        let mut doc = XmlDocument::default();
        apply_sections(
            &mut doc,
            &sections(
                r##"{"resources": {
                    "string": [{"app_name": "Demo"}, {"title": "Home"}],
                    "color": [{"primary": "#000"}]
                }}"##,
            ),
        );

        assert_eq!(
            doc.render(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <resources>\n\
             \x20 <string name=\"app_name\">Demo</string>\n\
             \x20 <string name=\"title\">Home</string>\n\
             \x20 <color name=\"primary\">#000</color>\n\
             </resources>\n"
        );
    }

    #[test]
    fn test_patch_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let values = dir.path().join("App_Resources/Android/src/main/res/values");
        std::fs::create_dir_all(&values).unwrap();
        std::fs::write(
            values.join("strings.xml"),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources>\n  <string name=\"app_name\">Old</string>\n</resources>\n",
        )
        .unwrap();

        let mut updates = XmlUpdates::new();
        updates.insert(
            "src/main/res/values/strings.xml".to_string(),
            sections(r#"{"resources": {"string": [{"app_name": "New"}]}}"#),
        );

        let written =
            apply_xml_updates(dir.path(), &ResourcesConfig::default(), &updates).unwrap();
        assert_eq!(written, vec![values.join("strings.xml")]);

        let doc = XmlDocument::parse(&std::fs::read_to_string(values.join("strings.xml")).unwrap())
            .unwrap();
        let strings: Vec<_> = doc.section("resources").unwrap().elements_named("string").collect();
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[0].text(), "New");
    }

    #[test]
    fn test_empty_file_is_treated_as_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xml");
        std::fs::write(&path, "").unwrap();

        patch_xml_file(&path, &sections(r#"{"resources": {"string": [{"a": "b"}]}}"#)).unwrap();
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("<string name=\"a\">b</string>"));
    }

    #[test]
    fn test_malformed_file_is_xml_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.xml");
        std::fs::write(&path, "<resources>").unwrap();

        let err = patch_xml_file(&path, &sections(r#"{"resources": {}}"#)).unwrap_err();
        assert_eq!(err.code, ErrorCode::XmlError);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<resources>");
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut updates = XmlUpdates::new();
        updates.insert("./nope.xml".to_string(), sections(r#"{"resources": {}}"#));

        let err = apply_xml_updates(dir.path(), &ResourcesConfig::default(), &updates)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
    }
}
