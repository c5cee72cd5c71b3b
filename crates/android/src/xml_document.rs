//! Owned XML document model
//!
//! Parsing goes through `roxmltree` and is converted into owned elements so
//! sections can be rebuilt and rendered back out. Comments, processing
//! instructions and whitespace-only text are not preserved.

use nsnx_core::error::{Error, Result};

/// Name of the wrapper element used when a document has several sections
pub const DEFAULT_ROOT_NAME: &str = "root";

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const INDENT: &str = "  ";

/// A parsed XML document as an ordered list of top-level sections.
///
/// A well-formed file always has one section (its root element). Rewrites
/// may add more, in which case they are rendered under a `<root>` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlDocument {
    /// Top-level sections, in document order
    pub sections: Vec<XmlElement>,
}

/// An element with its attributes and children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Qualified tag name (`prefix:local` when namespaced)
    pub name: String,
    /// Attributes in document order, namespace declarations included
    pub attributes: Vec<(String, String)>,
    /// Child nodes
    pub children: Vec<XmlNode>,
}

/// A child node of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// Nested element
    Element(XmlElement),
    /// Trimmed, non-empty text content
    Text(String),
}

impl XmlDocument {
    /// Parse XML text. Blank input yields an empty document.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options)
            .map_err(|e| Error::xml(format!("Invalid XML: {}", e)).with_source(e))?;

        Ok(Self {
            sections: vec![XmlElement::from_node(doc.root_element())],
        })
    }

    /// Get a top-level section by name
    pub fn section(&self, name: &str) -> Option<&XmlElement> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Replace a top-level section with an empty element of the same name.
    ///
    /// The section keeps its position; a new section is appended.
    pub fn reset_section(&mut self, name: &str) -> &mut XmlElement {
        let fresh = XmlElement::new(name);
        let index = match self.sections.iter().position(|s| s.name == name) {
            Some(i) => {
                self.sections[i] = fresh;
                i
            }
            None => {
                self.sections.push(fresh);
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }

    /// Render the document with an XML declaration and two-space indentation
    pub fn render(&self) -> String {
        let mut out = String::from(DECLARATION);
        out.push('\n');
        match self.sections.as_slice() {
            [single] => single.render_into(&mut out, 0),
            sections => XmlElement {
                name: DEFAULT_ROOT_NAME.to_string(),
                attributes: Vec::new(),
                children: sections.iter().cloned().map(XmlNode::Element).collect(),
            }
            .render_into(&mut out, 0),
        }
        out
    }
}

impl XmlElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder-style text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Look up an attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements with the given name
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter_map(move |child| match child {
            XmlNode::Element(e) if e.name == name => Some(e),
            _ => None,
        })
    }

    /// Concatenated text children
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                XmlNode::Text(t) => Some(t.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let mut attributes = Vec::new();

        let inherited: Vec<(Option<&str>, &str)> = node
            .parent_element()
            .map(|p| p.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
            .unwrap_or_default();
        for ns in node.namespaces() {
            if ns.name() == Some("xml") || inherited.contains(&(ns.name(), ns.uri())) {
                continue;
            }
            let key = match ns.name() {
                Some(prefix) => format!("xmlns:{}", prefix),
                None => "xmlns".to_string(),
            };
            attributes.push((key, ns.uri().to_string()));
        }

        for attr in node.attributes() {
            let name = qualify(node, attr.namespace(), attr.name());
            attributes.push((name, attr.value().to_string()));
        }

        let mut children = Vec::new();
        for child in node.children() {
            if child.is_element() {
                children.push(XmlNode::Element(Self::from_node(child)));
            } else if child.is_text() {
                let text = child.text().unwrap_or_default().trim();
                if !text.is_empty() {
                    children.push(XmlNode::Text(text.to_string()));
                }
            }
        }

        let tag = node.tag_name();
        Self {
            name: qualify(node, tag.namespace(), tag.name()),
            attributes,
            children,
        }
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let pad = INDENT.repeat(depth);
        out.push_str(&format!("{}<{}", pad, self.name));
        for (name, value) in &self.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, escape_attribute(value)));
        }

        match self.children.as_slice() {
            [] => out.push_str("/>\n"),
            [XmlNode::Text(text)] => {
                out.push_str(&format!(">{}</{}>\n", escape_text(text), self.name));
            }
            children => {
                out.push_str(">\n");
                for child in children {
                    match child {
                        XmlNode::Element(e) => e.render_into(out, depth + 1),
                        XmlNode::Text(t) => {
                            out.push_str(&format!("{}{}{}\n", pad, INDENT, escape_text(t)));
                        }
                    }
                }
                out.push_str(&format!("{}</{}>\n", pad, self.name));
            }
        }
    }
}

fn qualify(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, local),
        _ => local.to_string(),
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsnx_core::error::ErrorCode;

    #[test]
    fn test_blank_input_is_empty_document() {
        assert_eq!(XmlDocument::parse("").unwrap(), XmlDocument::default());
        assert_eq!(XmlDocument::parse("  \n").unwrap(), XmlDocument::default());
    }

    #[test]
    fn test_parse_keeps_structure() {
        let doc = XmlDocument::parse(
            r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <!-- app name -->
    <string name="app_name">Demo</string>
    <color name="primary">#3A53FF</color>
</resources>"#,
        )
        .unwrap();

        let resources = doc.section("resources").unwrap();
        let strings: Vec<_> = resources.elements_named("string").collect();
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[0].attribute("name"), Some("app_name"));
        assert_eq!(strings[0].text(), "Demo");
        assert_eq!(resources.elements_named("color").count(), 1);
    }

    #[test]
    fn test_namespaced_attributes_round_trip() {
        let source = r#"<manifest xmlns:android="http://schemas.android.com/apk/res/android" package="org.demo"><application android:label="Demo"/></manifest>"#;
        let rendered = XmlDocument::parse(source).unwrap().render();

        assert!(rendered.contains(r#"xmlns:android="http://schemas.android.com/apk/res/android""#));
        assert!(rendered.contains(r#"<application android:label="Demo"/>"#));
        assert!(XmlDocument::parse(&rendered).is_ok());
    }

    #[test]
    fn test_render_format() {
        let mut doc = XmlDocument::default();
        let section = doc.reset_section("resources");
        section.children.push(XmlNode::Element(
            XmlElement::new("string")
                .with_attribute("name", "title")
                .with_text("Fish & Chips"),
        ));

        assert_eq!(
            doc.render(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <resources>\n  <string name=\"title\">Fish &amp; Chips</string>\n</resources>\n"
        );
    }

    #[test]
    fn test_multiple_sections_get_wrapped() {
        let mut doc = XmlDocument::parse("<resources/>").unwrap();
        doc.reset_section("extra");

        let rendered = doc.render();
        assert!(rendered.contains("<root>\n  <resources/>\n  <extra/>\n</root>"));
    }

    #[test]
    fn test_reset_section_keeps_position() {
        let mut doc = XmlDocument {
            sections: vec![XmlElement::new("a").with_text("x"), XmlElement::new("b")],
        };
        doc.reset_section("a");
        assert_eq!(doc.sections[0], XmlElement::new("a"));
        assert_eq!(doc.sections[1].name, "b");
    }

    #[test]
    fn test_malformed_xml_is_error() {
        let err = XmlDocument::parse("<resources><string></resources>").unwrap_err();
        assert_eq!(err.code, ErrorCode::XmlError);
    }

    #[test]
    fn test_attribute_quotes_escaped() {
        let mut doc = XmlDocument::default();
        doc.reset_section("r")
            .attributes
            .push(("v".to_string(), "say \"hi\"".to_string()));
        assert!(doc.render().contains(r#"<r v="say &quot;hi&quot;"/>"#));
    }
}
