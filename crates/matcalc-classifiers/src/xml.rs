//! Minimal XML element tree and the document reader/writer behind the
//! classifier exchange format.
//!
//! Models and classifiers describe themselves as an [`XmlElement`] through
//! [`ToXml`]; this module turns such trees into documents and back using
//! `quick-xml`. Text content is not part of the format and is dropped on read.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::{ClassifierError, Result};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing any previous value under the same key.
    pub fn set_attribute<K: Into<String>, V: ToString>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn with_attribute<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute lookup that reports a missing key as [`ClassifierError::InvalidXml`].
    pub fn require_attribute(&self, key: &str) -> Result<&str> {
        self.attribute(key).ok_or_else(|| {
            ClassifierError::InvalidXml(format!(
                "<{}> is missing attribute '{}'",
                self.name, key
            ))
        })
    }

    /// Parse a required attribute into any `FromStr` type.
    pub fn parse_attribute<T: std::str::FromStr>(&self, key: &str) -> Result<T> {
        let raw = self.require_attribute(key)?;
        raw.parse().map_err(|_| {
            ClassifierError::InvalidXml(format!(
                "<{}> has invalid value '{}' for attribute '{}'",
                self.name, raw, key
            ))
        })
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn require_child(&self, name: &str) -> Result<&XmlElement> {
        self.child(name).ok_or_else(|| {
            ClassifierError::InvalidXml(format!("<{}> has no <{}> child", self.name, name))
        })
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// Types that serialize themselves into the exchange format.
pub trait ToXml {
    fn to_xml(&self) -> Result<XmlElement>;
}

/// Textual form of a cell value. Uses the shortest representation that
/// parses back to the same `f64`.
pub fn format_value(value: f64) -> String {
    value.to_string()
}

pub fn parse_value(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ClassifierError::InvalidXml(format!("invalid numeric value '{}'", raw)))
}

/// Write `root` as a complete, indented UTF-8 document.
pub fn write_document<W: Write>(root: &XmlElement, inner: W) -> Result<()> {
    let mut writer = Writer::new_with_indent(inner, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root)?;
    writer.into_inner().flush()?;
    Ok(())
}

pub fn document_to_string(root: &XmlElement) -> Result<String> {
    let mut buffer = Vec::new();
    write_document(root, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ClassifierError::InvalidXml(e.to_string()))
}

pub fn write_document_file<P: AsRef<Path>>(root: &XmlElement, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_document(root, BufWriter::new(file))?;
    log::debug!("Wrote XML document <{}> to {}", root.name, path.as_ref().display());
    Ok(())
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

/// Parse a document into its root element.
pub fn parse_document(text: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(element_from_start(&e)?),
            Event::Empty(e) => {
                let element = element_from_start(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ClassifierError::InvalidXml("unbalanced end tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ClassifierError::InvalidXml(format!(
            "element <{}> is never closed",
            open.name
        )));
    }
    root.ok_or_else(|| ClassifierError::InvalidXml("document has no root element".to_string()))
}

pub fn read_document_file<P: AsRef<Path>>(path: P) -> Result<XmlElement> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_document(&text)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => {
            return Err(ClassifierError::InvalidXml(
                "document has more than one root element".to_string(),
            ))
        }
        None => *root = Some(element),
    }
    Ok(())
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| ClassifierError::InvalidXml(e.to_string()))?
        .to_string();
    let mut element = XmlElement::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| ClassifierError::InvalidXml(e.to_string()))?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|e| ClassifierError::InvalidXml(e.to_string()))?
            .to_string();
        let value = attribute
            .unescape_value()
            .map_err(|e| ClassifierError::InvalidXml(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}
