//! Generic XML element tree and its text representation.
//!
//! The element tree is the bridge target: a name, ordered attributes,
//! optional text content, and child elements. Reading and writing XML
//! text is delegated to `quick-xml` events; escaping is handled there.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{AedtError, ErrorKind};

#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    /// Ordered key/value pairs; keys are unique when built through
    /// `set_attr`.
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Set an attribute, overwriting in place on a duplicate key.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn xml_err(err: impl std::fmt::Display) -> AedtError {
    AedtError::new(ErrorKind::Xml, err.to_string())
}

// ── Writing ─────────────────────────────────────────────────────────

/// Serialize an element tree to XML text with a UTF-8 declaration and
/// four-space indentation.
pub fn to_string(root: &XmlElement) -> Result<String, AedtError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(xml_err)?;
    write_element(&mut writer, root)?;
    String::from_utf8(writer.into_inner()).map_err(xml_err)
}

fn write_element(writer: &mut Writer<Vec<u8>>, elem: &XmlElement) -> Result<(), AedtError> {
    let mut start = BytesStart::new(elem.name.as_str());
    for (key, value) in &elem.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if elem.text.is_none() && elem.children.is_empty() {
        writer.write_event(Event::Empty(start)).map_err(xml_err)?;
        return Ok(());
    }

    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    if let Some(text) = &elem.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_err)?;
    }
    for child in &elem.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(elem.name.as_str())))
        .map_err(xml_err)?;
    Ok(())
}

// ── Reading ─────────────────────────────────────────────────────────

/// Parse XML text into an element tree.
///
/// Exactly one root element is expected. Whitespace-only text nodes are
/// discarded and text content is trimmed, so indentation introduced by a
/// pretty-printer does not survive into the tree.
pub fn from_str(input: &str) -> Result<XmlElement, AedtError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(start) => stack.push(element_from_start(&start)?),
            Event::Empty(start) => {
                let elem = element_from_start(&start)?;
                attach(&mut stack, &mut root, elem)?;
            }
            Event::End(_) => {
                // quick-xml has already checked the tag matches.
                let elem = stack
                    .pop()
                    .ok_or_else(|| xml_err("close tag without an open element"))?;
                attach(&mut stack, &mut root, elem)?;
            }
            Event::Text(text) => {
                let content = text.unescape().map_err(xml_err)?;
                if let Some(open) = stack.last_mut() {
                    match &mut open.text {
                        Some(existing) => existing.push_str(&content),
                        None => open.text = Some(content.into_owned()),
                    }
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, CDATA.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(xml_err("unexpected end of XML input"));
    }
    root.ok_or_else(|| xml_err("document has no root element"))
}

fn element_from_start(start: &BytesStart) -> Result<XmlElement, AedtError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut elem = XmlElement::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(xml_err)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(xml_err)?.into_owned();
        elem.attributes.push((key, value));
    }
    Ok(elem)
}

fn attach(
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
    elem: XmlElement,
) -> Result<(), AedtError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(elem),
        None => {
            if root.is_some() {
                return Err(xml_err("document has more than one root element"));
            }
            *root = Some(elem);
        }
    }
    Ok(())
}
