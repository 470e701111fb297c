//! Conversion between the document tree and the XML element tree.
//!
//! Entries have no native XML shape, so they are encoded as synthetic
//! child elements: a call entry becomes an element whose attributes are
//! `arg0..argN`, a list entry becomes an element with a `count`
//! attribute and comma-joined text. The reverse direction classifies
//! children by that shape. The encoding is ambiguous: a real nested
//! element whose attributes happen to look like `argN`, or like `count`
//! plus simple text, is indistinguishable from a synthetic one and is
//! imported as an entry. `from_xml(to_xml(node))` reproduces `node` only
//! when no such coincidence occurs.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AedtError, ErrorKind};
use crate::scalar;
use crate::tree::{Entry, Node};
use crate::xml::XmlElement;

static ARG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^arg(\d+)$").unwrap());

// ── Tree → XML ──────────────────────────────────────────────────────

/// Convert a document tree into an XML element tree. Entry-derived
/// synthetic elements precede structural children in document order.
pub fn to_xml(node: &Node) -> XmlElement {
    let mut elem = XmlElement::new(node.tag.clone());
    for (key, value) in &node.attributes {
        elem.attributes
            .push((key.clone(), scalar::format_xml_attr(value)));
    }
    for entry in &node.entries {
        elem.children.push(entry_to_xml(entry));
    }
    for child in &node.children {
        elem.children.push(to_xml(child));
    }
    elem
}

fn entry_to_xml(entry: &Entry) -> XmlElement {
    match entry {
        Entry::Call { name, args } => {
            let mut elem = XmlElement::new(name.clone());
            for (i, arg) in args.iter().enumerate() {
                elem.attributes
                    .push((format!("arg{}", i), scalar::format_xml_attr(arg)));
            }
            elem
        }
        Entry::List {
            name,
            count,
            values,
        } => {
            let mut elem = XmlElement::new(name.clone());
            elem.attributes.push(("count".to_string(), count.to_string()));
            if !values.is_empty() {
                elem.text = Some(
                    values
                        .iter()
                        .map(scalar::format_xml_attr)
                        .collect::<Vec<_>>()
                        .join(", "),
                );
            }
            elem
        }
    }
}

// ── XML → Tree ──────────────────────────────────────────────────────

/// The result of importing an XML element tree: the document tree plus
/// any classification notices.
#[derive(Debug)]
pub struct XmlImport {
    pub node: Node,
    pub notices: Vec<AedtError>,
}

/// Convert an XML element tree back into a document tree.
///
/// Each child element is classified in order: one or more `argN`-shaped
/// attributes make a call entry, a `count` attribute with non-empty text
/// makes a list entry, anything else recurses as a structural child.
pub fn from_xml(elem: &XmlElement) -> Result<XmlImport, AedtError> {
    let mut notices = Vec::new();
    let node = convert_element(elem, &mut notices)?;
    Ok(XmlImport { node, notices })
}

fn convert_element(elem: &XmlElement, notices: &mut Vec<AedtError>) -> Result<Node, AedtError> {
    let mut node = Node::new(elem.name.clone());
    for (key, value) in &elem.attributes {
        node.set_attr(key.clone(), scalar::parse_xml_attr(value));
    }

    for child in &elem.children {
        if let Some(entry) = classify_call(child, notices) {
            node.push_entry(entry);
        } else if let Some(entry) = classify_list(child, notices)? {
            node.push_entry(entry);
        } else {
            node.push_child(convert_element(child, notices)?);
        }
    }
    Ok(node)
}

/// Argument order is recovered from the numeric suffix of the attribute
/// names, not from their document order, so `arg10` sorts after `arg9`.
fn classify_call(elem: &XmlElement, notices: &mut Vec<AedtError>) -> Option<Entry> {
    let mut indexed: Vec<(usize, &str)> = Vec::new();
    let mut extra = 0usize;
    for (key, value) in &elem.attributes {
        let index = ARG_RE
            .captures(key)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<usize>().ok());
        match index {
            Some(i) => indexed.push((i, value.as_str())),
            None => extra += 1,
        }
    }
    if indexed.is_empty() {
        return None;
    }
    indexed.sort_by_key(|&(i, _)| i);

    if extra > 0 || !elem.children.is_empty() || elem.text.is_some() {
        notices.push(AedtError::new(
            ErrorKind::AmbiguousClassification,
            format!(
                "element '{}' imported as a call entry; its non-arg attributes, text, and nested elements are dropped",
                elem.name
            ),
        ));
    }

    let args = indexed
        .into_iter()
        .map(|(_, v)| scalar::parse_xml_attr(v))
        .collect();
    Some(Entry::Call {
        name: elem.name.clone(),
        args,
    })
}

fn classify_list(
    elem: &XmlElement,
    notices: &mut Vec<AedtError>,
) -> Result<Option<Entry>, AedtError> {
    let count_attr = match elem.attr("count") {
        Some(v) => v,
        None => return Ok(None),
    };
    let text = match elem.text.as_deref() {
        Some(t) if !t.is_empty() => t,
        _ => return Ok(None),
    };

    let count: i64 = count_attr.parse().map_err(|_| {
        AedtError::new(
            ErrorKind::MalformedScalar,
            format!(
                "list element '{}' has a non-integer count '{}'",
                elem.name, count_attr
            ),
        )
    })?;

    if elem.attributes.len() > 1 || !elem.children.is_empty() {
        notices.push(AedtError::new(
            ErrorKind::AmbiguousClassification,
            format!(
                "element '{}' imported as a list entry; its extra attributes and nested elements are dropped",
                elem.name
            ),
        ));
    }

    let values = text
        .split(',')
        .map(|v| scalar::parse_xml_attr(v.trim()))
        .collect();
    Ok(Some(Entry::List {
        name: elem.name.clone(),
        count,
        values,
    }))
}
