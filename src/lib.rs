//! Bidirectional converter for AEDT-style project files.
//!
//! The native format is a line-oriented, `$begin`/`$end`-delimited text
//! grammar; the alternative representation is a generic XML element
//! tree. Both sides pivot through one shared document tree:
//!
//! ```text
//! native text ── parser ──▶ Node ── writer ──▶ native text
//! XML text ──── xml ──────▶ XmlElement ◀─ bridge ─▶ Node
//! ```
//!
//! Every conversion is a pure function from an immutable input to either
//! a fully built tree or a typed error; there is no shared state and no
//! I/O inside the library. Non-fatal diagnostics (count mismatches,
//! indentation oddities, ambiguous XML classifications) travel as notice
//! lists next to the converted value.

pub mod bridge;
pub mod error;
pub mod parser;
pub mod scalar;
pub mod tree;
pub mod writer;
pub mod xml;

pub use bridge::{from_xml, to_xml, XmlImport};
pub use error::{AedtError, ErrorKind};
pub use parser::{parse, Parsed};
pub use tree::{Entry, Node, Scalar};
pub use writer::write;
pub use xml::XmlElement;

// ── Core API ───────────────────────────────────────────────────────

/// The output of an end-to-end conversion plus any notices collected on
/// the way.
#[derive(Debug)]
pub struct Converted {
    pub output: String,
    pub notices: Vec<AedtError>,
}

/// Convert native project text to XML text.
pub fn native_to_xml(input: &str) -> Result<Converted, AedtError> {
    let parsed = parser::parse(input)?;
    let elem = bridge::to_xml(&parsed.root);
    Ok(Converted {
        output: xml::to_string(&elem)?,
        notices: parsed.notices,
    })
}

/// Convert XML text back to native project text.
pub fn xml_to_native(input: &str) -> Result<Converted, AedtError> {
    let elem = xml::from_str(input)?;
    let import = bridge::from_xml(&elem)?;
    Ok(Converted {
        output: writer::write(&import.node),
        notices: import.notices,
    })
}

#[cfg(test)]
mod tests;
