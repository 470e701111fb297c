//! Line scanner for the native `$begin`/`$end` text grammar.
//!
//! One directive per line, classified into exactly one of five shapes in
//! priority order: begin marker, end marker, attribute (`=` without `(`),
//! call entry (balanced parentheses), list entry (balanced brackets).
//! Anything else is a malformed line. Indentation is recorded per open
//! block but never used to validate nesting; an `$end` indented unlike
//! its `$begin` only produces a notice.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AedtError, ErrorKind};
use crate::scalar;
use crate::tree::{Entry, Node, Scalar};

/// Quoted tag in a begin marker: `$begin 'project'`.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'([^']*)'").unwrap());

/// A successfully parsed document: the root block plus any non-fatal
/// notices collected on the way.
#[derive(Debug)]
pub struct Parsed {
    pub root: Node,
    pub notices: Vec<AedtError>,
}

/// Parse native text into a document tree.
///
/// Returns a fully built tree or the first fatal error; no partial tree
/// is ever exposed. Exactly one top-level block is supported.
pub fn parse(input: &str) -> Result<Parsed, AedtError> {
    let mut scanner = Scanner {
        stack: Vec::new(),
        root: None,
        notices: Vec::new(),
    };

    for (idx, raw) in input.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        scanner.scan_line(raw, idx + 1)?;
    }

    if let Some(open) = scanner.stack.last() {
        return Err(AedtError::at_line(
            ErrorKind::UnterminatedBlock,
            format!(
                "block '{}' opened at line {} is never closed",
                open.node.tag, open.line
            ),
            open.line,
        ));
    }

    match scanner.root {
        Some(root) => Ok(Parsed {
            root,
            notices: scanner.notices,
        }),
        None => Err(AedtError::new(
            ErrorKind::EmptyDocument,
            "input contains no top-level block",
        )),
    }
}

/// An open block on the scanner stack. The node collects attributes,
/// entries, and children until its `$end` pops it.
struct OpenBlock {
    indent: usize,
    line: usize,
    node: Node,
}

struct Scanner {
    stack: Vec<OpenBlock>,
    root: Option<Node>,
    notices: Vec<AedtError>,
}

impl Scanner {
    // ── Line classification ─────────────────────────────────────────

    fn scan_line(&mut self, raw: &str, line_no: usize) -> Result<(), AedtError> {
        let indent = raw.len() - raw.trim_start().len();
        let line = raw.trim();

        if line.starts_with("$begin") {
            return self.begin(line, indent, line_no);
        }
        if line.starts_with("$end") {
            return self.end(indent, line_no);
        }
        if line.contains('=') && !line.contains('(') {
            return self.attribute(line, line_no);
        }
        if let Some(open) = line.find('(') {
            if let Some(off) = line[open + 1..].find(')') {
                return self.call_entry(&line[..open], &line[open + 1..open + 1 + off], line_no);
            }
        }
        if let Some(open) = line.find('[') {
            if let Some(off) = line[open + 1..].find(']') {
                return self.list_entry(&line[..open], &line[open + 1..open + 1 + off], line_no);
            }
        }

        Err(AedtError::at_line(
            ErrorKind::MalformedLine,
            format!("unrecognized directive: {}", line),
            line_no,
        ))
    }

    // ── Block markers ───────────────────────────────────────────────

    fn begin(&mut self, line: &str, indent: usize, line_no: usize) -> Result<(), AedtError> {
        let tag = TAG_RE
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| {
                AedtError::at_line(
                    ErrorKind::MalformedLine,
                    "begin marker without a quoted tag",
                    line_no,
                )
            })?;
        if tag.is_empty() {
            return Err(AedtError::at_line(
                ErrorKind::MalformedLine,
                "begin marker with an empty tag",
                line_no,
            ));
        }

        if self.stack.is_empty() && self.root.is_some() {
            return Err(AedtError::at_line(
                ErrorKind::MultipleRoots,
                format!("second top-level block '{}' after the root closed", tag),
                line_no,
            ));
        }

        self.stack.push(OpenBlock {
            indent,
            line: line_no,
            node: Node::new(tag),
        });
        Ok(())
    }

    /// Pop the innermost block and attach it to its parent (or make it
    /// the root). The tag on the `$end` line is not matched against the
    /// block's tag, as in the legacy format.
    fn end(&mut self, indent: usize, line_no: usize) -> Result<(), AedtError> {
        let open = self.stack.pop().ok_or_else(|| {
            AedtError::at_line(
                ErrorKind::UnmatchedEnd,
                "end marker with no open block",
                line_no,
            )
        })?;

        if open.indent != indent {
            self.notices.push(AedtError::at_line(
                ErrorKind::IndentMismatch,
                format!(
                    "'$end' of block '{}' indented {} columns, its '$begin' at line {} indented {}",
                    open.node.tag, indent, open.line, open.indent
                ),
                line_no,
            ));
        }

        match self.stack.last_mut() {
            Some(parent) => parent.node.push_child(open.node),
            None => self.root = Some(open.node),
        }
        Ok(())
    }

    // ── Directives ──────────────────────────────────────────────────

    fn attribute(&mut self, line: &str, line_no: usize) -> Result<(), AedtError> {
        // The classifier guarantees an '=' is present.
        let Some((key, value)) = line.split_once('=') else {
            return Err(AedtError::at_line(
                ErrorKind::MalformedLine,
                format!("unrecognized directive: {}", line),
                line_no,
            ));
        };
        let value = scalar::parse_native(value);
        self.top(line_no, "attribute")?.set_attr(key.trim(), value);
        Ok(())
    }

    fn call_entry(&mut self, name: &str, inner: &str, line_no: usize) -> Result<(), AedtError> {
        let entry = Entry::Call {
            name: name.trim().to_string(),
            args: split_values(inner),
        };
        self.top(line_no, "call entry")?.push_entry(entry);
        Ok(())
    }

    fn list_entry(&mut self, name: &str, inner: &str, line_no: usize) -> Result<(), AedtError> {
        let name = name.trim();
        let Some((count_part, values_part)) = inner.split_once(':') else {
            return Err(AedtError::at_line(
                ErrorKind::MalformedLine,
                format!("list entry '{}' missing ':' between count and values", name),
                line_no,
            ));
        };

        let count = match scalar::parse_native(count_part) {
            Scalar::Int(n) => n,
            _ => {
                return Err(AedtError::at_line(
                    ErrorKind::MalformedScalar,
                    format!("list count '{}' is not an integer", count_part.trim()),
                    line_no,
                ))
            }
        };

        let values = split_values(values_part);
        if count != values.len() as i64 {
            // The declared literal is stored as written; the mismatch is
            // surfaced but not corrected.
            self.notices.push(AedtError::at_line(
                ErrorKind::CountMismatch,
                format!(
                    "list '{}' declares {} values but carries {}",
                    name,
                    count,
                    values.len()
                ),
                line_no,
            ));
        }

        let entry = Entry::List {
            name: name.to_string(),
            count,
            values,
        };
        self.top(line_no, "list entry")?.push_entry(entry);
        Ok(())
    }

    fn top(&mut self, line_no: usize, what: &str) -> Result<&mut Node, AedtError> {
        match self.stack.last_mut() {
            Some(open) => Ok(&mut open.node),
            None => Err(AedtError::at_line(
                ErrorKind::OrphanDirective,
                format!("{} outside any block", what),
                line_no,
            )),
        }
    }
}

/// Comma-split a call argument or list value sequence. A blank sequence
/// is empty rather than a single empty string.
fn split_values(inner: &str) -> Vec<Scalar> {
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner.split(',').map(scalar::parse_native).collect()
}
