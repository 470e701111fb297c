//! Serializer back to the native text grammar.

use crate::scalar;
use crate::tree::{Entry, Node, Scalar};

const INDENT: &str = "    ";

/// Serialize a document tree to native text.
///
/// Pre-order: begin marker, attributes, entries in stored order,
/// children, end marker. Entries always land before child blocks; their
/// interleaving in the original source is not reproduced. Indentation is
/// uniform, four spaces per nesting level on every line (the legacy
/// writer indented attribute and entry lines by a single fixed step
/// regardless of depth; that quirk is not reproduced).
pub fn write(root: &Node) -> String {
    let mut w = NativeWriter {
        buf: String::new(),
        depth: 0,
    };
    w.write_node(root);
    w.buf
}

struct NativeWriter {
    buf: String,
    depth: usize,
}

impl NativeWriter {
    fn write_node(&mut self, node: &Node) {
        self.line(&format!("$begin '{}'", node.tag));
        self.depth += 1;

        for (key, value) in &node.attributes {
            self.line(&format!("{}={}", key, scalar::format_native(value)));
        }
        for entry in &node.entries {
            self.write_entry(entry);
        }
        for child in &node.children {
            self.write_node(child);
        }

        self.depth -= 1;
        self.line(&format!("$end '{}'", node.tag));
    }

    fn write_entry(&mut self, entry: &Entry) {
        match entry {
            Entry::Call { name, args } => {
                self.line(&format!("{}({})", name, join_formatted(args)));
            }
            Entry::List {
                name,
                count,
                values,
            } => {
                if values.is_empty() {
                    self.line(&format!("{}[{}:]", name, count));
                } else {
                    self.line(&format!("{}[{}: {}]", name, count, join_formatted(values)));
                }
            }
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.buf.push_str(INDENT);
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }
}

fn join_formatted(values: &[Scalar]) -> String {
    values
        .iter()
        .map(scalar::format_native)
        .collect::<Vec<_>>()
        .join(", ")
}
