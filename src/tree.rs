/// An atomic value carried by attributes and entry arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// A directive inside a block that is not itself a nested block.
///
/// Entries keep their relative order on the node, Call and List
/// interleaved as they appeared in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// `name(arg0, arg1, ...)`
    Call { name: String, args: Vec<Scalar> },
    /// `name[count: v0, v1, ...]`
    ///
    /// `count` is the declared literal, stored as written. It is not
    /// required to match `values.len()`; the parser reports a mismatch
    /// as a non-fatal notice and the writer emits the literal back.
    List {
        name: String,
        count: i64,
        values: Vec<Scalar>,
    },
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::Call { name, .. } => name,
            Entry::List { name, .. } => name,
        }
    }
}

/// A block in the document tree: the shared intermediate representation
/// between the native text format and XML.
///
/// A node exclusively owns its attributes, entries, and children. Entries
/// always serialize before children regardless of how they interleaved in
/// the source; that ordering is not preserved across a round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: String,
    /// Insertion-ordered, unique keys. Use `set_attr` to keep both.
    pub attributes: Vec<(String, Scalar)>,
    pub entries: Vec<Entry>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Node {
            tag: tag.into(),
            attributes: Vec::new(),
            entries: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute. A duplicate key overwrites the stored value in
    /// place, keeping the key's original position.
    pub fn set_attr(&mut self, key: impl Into<String>, value: Scalar) {
        let key = key.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Look up an attribute by key.
    pub fn attr(&self, key: &str) -> Option<&Scalar> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn push_entry(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }
}
