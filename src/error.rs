use std::fmt;

/// What went wrong (or, for the notice kinds, what looked suspicious).
///
/// `CountMismatch`, `IndentMismatch`, and `AmbiguousClassification` are
/// informational: they never abort a conversion and only ever appear in a
/// notice list next to a successfully built tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A literal that must be numeric (a list count) is not.
    MalformedScalar,
    /// End of input reached with open blocks on the stack.
    UnterminatedBlock,
    /// An `$end` marker with no matching open block.
    UnmatchedEnd,
    /// An attribute or entry line outside any block.
    OrphanDirective,
    /// A line matching none of the five recognized shapes.
    MalformedLine,
    /// A second top-level `$begin` after the first root closed.
    MultipleRoots,
    /// Input contains no top-level block at all.
    EmptyDocument,
    /// The underlying XML document could not be read or written.
    Xml,
    /// A list entry whose declared count differs from its value count.
    CountMismatch,
    /// An `$end` indented differently from its `$begin`.
    IndentMismatch,
    /// The XML bridge classified an element as an entry even though it
    /// carries data an entry cannot represent.
    AmbiguousClassification,
}

impl ErrorKind {
    /// Stable machine-readable identifier for this kind.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::MalformedScalar => "malformed-scalar",
            ErrorKind::UnterminatedBlock => "unterminated-block",
            ErrorKind::UnmatchedEnd => "unmatched-end",
            ErrorKind::OrphanDirective => "orphan-directive",
            ErrorKind::MalformedLine => "malformed-line",
            ErrorKind::MultipleRoots => "multiple-roots",
            ErrorKind::EmptyDocument => "empty-document",
            ErrorKind::Xml => "xml",
            ErrorKind::CountMismatch => "count-mismatch",
            ErrorKind::IndentMismatch => "indent-mismatch",
            ErrorKind::AmbiguousClassification => "ambiguous-classification",
        }
    }

    /// True for the kinds that only ever appear as notices.
    pub fn is_notice(self) -> bool {
        matches!(
            self,
            ErrorKind::CountMismatch
                | ErrorKind::IndentMismatch
                | ErrorKind::AmbiguousClassification
        )
    }
}

/// An error or notice produced by parsing or conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct AedtError {
    pub kind: ErrorKind,
    pub message: String,
    /// 1-based source line, when the problem is tied to one.
    pub line: Option<usize>,
}

impl AedtError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        AedtError {
            kind,
            message: message.into(),
            line: None,
        }
    }

    pub fn at_line(kind: ErrorKind, message: impl Into<String>, line: usize) -> Self {
        AedtError {
            kind,
            message: message.into(),
            line: Some(line),
        }
    }
}

impl fmt::Display for AedtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {} ({})", line, self.message, self.kind.code()),
            None => write!(f, "{} ({})", self.message, self.kind.code()),
        }
    }
}

impl std::error::Error for AedtError {}
