use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Error during Newick parsing (e.g., syntax error)
    ParseError {
        /// A human-readable message explaining the error
        message: String,
        /// The line number (1-based)
        line: usize,
        /// The column number (1-based)
        column: usize,
        /// The snippet of input where the error occurred
        snippet: String,
    },
    /// A placement line without both a taxon and an anchor
    MalformedPlacement {
        /// The line number (1-based)
        line: usize,
        /// The offending line, as read
        content: String,
    },
    /// A new taxon would reuse a label already in the namespace
    DuplicateTaxon(String),
    /// An anchor label names more than one node of the backbone
    AmbiguousAnchor { label: String, count: usize },
    /// Logical error (e.g., cycle detected, invalid operation)
    LogicError(String),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::ParseError {
                message,
                line,
                column,
                snippet,
            } => {
                write!(
                    f,
                    "Parse error at line {}, column {}:\n{}\nSnippet: \"{}\"",
                    line, column, message, snippet
                )
            }
            TreeError::MalformedPlacement { line, content } => write!(
                f,
                "Malformed placement at line {}: expected <taxon> <anchor>, got \"{}\"",
                line, content
            ),
            TreeError::DuplicateTaxon(label) => {
                write!(f, "Taxon \"{}\" already exists in the namespace", label)
            }
            TreeError::AmbiguousAnchor { label, count } => write!(
                f,
                "Anchor \"{}\" matches {} nodes of the backbone",
                label, count
            ),
            TreeError::LogicError(msg) => write!(f, "Tree logic error: {}", msg),
        }
    }
}

impl std::error::Error for TreeError {}
