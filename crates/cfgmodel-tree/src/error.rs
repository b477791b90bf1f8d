//! Error types for tree construction, XML reading, and XML writing.

use thiserror::Error;

/// Result type alias for cfgmodel-tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, reading, or writing a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// XML syntax error reported by quick-xml.
    #[error("XML syntax error: {message}{}", fmt_position(.position))]
    XmlSyntax {
        message: String,
        /// Byte offset where the error occurred.
        position: Option<u64>,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What was expected when EOF was encountered.
        expected: String,
    },

    /// Mismatched end tag.
    #[error("Mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag { expected: String, found: String },

    /// Empty document (no root element).
    #[error("Empty XML document: no root element found")]
    EmptyDocument,

    /// Multiple root elements.
    #[error("Invalid XML: multiple root elements")]
    MultipleRoots,

    /// A local name or Clark-notation name is malformed.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// An element uses a namespace prefix with no `xmlns:` declaration in scope.
    #[error("Unbound namespace prefix '{prefix}'")]
    UnboundPrefix { prefix: String },

    /// A structural edit would break the tree (for example, a cycle).
    #[error("Invalid tree structure: {message}")]
    InvalidStructure { message: String },

    /// Serialization failed.
    #[error("XML write error: {message}")]
    Write { message: String },
}

fn fmt_position(position: &Option<u64>) -> String {
    match position {
        Some(pos) => format!(" at byte {}", pos),
        None => String::new(),
    }
}

impl Error {
    pub(crate) fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlSyntax {
            message: err.to_string(),
            position: None,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlSyntax {
            message: format!("Attribute error: {}", err),
            position: None,
        }
    }
}
