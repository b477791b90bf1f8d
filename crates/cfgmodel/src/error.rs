//! Errors raised by model operations.

use crate::descriptor::ModelKind;
use thiserror::Error;

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Structural failures of the typed model layer.
///
/// Lookups that simply find nothing are not errors; they return `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The backing element was removed from its document.
    #[error("<{name}> has been removed from its document")]
    Detached {
        /// Local name of the detached element.
        name: String,
    },

    /// A name, prefix, or token is malformed.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// An element was wrapped in a model type it does not correspond to.
    #[error("Expected a {expected} element, found <{found}>")]
    UnexpectedKind { expected: ModelKind, found: String },

    /// A descriptor file could not be read.
    #[error("Invalid descriptor: {message}")]
    InvalidDescriptor { message: String },

    /// Any other failure from the underlying tree.
    #[error(transparent)]
    Tree(cfgmodel_tree::Error),
}

impl ModelError {
    pub(crate) fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ModelError::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl From<cfgmodel_tree::Error> for ModelError {
    fn from(err: cfgmodel_tree::Error) -> Self {
        match err {
            cfgmodel_tree::Error::InvalidName { name, reason } => {
                ModelError::InvalidName { name, reason }
            }
            other => ModelError::Tree(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_invalid_name_maps_to_model_invalid_name() {
        let err: ModelError = cfgmodel_tree::QualifiedName::local("a b").unwrap_err().into();
        assert!(matches!(err, ModelError::InvalidName { name, .. } if name == "a b"));
    }

    #[test]
    fn test_other_tree_errors_pass_through() {
        let err: ModelError = cfgmodel_tree::Error::EmptyDocument.into();
        assert_eq!(err.to_string(), "Empty XML document: no root element found");
    }

    #[test]
    fn test_display() {
        let err = ModelError::UnexpectedKind {
            expected: ModelKind::Reference,
            found: "service".to_string(),
        };
        assert_eq!(err.to_string(), "Expected a reference element, found <service>");
    }
}
