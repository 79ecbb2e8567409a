//! Core error types.

use thiserror::Error;

use crate::value::Value;

/// Errors raised while building descriptors, registering templates and
/// resolving group specs.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed constructor input (empty enum values, negative length, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A template with this name is already registered.
    #[error("duplicate template name: {0}")]
    DuplicateName(String),

    /// A model with this name is already defined in the container.
    #[error("duplicate model: {0}")]
    DuplicateModel(String),

    /// No template is registered under this name.
    #[error("unknown template name: {0}")]
    UnknownName(String),

    /// No model is registered under this name.
    #[error("unknown model: {0}")]
    UnknownModel(String),

    /// The model has no attribute with this name.
    #[error("field '{field}' is not defined on model '{model}'")]
    UnknownField {
        /// Model that was searched.
        model: String,
        /// Attribute that was requested.
        field: String,
    },

    /// An association points at a model the graph does not know.
    #[error("association '{association}' of model '{model}' targets unknown model '{target}'")]
    UnknownAssociation {
        /// Source model of the association.
        model: String,
        /// Association name.
        association: String,
        /// Target model name.
        target: String,
    },

    /// A self-reference without a model hint was found outside any model scope.
    #[error("self-reference '{attribute}' has no model in scope and no explicit model name")]
    MissingModelScope {
        /// Spec key (or attribute hint) of the offending self-reference.
        attribute: String,
    },

    /// JSON decoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading a model document.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for fallible core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Data-time failure reported by an array element validator.
///
/// Kept apart from [`Error`]: it describes bad input values, not a bad schema.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("element {index} ({value}) is not a valid {expected}: {reason}")]
pub struct ElementValidationError {
    /// Position of the offending element.
    pub index: usize,
    /// The offending element.
    pub value: Value,
    /// Expected element kind, in ORM notation (e.g. `STRING(5)`).
    pub expected: String,
    /// Why the element was rejected.
    pub reason: String,
}

impl ElementValidationError {
    /// Create a new element validation error.
    pub fn new(
        index: usize,
        value: Value,
        expected: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            index,
            value,
            expected: expected.into(),
            reason: reason.into(),
        }
    }
}
