//! Error types for parsing, building, and applying field filters.

use thiserror::Error;

/// Message shown to API clients when a `fields` parameter does not parse.
///
/// Parser diagnostics are meant for logs and tests; HTTP layers should
/// surface this instead.
pub const INVALID_FORMAT_MESSAGE: &str = "the fields format is invalid";

/// Errors that can occur while parsing or constructing a field filter.
#[derive(Error, Debug)]
pub enum FieldsFilterError {
    /// The filter spec string violates the grammar.
    /// `position` is the byte offset where the problem was detected.
    #[error("invalid fields format {spec:?} at offset {position}: {message}")]
    InvalidFormat {
        spec: String,
        position: usize,
        message: String,
    },

    /// Programmatic misuse of the construction API (conflicting options,
    /// empty field mappings, mixed polarity, invalid field names).
    #[error("invalid filter construction: {0}")]
    Construction(String),

    /// The input passed to one of the JSON convenience helpers was not valid JSON,
    /// or a value could not be serialized.
    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl FieldsFilterError {
    /// Client-facing message that does not leak parser internals.
    pub fn public_message(&self) -> String {
        match self {
            FieldsFilterError::InvalidFormat { .. } => INVALID_FORMAT_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Returns `true` if this error came from the spec grammar.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, FieldsFilterError::InvalidFormat { .. })
    }
}

/// Convenience alias used throughout fields-filter.
pub type Result<T> = std::result::Result<T, FieldsFilterError>;
