use thiserror::Error;

use crate::types::FieldType;

/// Errors raised while turning an engine response into typed results.
///
/// Per-field and per-row failures (`UnknownFieldType`, `MalformedField`,
/// `Coercion`) are stored next to the field or row they belong to, which is
/// why the type is `Clone`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Malformed facet field '{field}': {reason}")]
    MalformedField { field: String, reason: String },

    #[error("Unknown field type suffix '{suffix}' in field '{field}'")]
    UnknownFieldType { field: String, suffix: String },

    #[error("Cannot coerce '{raw}' to {field_type}")]
    Coercion { field_type: FieldType, raw: String },

    #[error("No {class_name} with primary key '{primary_key}'")]
    MissingEntity { class_name: String, primary_key: String },

    #[error("Facet '{0}' was not requested")]
    FacetNotRequested(String),

    #[error("Loading {class_name} failed: {message}")]
    Load { class_name: String, message: String },

    #[error("Transport failed: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, Error>;
