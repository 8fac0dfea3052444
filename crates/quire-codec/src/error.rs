//! Codec errors

use serde_json::Value as Json;

/// Error raised while encoding or decoding typed JSON
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A tagged envelope (or map entry) lacks one of its two properties
    #[error("Missing property `{0}`")]
    MissingProperty(&'static str),

    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// The value's concrete type was never registered
    #[error("Type {0} has no registered tag")]
    Unregistered(&'static str),

    #[error("Type tag `{0}` registered twice")]
    DuplicateTag(String),

    #[error("Type registered under `{tag}` is already registered as `{existing}`")]
    DuplicateType { tag: String, existing: String },

    #[error("Expected {expected}, found {found}")]
    Unexpected { expected: &'static str, found: &'static str },

    /// A registered type rejected otherwise well-formed JSON
    #[error("Invalid {tag} value: {source}")]
    Invalid {
        tag: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A decoder needs state that was never attached to the registry
    #[error("No {0} attached to the type registry")]
    MissingContext(&'static str),

    #[error("Cannot encode non-finite number {0}")]
    NonFinite(f64),
}

impl CodecError {
    /// Wrong JSON shape for the expected form
    pub fn unexpected(expected: &'static str, found: &Json) -> Self {
        Self::Unexpected { expected, found: json_kind(found) }
    }

    pub fn invalid(
        tag: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Invalid { tag, source: source.into() }
    }
}

/// Short name of a JSON value's kind, for diagnostics
pub fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
