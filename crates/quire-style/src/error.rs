//! Style errors

use quire_codec::CodecError;

/// Error raised by property validation, parsing and style map edits
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// A value failed its property's handler check
    #[error("Invalid value {value} for property `{property}`: expected {expected}")]
    Validation {
        property: String,
        value: String,
        expected: String,
    },

    #[error("Cannot parse `{text}` as {expected}")]
    Parse { text: String, expected: &'static str },

    #[error("Property `{0}` registered twice")]
    DuplicateRegistration(String),

    /// The same name appeared twice in the input of `StyleMap::with`
    #[error("Property `{0}` given more than once")]
    DuplicateProperty(String),

    #[error("Unknown property `{0}`")]
    UnknownProperty(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl StyleError {
    pub(crate) fn parse(text: &str, expected: &'static str) -> Self {
        Self::Parse { text: text.to_string(), expected }
    }
}
