//! Keyword values for enumerated properties

use std::fmt;

use quire_codec::{CodecError, JsonCodec, TypeRegistry};
use serde_json::Value as Json;

/// Bare identifier such as `bold` or `lineThrough`
///
/// Membership in a property's allowed set is checked by the property's
/// handler, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keyword(String);

impl Keyword {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Keyword {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl JsonCodec for Keyword {
    fn to_json(&self, _registry: &TypeRegistry) -> Result<Json, CodecError> {
        Ok(Json::String(self.0.clone()))
    }

    fn from_json(json: &Json, _registry: &TypeRegistry) -> Result<Self, CodecError> {
        json.as_str()
            .map(Self::new)
            .ok_or_else(|| CodecError::unexpected("keyword string", json))
    }
}

quire_codec::impl_typed!(Keyword);
