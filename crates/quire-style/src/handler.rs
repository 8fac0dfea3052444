//! Per-property value handlers
//!
//! A handler knows the one value type its property accepts. It validates
//! candidate values and converts them to and from the untagged JSON form; the
//! property name already implies the type, so no envelope is written.

use quire_codec::{TypeRegistry, TypeSet, Value};
use serde::Deserialize;
use serde_json::Value as Json;

use crate::{Color, Keyword, Length, StyleError};

/// Value type (and extra constraints) accepted by a property
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValueHandler {
    Length,
    Color,
    /// A [`Keyword`] from a fixed set
    Keyword { allowed: Vec<String> },
    Text {
        #[serde(rename = "allowEmpty", default)]
        allow_empty: bool,
    },
    /// `i64` within an inclusive range
    Integer { min: i64, max: i64 },
    /// Any registered type; written as a tagged envelope
    Any,
}

impl ValueHandler {
    pub fn keywords(allowed: &[&str]) -> Self {
        Self::Keyword {
            allowed: allowed.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Human-readable description of accepted values
    pub fn expected(&self) -> String {
        match self {
            Self::Length => "length".to_string(),
            Self::Color => "color".to_string(),
            Self::Keyword { allowed } => format!("one of [{}]", allowed.join(", ")),
            Self::Text { allow_empty: true } => "text".to_string(),
            Self::Text { allow_empty: false } => "non-empty text".to_string(),
            Self::Integer { min, max } => format!("integer in {min}..={max}"),
            Self::Any => "value of a registered type".to_string(),
        }
    }

    /// Check that `value` fits this handler.
    ///
    /// `known` holds the types `Any` accepts; other handlers ignore it.
    pub fn check(
        &self,
        property: &str,
        value: &Value,
        known: &TypeSet,
    ) -> Result<(), StyleError> {
        let accepted = match self {
            Self::Length => value.is::<Length>(),
            Self::Color => value.is::<Color>(),
            Self::Keyword { allowed } => value
                .downcast_ref::<Keyword>()
                .is_some_and(|keyword| allowed.iter().any(|name| name == keyword.as_str())),
            Self::Text { allow_empty } => value
                .downcast_ref::<String>()
                .is_some_and(|text| *allow_empty || !text.is_empty()),
            Self::Integer { min, max } => value
                .downcast_ref::<i64>()
                .is_some_and(|number| (*min..=*max).contains(number)),
            Self::Any => known.contains(value),
        };
        if accepted {
            Ok(())
        } else {
            Err(self.reject(property, format!("{value:?}")))
        }
    }

    pub fn to_json(&self, value: &Value, types: &TypeRegistry) -> Result<Json, StyleError> {
        let json = match self {
            Self::Any => types.to_tagged(value)?,
            _ => value.encode(types)?,
        };
        Ok(json)
    }

    /// Read the untagged form and validate the result.
    pub fn from_json(
        &self,
        property: &str,
        json: &Json,
        types: &TypeRegistry,
    ) -> Result<Value, StyleError> {
        let text = || json.as_str().ok_or_else(|| self.reject(property, json.to_string()));
        let value = match self {
            Self::Length => Value::new(text()?.parse::<Length>()?),
            Self::Color => Value::new(text()?.parse::<Color>()?),
            Self::Keyword { .. } => Value::new(Keyword::new(text()?)),
            Self::Text { .. } => Value::from(text()?),
            Self::Integer { .. } => Value::from(
                json.as_i64()
                    .ok_or_else(|| self.reject(property, json.to_string()))?,
            ),
            Self::Any if json.is_null() => return Err(self.reject(property, "null".to_string())),
            Self::Any => types.from_tagged(json)?,
        };
        self.check(property, &value, types.type_set())?;
        Ok(value)
    }

    fn reject(&self, property: &str, value: String) -> StyleError {
        StyleError::Validation {
            property: property.to_string(),
            value,
            expected: self.expected(),
        }
    }
}
