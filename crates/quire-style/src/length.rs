//! Length values
//!
//! A length is one of the literals `none` and `normal`, a bare non-negative
//! integer, or a number followed by a registered unit suffix (`10px`).

use std::fmt;
use std::str::FromStr;

use quire_codec::{CodecError, JsonCodec, TypeRegistry};
use serde_json::Value as Json;

use crate::StyleError;

/// Measurement value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    None,
    Normal,
    /// Unitless count
    Number(u32),
    Pixel(f64),
}

/// Unit suffixes, tried in order after the literals
const UNITS: &[(&str, fn(f64) -> Length)] = &[("px", Length::Pixel)];

impl Length {
    pub fn px(value: f64) -> Self {
        Self::Pixel(value)
    }

    pub fn number(value: u32) -> Self {
        Self::Number(value)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Pixel amount, if this is a pixel length
    pub fn as_px(&self) -> Option<f64> {
        match self {
            Self::Pixel(value) => Some(*value),
            _ => None,
        }
    }
}

impl FromStr for Length {
    type Err = StyleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "none" => return Ok(Self::None),
            "normal" => return Ok(Self::Normal),
            _ => {}
        }
        // Rust's number parsers take a leading '+'; the text form has one spelling.
        if text.starts_with('+') {
            return Err(StyleError::parse(text, "length"));
        }

        for (suffix, make) in UNITS {
            if let Some(amount) = text.strip_suffix(suffix) {
                let value: f64 = amount
                    .parse()
                    .map_err(|_| StyleError::parse(text, "length"))?;
                if !value.is_finite() {
                    return Err(StyleError::parse(text, "length"));
                }
                return Ok(make(value));
            }
        }

        text.parse::<u32>()
            .map(Self::Number)
            .map_err(|_| StyleError::parse(text, "length"))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Normal => f.write_str("normal"),
            Self::Number(value) => write!(f, "{value}"),
            // f64's Display drops the fraction of integral values: 10.0 -> "10"
            Self::Pixel(value) if *value == 0.0 => f.write_str("0px"),
            Self::Pixel(value) => write!(f, "{value}px"),
        }
    }
}

impl JsonCodec for Length {
    fn to_json(&self, _registry: &TypeRegistry) -> Result<Json, CodecError> {
        Ok(Json::String(self.to_string()))
    }

    fn from_json(json: &Json, _registry: &TypeRegistry) -> Result<Self, CodecError> {
        json.as_str()
            .ok_or_else(|| CodecError::unexpected("length string", json))?
            .parse()
            .map_err(|err| CodecError::invalid("length", err))
    }
}

quire_codec::impl_typed!(Length);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literals() {
        assert_eq!("none".parse::<Length>().unwrap(), Length::None);
        assert_eq!("normal".parse::<Length>().unwrap(), Length::Normal);
        assert_eq!("5".parse::<Length>().unwrap(), Length::Number(5));
        assert_eq!("10px".parse::<Length>().unwrap(), Length::Pixel(10.0));
        assert_eq!("1.5px".parse::<Length>().unwrap(), Length::Pixel(1.5));
    }

    #[test]
    fn test_parse_failure_quotes_text() {
        let err = "abc".parse::<Length>().unwrap_err();
        assert!(matches!(&err, StyleError::Parse { text, .. } if text == "abc"));
        assert!(err.to_string().contains("`abc`"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in [
            "", "px", "-5", "1.5", "abcpx", "NaNpx", "infpx", "None", " 5", "+5", "+10px",
        ] {
            assert!(text.parse::<Length>().is_err(), "{text:?} should not parse");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Length::None.to_string(), "none");
        assert_eq!(Length::Normal.to_string(), "normal");
        assert_eq!(Length::Number(7).to_string(), "7");
        assert_eq!(Length::Pixel(10.0).to_string(), "10px");
        assert_eq!(Length::Pixel(2.25).to_string(), "2.25px");
        assert_eq!(Length::Pixel(-0.0).to_string(), "0px");
    }

    #[test]
    fn test_display_parses_back() {
        for length in [Length::None, Length::Normal, Length::Number(12), Length::Pixel(-3.5)] {
            assert_eq!(length.to_string().parse::<Length>().unwrap(), length);
        }
    }

    #[test]
    fn test_json_is_string_form() {
        let registry = TypeRegistry::builtin();
        assert_eq!(Length::px(4.0).to_json(&registry).unwrap(), Json::from("4px"));
        let err = Length::from_json(&Json::from(4), &registry).unwrap_err();
        assert!(matches!(err, CodecError::Unexpected { .. }));
    }
}
