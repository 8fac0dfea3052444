//! Initialization settings

use serde::Deserialize;

use quire_style::{UnknownProperties, ValueHandler};

use crate::Error;

/// Extension property registered after the built-in table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExtraProperty {
    pub name: String,
    pub handler: ValueHandler,
}

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// How lookups of unregistered property names behave
    pub unknown_properties: UnknownProperties,
    pub extra_properties: Vec<ExtraProperty>,
    /// Pretty-print documents written as strings
    pub pretty_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unknown_properties: UnknownProperties::Accept,
            extra_properties: Vec::new(),
            pretty_json: false,
        }
    }
}

impl Config {
    /// Read a configuration from JSON; missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(Error::Config)
    }

    pub fn with_unknown_properties(mut self, unknown: UnknownProperties) -> Self {
        self.unknown_properties = unknown;
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, handler: ValueHandler) -> Self {
        self.extra_properties.push(ExtraProperty {
            name: name.into(),
            handler,
        });
        self
    }

    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }
}
