//! The type and property registries, built together

use std::sync::Arc;

use quire_codec::{TypeRegistry, TypeRegistryBuilder, Value};
use quire_style::{PropertyName, PropertyRegistry, PropertyRegistryBuilder, StyleMap};
use quire_tree::Node;
use serde_json::Value as Json;

use crate::{Config, Error, Result};

/// Immutable registries for one configuration
#[derive(Debug, Clone)]
pub struct Registries {
    types: TypeRegistry,
    properties: Arc<PropertyRegistry>,
    pretty_json: bool,
}

impl Registries {
    /// Run every registration in order and freeze the result.
    ///
    /// Types come first: primitives and containers, style value types, then
    /// node kinds. Properties follow (built-in table, then extensions) so that
    /// custom properties know every registered type. The property registry is
    /// then attached to the type registry for the node decoders.
    pub fn build(config: &Config) -> Result<Self> {
        let mut types = TypeRegistryBuilder::with_builtins();
        quire_style::register_types(&mut types)?;
        quire_tree::register_node_types(&mut types)?;

        let mut properties = PropertyRegistryBuilder::with_standard();
        properties
            .unknown_properties(config.unknown_properties)
            .known_types(types.type_set());
        for extra in &config.extra_properties {
            properties.register(&extra.name, extra.handler.clone())?;
        }
        let properties = Arc::new(properties.build());

        types.with_context(Arc::clone(&properties));
        let types = types.build();

        tracing::debug!(
            types = types.len(),
            properties = properties.len(),
            "registries built"
        );
        Ok(Self {
            types,
            properties,
            pretty_json: config.pretty_json,
        })
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn properties(&self) -> &PropertyRegistry {
        &self.properties
    }

    /// Property by name, honoring the unknown-property policy
    pub fn property(&self, name: &str) -> Result<PropertyName> {
        Ok(self.properties.resolve(name)?)
    }

    /// Style map from `(name, value)` pairs
    pub fn style<'a, I>(&self, entries: I) -> Result<StyleMap>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let entries = entries
            .into_iter()
            .map(|(name, value)| -> Result<(PropertyName, Value)> {
                Ok((self.property(name)?, value))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(StyleMap::with(entries)?)
    }

    /// Tagged JSON for a document
    pub fn to_json(&self, node: &Node) -> Result<Json> {
        Ok(node.to_tagged(&self.types)?)
    }

    pub fn from_json(&self, json: &Json) -> Result<Node> {
        Ok(Node::from_tagged(json, &self.types)?)
    }

    pub fn to_string(&self, node: &Node) -> Result<String> {
        let json = self.to_json(node)?;
        let text = if self.pretty_json {
            serde_json::to_string_pretty(&json)
        } else {
            serde_json::to_string(&json)
        };
        text.map_err(Error::Json)
    }

    pub fn from_str(&self, text: &str) -> Result<Node> {
        let json: Json = serde_json::from_str(text).map_err(Error::Json)?;
        self.from_json(&json)
    }

    /// Tagged envelope for a value of any registered type
    pub fn to_tagged(&self, value: &Value) -> Result<Json> {
        Ok(self.types.to_tagged(value)?)
    }

    pub fn from_tagged(&self, json: &Json) -> Result<Value> {
        Ok(self.types.from_tagged(json)?)
    }

    pub fn style_to_json(&self, map: &StyleMap) -> Result<Json> {
        Ok(map.to_json(&self.types)?)
    }

    pub fn style_from_json(&self, json: &Json) -> Result<StyleMap> {
        Ok(StyleMap::from_json(json, &self.properties, &self.types)?)
    }
}
