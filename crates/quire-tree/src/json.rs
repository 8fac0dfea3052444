//! JSON form of nodes
//!
//! Leaves are bare strings. Containers are objects with an optional `style`
//! object (or a `styleName` string) and, when they have children, a `values`
//! array of tagged children. Each kind has its own tag, so a tagged child
//! says which kind of node it is.
//!
//! Style maps are read against the [`PropertyRegistry`] attached to the type
//! registry with [`TypeRegistryBuilder::with_context`].

use std::any::Any;
use std::sync::Arc;

use quire_codec::{CodecError, JsonCodec, TypeRegistry, TypeRegistryBuilder, Typed, Value};
use quire_style::{PropertyRegistry, StyleError, StyleMap};
use serde_json::Value as Json;

use crate::node::{NodeData, NodeKind};
use crate::{Node, TreeError};

const STYLE_KEY: &str = "style";
const STYLE_NAME_KEY: &str = "styleName";
const VALUES_KEY: &str = "values";

/// Type tags of the node kinds
pub mod tags {
    pub const TEXT: &str = "text";
    pub const PLACEHOLDER: &str = "placeholder";
    pub const STYLE: &str = "style";
    pub const STYLE_NAME: &str = "styleName";
}

impl NodeKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Text => tags::TEXT,
            Self::Placeholder => tags::PLACEHOLDER,
            Self::Style => tags::STYLE,
            Self::StyleName => tags::STYLE_NAME,
        }
    }
}

/// Register the node kinds.
pub fn register_node_types(builder: &mut TypeRegistryBuilder) -> Result<(), CodecError> {
    builder
        .register_fn(
            tags::TEXT,
            |json, types| Ok(Value::new(Node::new_text(String::from_json(json, types)?))),
            &[],
        )?
        .register_fn(
            tags::PLACEHOLDER,
            |json, types| {
                Ok(Value::new(Node::new_placeholder(String::from_json(json, types)?)))
            },
            &[],
        )?
        .register_fn(
            tags::STYLE,
            |json, types| decode_style(json, types).map(Value::new),
            &[],
        )?
        .register_fn(
            tags::STYLE_NAME,
            |json, types| decode_style_name(json, types).map(Value::new),
            &[],
        )?;
    tracing::debug!("node types registered");
    Ok(())
}

impl Node {
    /// Untagged JSON for this node
    pub fn to_json(&self, types: &TypeRegistry) -> Result<Json, CodecError> {
        let (children, mut object) = match self.data() {
            NodeData::Text(text) | NodeData::Placeholder(text) => {
                return Ok(Json::String(text.clone()));
            }
            NodeData::Style { children, attributes } => {
                let mut object = serde_json::Map::new();
                if !attributes.is_empty() {
                    object.insert(
                        STYLE_KEY.to_string(),
                        attributes.to_json(types).map_err(style_to_codec)?,
                    );
                }
                (children, object)
            }
            NodeData::StyleName { children, style_name } => {
                let mut object = serde_json::Map::new();
                object.insert(STYLE_NAME_KEY.to_string(), Json::String(style_name.clone()));
                (children, object)
            }
        };
        if !children.is_empty() {
            let values = children
                .iter()
                .map(|child| types.to_tagged(&Value::new(Node::from_data(Arc::clone(child)))))
                .collect::<Result<Vec<_>, CodecError>>()?;
            object.insert(VALUES_KEY.to_string(), Json::Array(values));
        }
        Ok(Json::Object(object))
    }

    /// `{"type", "value"}` envelope for this node
    pub fn to_tagged(&self, types: &TypeRegistry) -> Result<Json, TreeError> {
        Ok(types.to_tagged(&Value::new(self.clone()))?)
    }

    /// Read a tagged node; the result is a root.
    pub fn from_tagged(json: &Json, types: &TypeRegistry) -> Result<Node, TreeError> {
        Ok(types.decode_as::<Node>(json)?)
    }
}

impl Typed for Node {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Node>()
    }

    fn dyn_eq(&self, other: &dyn Typed) -> bool {
        other.as_any().downcast_ref::<Node>().is_some_and(|other| other == self)
    }

    fn encode(&self, registry: &TypeRegistry) -> Result<Json, CodecError> {
        self.to_json(registry)
    }

    fn variant_tag(&self) -> Option<&'static str> {
        Some(self.kind().tag())
    }
}

fn decode_style(json: &Json, types: &TypeRegistry) -> Result<Node, CodecError> {
    let object = json
        .as_object()
        .ok_or_else(|| CodecError::unexpected("style node object", json))?;
    let attributes = match object.get(STYLE_KEY) {
        Some(style) => {
            let properties = types
                .context::<PropertyRegistry>()
                .ok_or(CodecError::MissingContext("property registry"))?;
            StyleMap::from_json(style, properties, types).map_err(style_to_codec)?
        }
        None => StyleMap::EMPTY,
    };
    let children = decode_children(object, types)?;
    Ok(Node::new_style(children, attributes))
}

fn decode_style_name(json: &Json, types: &TypeRegistry) -> Result<Node, CodecError> {
    let object = json
        .as_object()
        .ok_or_else(|| CodecError::unexpected("style name node object", json))?;
    let style_name = object
        .get(STYLE_NAME_KEY)
        .ok_or(CodecError::MissingProperty(STYLE_NAME_KEY))?;
    let style_name = String::from_json(style_name, types)?;
    let children = decode_children(object, types)?;
    Ok(Node::new_style_name(children, style_name))
}

fn decode_children(
    object: &serde_json::Map<String, Json>,
    types: &TypeRegistry,
) -> Result<Vec<Node>, CodecError> {
    let Some(values) = object.get(VALUES_KEY) else {
        return Ok(Vec::new());
    };
    values
        .as_array()
        .ok_or_else(|| CodecError::unexpected("array of nodes", values))?
        .iter()
        .map(|child| types.decode_as::<Node>(child))
        .collect()
}

fn style_to_codec(err: StyleError) -> CodecError {
    match err {
        StyleError::Codec(err) => err,
        err => CodecError::invalid(tags::STYLE, err),
    }
}
