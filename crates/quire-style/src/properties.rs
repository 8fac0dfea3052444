//! Property names and the property registry
//!
//! Every style property is a [`PropertyName`]: its text, the [`ValueHandler`]
//! that validates and (de)serializes its values, and the [`Visit`] slot that
//! routes its values to a [`StyleVisitor`](crate::StyleVisitor). Properties are
//! registered once into a [`PropertyRegistry`] and shared by reference.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use quire_codec::{TypeRegistry, TypeRegistryBuilder, TypeSet, Value};
use serde::Deserialize;
use serde_json::Value as Json;

use crate::{StyleError, StyleVisitor, ValueHandler};

/// Names of the built-in properties
pub mod props {
    pub const TEXT_COLOR: &str = "textColor";
    pub const BACKGROUND_COLOR: &str = "backgroundColor";
    pub const FONT_FAMILY: &str = "fontFamily";
    pub const FONT_SIZE: &str = "fontSize";
    pub const FONT_WEIGHT: &str = "fontWeight";
    pub const FONT_STYLE: &str = "fontStyle";
    pub const TEXT_DECORATION: &str = "textDecoration";
    pub const TEXT_ALIGN: &str = "textAlign";
    pub const LINE_HEIGHT: &str = "lineHeight";
    pub const LETTER_SPACING: &str = "letterSpacing";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const LIST_STYLE_TYPE: &str = "listStyleType";
    pub const COLUMN_COUNT: &str = "columnCount";
}

/// Side of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];
}

/// Per-side property family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxEdge {
    Margin,
    Padding,
    BorderWidth,
    BorderColor,
    BorderStyle,
}

impl BoxEdge {
    pub const ALL: [BoxEdge; 5] = [
        BoxEdge::Margin,
        BoxEdge::Padding,
        BoxEdge::BorderWidth,
        BoxEdge::BorderColor,
        BoxEdge::BorderStyle,
    ];

    fn handler(self) -> ValueHandler {
        match self {
            Self::Margin | Self::Padding | Self::BorderWidth => ValueHandler::Length,
            Self::BorderColor => ValueHandler::Color,
            Self::BorderStyle => ValueHandler::keywords(BORDER_STYLES),
        }
    }
}

// Indexed by [BoxEdge][Side]
const BOX_PROPERTIES: [[&str; 4]; 5] = [
    ["marginTop", "marginRight", "marginBottom", "marginLeft"],
    ["paddingTop", "paddingRight", "paddingBottom", "paddingLeft"],
    ["borderTopWidth", "borderRightWidth", "borderBottomWidth", "borderLeftWidth"],
    ["borderTopColor", "borderRightColor", "borderBottomColor", "borderLeftColor"],
    ["borderTopStyle", "borderRightStyle", "borderBottomStyle", "borderLeftStyle"],
];

/// Property name for one side of a box edge family
pub fn box_property(edge: BoxEdge, side: Side) -> &'static str {
    BOX_PROPERTIES[edge as usize][side as usize]
}

const FONT_WEIGHTS: &[&str] = &[
    "normal", "bold", "bolder", "lighter", "100", "200", "300", "400", "500", "600", "700", "800",
    "900",
];
const FONT_STYLES: &[&str] = &["normal", "italic", "oblique"];
const TEXT_DECORATIONS: &[&str] = &["none", "underline", "overline", "lineThrough"];
const TEXT_ALIGNS: &[&str] = &["left", "right", "center", "justify"];
const LIST_STYLE_TYPES: &[&str] = &[
    "none",
    "disc",
    "circle",
    "square",
    "decimal",
    "lowerAlpha",
    "upperAlpha",
    "lowerRoman",
    "upperRoman",
];
const BORDER_STYLES: &[&str] = &["none", "solid", "dashed", "dotted", "double"];

/// Visitor callback a property's values are routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visit {
    TextColor,
    BackgroundColor,
    FontFamily,
    FontSize,
    FontWeight,
    FontStyle,
    TextDecoration,
    TextAlign,
    LineHeight,
    LetterSpacing,
    Width,
    Height,
    ListStyleType,
    ColumnCount,
    Edge(BoxEdge, Side),
    /// Extension and unknown properties
    Other,
}

#[derive(Debug)]
struct PropertyDef {
    name: Box<str>,
    handler: ValueHandler,
    visit: Visit,
    known: TypeSet,
}

/// Registered property
///
/// Cheap to clone. Equality, ordering and hashing use the name text only, so
/// names are only handed out by a [`PropertyRegistry`]: one name, one handler.
#[derive(Clone)]
pub struct PropertyName(Arc<PropertyDef>);

impl PropertyName {
    fn new(name: &str, handler: ValueHandler, visit: Visit, known: TypeSet) -> Self {
        Self(Arc::new(PropertyDef {
            name: name.into(),
            handler,
            visit,
            known,
        }))
    }

    /// Unregistered property accepting any value of a type in `known`
    pub(crate) fn custom(name: &str, known: TypeSet) -> Self {
        Self::new(name, ValueHandler::Any, Visit::Other, known)
    }

    pub fn as_str(&self) -> &str {
        &self.0.name
    }

    pub fn handler(&self) -> &ValueHandler {
        &self.0.handler
    }

    pub fn visit(&self) -> Visit {
        self.0.visit
    }

    pub fn is_custom(&self) -> bool {
        self.0.visit == Visit::Other
    }

    pub fn check(&self, value: &Value) -> Result<(), StyleError> {
        self.0.handler.check(self.as_str(), value, &self.0.known)
    }

    pub fn to_json(&self, value: &Value, types: &TypeRegistry) -> Result<Json, StyleError> {
        self.0.handler.to_json(value, types)
    }

    pub fn from_json(&self, json: &Json, types: &TypeRegistry) -> Result<Value, StyleError> {
        self.0.handler.from_json(self.as_str(), json, types)
    }

    /// Route `value` to this property's visitor callback.
    pub fn dispatch<V: StyleVisitor + ?Sized>(&self, value: &Value, visitor: &mut V) {
        crate::visitor::dispatch(self, value, visitor);
    }
}

impl PartialEq for PropertyName {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for PropertyName {}

impl PartialOrd for PropertyName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PropertyName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Hash for PropertyName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Debug for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What lookups of unregistered names return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnknownProperties {
    /// A custom property with the `Any` handler
    #[default]
    Accept,
    Reject,
}

/// Immutable table of properties by name
#[derive(Debug, Clone)]
pub struct PropertyRegistry {
    by_name: HashMap<String, PropertyName>,
    unknown: UnknownProperties,
    known: TypeSet,
}

impl PropertyRegistry {
    /// Registry holding the built-in properties
    pub fn standard() -> Self {
        PropertyRegistryBuilder::with_standard().build()
    }

    /// Registered property, if any
    pub fn get(&self, name: &str) -> Option<&PropertyName> {
        self.by_name.get(name)
    }

    /// Registered property, or a custom one when unknown names are accepted
    pub fn resolve(&self, name: &str) -> Result<PropertyName, StyleError> {
        match self.by_name.get(name) {
            Some(property) => Ok(property.clone()),
            None if self.unknown == UnknownProperties::Accept => {
                Ok(PropertyName::custom(name, self.known.clone()))
            }
            None => Err(StyleError::UnknownProperty(name.to_string())),
        }
    }

    pub fn unknown_properties(&self) -> UnknownProperties {
        self.unknown
    }

    /// Types accepted by custom and `Any` properties
    pub fn known_types(&self) -> &TypeSet {
        &self.known
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Collects property registrations; duplicates are rejected as they arrive.
#[derive(Debug, Default)]
pub struct PropertyRegistryBuilder {
    by_name: HashMap<String, (ValueHandler, Visit)>,
    unknown: UnknownProperties,
    known: Option<TypeSet>,
}

impl PropertyRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-loaded with the built-in properties
    pub fn with_standard() -> Self {
        use props::*;

        let mut builder = Self::new();
        let mut add = |name: &str, handler: ValueHandler, visit: Visit| {
            builder.by_name.insert(name.to_string(), (handler, visit));
        };

        add(TEXT_COLOR, ValueHandler::Color, Visit::TextColor);
        add(BACKGROUND_COLOR, ValueHandler::Color, Visit::BackgroundColor);
        add(FONT_FAMILY, ValueHandler::Text { allow_empty: false }, Visit::FontFamily);
        add(FONT_SIZE, ValueHandler::Length, Visit::FontSize);
        add(FONT_WEIGHT, ValueHandler::keywords(FONT_WEIGHTS), Visit::FontWeight);
        add(FONT_STYLE, ValueHandler::keywords(FONT_STYLES), Visit::FontStyle);
        add(
            TEXT_DECORATION,
            ValueHandler::keywords(TEXT_DECORATIONS),
            Visit::TextDecoration,
        );
        add(TEXT_ALIGN, ValueHandler::keywords(TEXT_ALIGNS), Visit::TextAlign);
        add(LINE_HEIGHT, ValueHandler::Length, Visit::LineHeight);
        add(LETTER_SPACING, ValueHandler::Length, Visit::LetterSpacing);
        add(WIDTH, ValueHandler::Length, Visit::Width);
        add(HEIGHT, ValueHandler::Length, Visit::Height);
        add(
            LIST_STYLE_TYPE,
            ValueHandler::keywords(LIST_STYLE_TYPES),
            Visit::ListStyleType,
        );
        add(
            COLUMN_COUNT,
            ValueHandler::Integer { min: 1, max: 1000 },
            Visit::ColumnCount,
        );
        for edge in BoxEdge::ALL {
            for side in Side::ALL {
                add(box_property(edge, side), edge.handler(), Visit::Edge(edge, side));
            }
        }
        builder
    }

    /// Register an extension property, routed to [`StyleVisitor::other`].
    pub fn register(&mut self, name: &str, handler: ValueHandler) -> Result<&mut Self, StyleError> {
        if self.by_name.contains_key(name) {
            tracing::warn!(property = name, "duplicate property registration");
            return Err(StyleError::DuplicateRegistration(name.to_string()));
        }
        self.by_name
            .insert(name.to_string(), (handler, Visit::Other));
        Ok(self)
    }

    pub fn unknown_properties(&mut self, unknown: UnknownProperties) -> &mut Self {
        self.unknown = unknown;
        self
    }

    /// Types that custom and `Any` properties accept.
    ///
    /// Defaults to the primitives, the containers and the style value types.
    pub fn known_types(&mut self, known: TypeSet) -> &mut Self {
        self.known = Some(known);
        self
    }

    pub fn build(self) -> PropertyRegistry {
        let known = self.known.unwrap_or_else(style_types);
        let by_name = self
            .by_name
            .into_iter()
            .map(|(name, (handler, visit))| {
                let property = PropertyName::new(&name, handler, visit, known.clone());
                (name, property)
            })
            .collect::<HashMap<_, _>>();
        tracing::debug!(
            properties = by_name.len(),
            types = known.len(),
            "property registry built"
        );
        PropertyRegistry {
            by_name,
            unknown: self.unknown,
            known,
        }
    }
}

// Primitives, containers and style value types
fn style_types() -> TypeSet {
    let mut builder = TypeRegistryBuilder::with_builtins();
    match crate::register_types(&mut builder) {
        Ok(()) => builder.type_set(),
        Err(_) => TypeSet::default(),
    }
}
