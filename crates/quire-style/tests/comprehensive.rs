//! Comprehensive tests for quire-style
//!
//! Property validation, map edits and the JSON object form.

use quire_codec::{TypeRegistry, TypeRegistryBuilder, Value};
use quire_style::{
    box_property, props, BoxEdge, Color, Keyword, Length, PropertyName, PropertyRegistry,
    PropertyRegistryBuilder, Side, StyleError, StyleMap, StyleVisitor, ValueHandler,
};
use serde_json::json;

fn types() -> TypeRegistry {
    let mut builder = TypeRegistryBuilder::with_builtins();
    quire_style::register_types(&mut builder).unwrap();
    builder.build()
}

fn property(name: &str) -> PropertyName {
    PropertyRegistry::standard().resolve(name).unwrap()
}

#[test]
fn test_set_get_round_trip() {
    let cases = [
        (props::TEXT_COLOR, Value::new(Color::RED)),
        (props::FONT_FAMILY, Value::from("Georgia")),
        (props::FONT_SIZE, Value::new(Length::px(14.0))),
        (props::FONT_WEIGHT, Value::new(Keyword::new("bold"))),
        (props::COLUMN_COUNT, Value::from(2i64)),
        ("marginTop", Value::new(Length::Normal)),
    ];
    for (name, value) in cases {
        let map = StyleMap::empty().set(&property(name), value.clone()).unwrap();
        assert_eq!(map.get(name), Some(&value), "{name}");
    }
}

// Valid values for a handler; every member for keyword handlers
fn samples(handler: &ValueHandler) -> Vec<Value> {
    match handler {
        ValueHandler::Length => [Length::None, Length::Normal, Length::Number(3), Length::px(2.5)]
            .into_iter()
            .map(Value::new)
            .collect(),
        ValueHandler::Color => vec![Value::new(Color::RED), Value::new(Color::rgba(1, 2, 3, 4))],
        ValueHandler::Keyword { allowed } => allowed
            .iter()
            .map(|name| Value::new(Keyword::new(name.as_str())))
            .collect(),
        ValueHandler::Text { allow_empty } => {
            let mut values = vec![Value::from("Georgia")];
            if *allow_empty {
                values.push(Value::from(""));
            }
            values
        }
        ValueHandler::Integer { min, max } => vec![Value::from(*min), Value::from(*max)],
        ValueHandler::Any => vec![Value::from(true), Value::new(Length::px(1.0))],
    }
}

#[test]
fn test_every_standard_property_round_trips() {
    let types = types();
    let registry = PropertyRegistry::standard();
    let names = registry.names();
    assert_eq!(names.len(), 34);
    for name in names {
        let property = registry.resolve(name).unwrap();
        let handler = property.handler();
        let values = samples(handler);
        assert!(!values.is_empty(), "{name}");
        for value in values {
            let map = StyleMap::empty().set(&property, value.clone()).unwrap();
            assert_eq!(map.get(name), Some(&value), "{name}");

            let json = handler.to_json(&value, &types).unwrap();
            let back = handler.from_json(name, &json, &types).unwrap();
            assert_eq!(back, value, "{name}: {json}");
        }
    }
}

#[test]
fn test_remove_restores_original() {
    let base = StyleMap::with([(property("width"), Value::new(Length::px(5.0)))]).unwrap();
    let edited = base
        .set(&property("height"), Value::new(Length::px(7.0)))
        .unwrap()
        .remove("height");
    assert_eq!(edited, base);
}

#[test]
fn test_empty_singleton_after_remove() {
    let map = StyleMap::empty()
        .set(&property("textColor"), Value::new(Color::BLACK))
        .unwrap()
        .remove("textColor");
    assert!(StyleMap::ptr_eq(&map, &StyleMap::empty()));
    assert_eq!(map, StyleMap::EMPTY);
}

#[test]
fn test_set_all_applies_in_order() {
    let width = property("width");
    let map = StyleMap::empty()
        .set_all([
            (width.clone(), Value::new(Length::px(1.0))),
            (property("height"), Value::new(Length::px(2.0))),
            (width, Value::new(Length::px(3.0))),
        ])
        .unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get_as::<Length>("width"), Some(&Length::px(3.0)));
}

#[test]
fn test_set_all_stops_at_first_invalid() {
    let err = StyleMap::empty()
        .set_all([
            (property("width"), Value::new(Length::px(1.0))),
            (property("columnCount"), Value::from(0i64)),
        ])
        .unwrap_err();
    assert!(matches!(err, StyleError::Validation { property, .. } if property == "columnCount"));
}

#[test]
fn test_merge_precedence() {
    let a = StyleMap::with([(property("textColor"), Value::new(Color::RED))]).unwrap();
    let b = StyleMap::with([
        (property("textColor"), Value::new(Color::WHITE)),
        (property("fontSize"), Value::new(Length::px(10.0))),
    ])
    .unwrap();
    assert_eq!(a.merge(&b).get("textColor"), a.get("textColor"));
    assert_eq!(b.merge(&a).get("textColor"), b.get("textColor"));
    assert!(StyleMap::ptr_eq(&StyleMap::empty().merge(&b), &b));
}

#[test]
fn test_json_round_trip_with_style_types() {
    let types = types();
    let registry = PropertyRegistry::standard();
    let map = StyleMap::with([
        (property("backgroundColor"), Value::new(Color::rgba(1, 2, 3, 4))),
        (property("borderTopStyle"), Value::new(Keyword::new("dashed"))),
        (property("lineHeight"), Value::new(Length::Number(2))),
        (property("x-note"), Value::new(Length::px(1.5))),
    ])
    .unwrap();

    let json = map.to_json(&types).unwrap();
    assert_eq!(json["backgroundColor"], json!("#01020304"));
    assert_eq!(json["x-note"], json!({"type": "length", "value": "1.5px"}));

    let back = StyleMap::from_json(&json, &registry, &types).unwrap();
    assert_eq!(back, map);
}

#[test]
fn test_extension_property() {
    let mut builder = PropertyRegistryBuilder::with_standard();
    builder
        .register("tabSize", ValueHandler::Integer { min: 1, max: 16 })
        .unwrap();
    let registry = builder.build();
    let tab = registry.resolve("tabSize").unwrap();
    assert!(StyleMap::empty().set(&tab, Value::from(4i64)).is_ok());
    assert!(StyleMap::empty().set(&tab, Value::from(40i64)).is_err());
}

#[derive(Default)]
struct BoxSummary {
    margins: Vec<(Side, Length)>,
    border_colors: Vec<(Side, Color)>,
    font_family: Option<String>,
    others: usize,
}

impl StyleVisitor for BoxSummary {
    fn margin(&mut self, side: Side, length: &Length) {
        self.margins.push((side, *length));
    }

    fn border_color(&mut self, side: Side, color: &Color) {
        self.border_colors.push((side, *color));
    }

    fn font_family(&mut self, family: &str) {
        self.font_family = Some(family.to_string());
    }

    fn other(&mut self, _property: &PropertyName, _value: &Value) {
        self.others += 1;
    }
}

#[test]
fn test_visitor_sees_every_entry() {
    let mut entries = Vec::new();
    for side in Side::ALL {
        entries.push((
            property(box_property(BoxEdge::Margin, side)),
            Value::new(Length::px(1.0)),
        ));
    }
    entries.push((
        property(box_property(BoxEdge::BorderColor, Side::Left)),
        Value::new(Color::WHITE),
    ));
    entries.push((property("fontFamily"), Value::from("Mono")));
    entries.push((property("x-custom"), Value::from(true)));
    let map = StyleMap::with(entries).unwrap();

    let mut summary = BoxSummary::default();
    map.accept(&mut summary);
    assert_eq!(summary.margins.len(), 4);
    assert_eq!(summary.border_colors, vec![(Side::Left, Color::WHITE)]);
    assert_eq!(summary.font_family.as_deref(), Some("Mono"));
    assert_eq!(summary.others, 1);
}

#[test]
fn test_style_types_travel_tagged() {
    let types = types();
    for value in [
        Value::new(Length::px(3.0)),
        Value::new(Color::rgb(10, 20, 30)),
        Value::new(Keyword::new("italic")),
    ] {
        let json = types.to_tagged(&value).unwrap();
        assert_eq!(types.from_tagged(&json).unwrap(), value);
    }
}
