//! Typed traversal of style values
//!
//! Each property carries a [`Visit`] slot; [`dispatch`] matches on it once
//! and hands the downcast value to the corresponding callback. Every
//! callback defaults to a no-op so visitors implement only what they need.

use quire_codec::Value;

use crate::{BoxEdge, Color, Keyword, Length, PropertyName, Side, Visit};

pub trait StyleVisitor {
    fn text_color(&mut self, _color: &Color) {}
    fn background_color(&mut self, _color: &Color) {}
    fn font_family(&mut self, _family: &str) {}
    fn font_size(&mut self, _size: &Length) {}
    fn font_weight(&mut self, _weight: &Keyword) {}
    fn font_style(&mut self, _style: &Keyword) {}
    fn text_decoration(&mut self, _decoration: &Keyword) {}
    fn text_align(&mut self, _align: &Keyword) {}
    fn line_height(&mut self, _height: &Length) {}
    fn letter_spacing(&mut self, _spacing: &Length) {}
    fn width(&mut self, _width: &Length) {}
    fn height(&mut self, _height: &Length) {}
    fn list_style_type(&mut self, _kind: &Keyword) {}
    fn column_count(&mut self, _count: i64) {}
    fn margin(&mut self, _side: Side, _length: &Length) {}
    fn padding(&mut self, _side: Side, _length: &Length) {}
    fn border_width(&mut self, _side: Side, _width: &Length) {}
    fn border_color(&mut self, _side: Side, _color: &Color) {}
    fn border_style(&mut self, _side: Side, _style: &Keyword) {}

    /// Extension properties, and any value whose type its slot does not expect
    fn other(&mut self, _property: &PropertyName, _value: &Value) {}
}

pub(crate) fn dispatch<V: StyleVisitor + ?Sized>(
    property: &PropertyName,
    value: &Value,
    visitor: &mut V,
) {
    let color = || value.downcast_ref::<Color>();
    let length = || value.downcast_ref::<Length>();
    let keyword = || value.downcast_ref::<Keyword>();

    let handled = match property.visit() {
        Visit::TextColor => color().map(|c| visitor.text_color(c)),
        Visit::BackgroundColor => color().map(|c| visitor.background_color(c)),
        Visit::FontFamily => value
            .downcast_ref::<String>()
            .map(|family| visitor.font_family(family)),
        Visit::FontSize => length().map(|l| visitor.font_size(l)),
        Visit::FontWeight => keyword().map(|k| visitor.font_weight(k)),
        Visit::FontStyle => keyword().map(|k| visitor.font_style(k)),
        Visit::TextDecoration => keyword().map(|k| visitor.text_decoration(k)),
        Visit::TextAlign => keyword().map(|k| visitor.text_align(k)),
        Visit::LineHeight => length().map(|l| visitor.line_height(l)),
        Visit::LetterSpacing => length().map(|l| visitor.letter_spacing(l)),
        Visit::Width => length().map(|l| visitor.width(l)),
        Visit::Height => length().map(|l| visitor.height(l)),
        Visit::ListStyleType => keyword().map(|k| visitor.list_style_type(k)),
        Visit::ColumnCount => value
            .downcast_ref::<i64>()
            .map(|count| visitor.column_count(*count)),
        Visit::Edge(BoxEdge::Margin, side) => length().map(|l| visitor.margin(side, l)),
        Visit::Edge(BoxEdge::Padding, side) => length().map(|l| visitor.padding(side, l)),
        Visit::Edge(BoxEdge::BorderWidth, side) => length().map(|l| visitor.border_width(side, l)),
        Visit::Edge(BoxEdge::BorderColor, side) => color().map(|c| visitor.border_color(side, c)),
        Visit::Edge(BoxEdge::BorderStyle, side) => {
            keyword().map(|k| visitor.border_style(side, k))
        }
        Visit::Other => None,
    };

    if handled.is_none() {
        visitor.other(property, value);
    }
}
