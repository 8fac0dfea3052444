//! Quire styles
//!
//! Style properties and the values they take:
//! - [`Length`], [`Color`] and [`Keyword`] value types
//! - [`ValueHandler`]: per-property validation and untagged JSON
//! - [`PropertyRegistry`]: the table of known properties
//! - [`StyleMap`]: persistent, sorted, validated property values
//! - [`StyleVisitor`]: typed traversal of a map's values

mod color;
mod error;
mod handler;
mod keyword;
mod length;
mod map;
mod properties;
mod visitor;

pub use color::Color;
pub use error::StyleError;
pub use handler::ValueHandler;
pub use keyword::Keyword;
pub use length::Length;
pub use map::StyleMap;
pub use properties::{
    box_property, props, BoxEdge, PropertyName, PropertyRegistry, PropertyRegistryBuilder, Side,
    UnknownProperties, Visit,
};
pub use visitor::StyleVisitor;

use quire_codec::{CodecError, TypeRegistryBuilder};

/// Type tags of the style value types
pub mod tags {
    pub const LENGTH: &str = "length";
    pub const COLOR: &str = "color";
    pub const KEYWORD: &str = "keyword";
}

/// Register the style value types so they can travel in tagged envelopes.
pub fn register_types(builder: &mut TypeRegistryBuilder) -> Result<(), CodecError> {
    builder
        .register::<Length>(tags::LENGTH)?
        .register::<Color>(tags::COLOR)?
        .register::<Keyword>(tags::KEYWORD)?;
    Ok(())
}
