//! Quire typed JSON codec
//!
//! Serializes values whose concrete type is unknown at the call site. Each
//! concrete type is registered once under a stable string tag; values are then
//! written as `{"type": tag, "value": ...}` envelopes and read back through the
//! tag's decoder.
//!
//! Where context already fixes the type (a style property, a typed `Vec<T>`),
//! the lighter untagged form from [`JsonCodec`] is used instead.

mod containers;
mod error;
mod registry;
mod value;

pub use containers::{Optional, ValueList, ValueMap, ValueSet};
pub use error::{json_kind, CodecError};
pub use registry::{tags, DecodeFn, TypeRegistry, TypeRegistryBuilder, TypeSet, TYPE_KEY, VALUE_KEY};
pub use value::{JsonCodec, Typed, Value};

// Used by `impl_typed!` expansions in downstream crates.
pub use serde_json;
