//! Dynamically typed values
//!
//! A [`Value`] holds any concrete type behind `Arc<dyn Typed>`, so style maps
//! and containers can mix types that the call site knows nothing about.
//! Equality compares the concrete values; cloning shares the allocation.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use serde_json::Value as Json;

use crate::{CodecError, TypeRegistry};

/// Untagged JSON form of a concrete type
///
/// The type is implied by context (a property name, an envelope tag, a typed
/// container), so the JSON carries no type marker.
pub trait JsonCodec: Sized {
    fn to_json(&self, registry: &TypeRegistry) -> Result<Json, CodecError>;

    fn from_json(json: &Json, registry: &TypeRegistry) -> Result<Self, CodecError>;
}

/// Object-safe face of a type stored in a [`Value`]
///
/// Implement it with [`impl_typed!`](crate::impl_typed) for types that also
/// implement [`JsonCodec`] and `PartialEq`.
pub trait Typed: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn type_name(&self) -> &'static str;

    fn dyn_eq(&self, other: &dyn Typed) -> bool;

    /// Untagged JSON for this value
    fn encode(&self, registry: &TypeRegistry) -> Result<Json, CodecError>;

    /// Tag for types whose envelope tag depends on the variant rather than the type.
    fn variant_tag(&self) -> Option<&'static str> {
        None
    }
}

/// Implement [`Typed`] for types that implement [`JsonCodec`] and `PartialEq`.
#[macro_export]
macro_rules! impl_typed {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::Typed for $ty {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn type_name(&self) -> &'static str {
                ::std::any::type_name::<$ty>()
            }

            fn dyn_eq(&self, other: &dyn $crate::Typed) -> bool {
                other.as_any().downcast_ref::<$ty>().is_some_and(|other| other == self)
            }

            fn encode(
                &self,
                registry: &$crate::TypeRegistry,
            ) -> ::std::result::Result<$crate::serde_json::Value, $crate::CodecError> {
                $crate::JsonCodec::to_json(self, registry)
            }
        }
    )*};
}

/// Shared, immutable value of any [`Typed`] type
#[derive(Clone)]
pub struct Value(Arc<dyn Typed>);

impl Value {
    pub fn new<T: Typed>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the concrete value if it is a `T`
    pub fn downcast_ref<T: Typed>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Typed>(&self) -> bool {
        self.0.as_any().is::<T>()
    }

    /// `TypeId` of the concrete value (not of the wrapper)
    pub fn type_id(&self) -> TypeId {
        self.0.as_any().type_id()
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    pub fn as_typed(&self) -> &dyn Typed {
        &*self.0
    }

    /// Same allocation (identity, not equality)
    pub fn ptr_eq(a: &Value, b: &Value) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&a.0), Arc::as_ptr(&b.0))
    }

    pub fn encode(&self, registry: &TypeRegistry) -> Result<Json, CodecError> {
        self.0.encode(registry)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        Value::ptr_eq(self, other) || self.0.dyn_eq(other.as_typed())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::new(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::new(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::new(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::new(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::new(value)
    }
}

// Primitives

impl JsonCodec for String {
    fn to_json(&self, _registry: &TypeRegistry) -> Result<Json, CodecError> {
        Ok(Json::String(self.clone()))
    }

    fn from_json(json: &Json, _registry: &TypeRegistry) -> Result<Self, CodecError> {
        json.as_str()
            .map(str::to_string)
            .ok_or_else(|| CodecError::unexpected("string", json))
    }
}

impl JsonCodec for bool {
    fn to_json(&self, _registry: &TypeRegistry) -> Result<Json, CodecError> {
        Ok(Json::Bool(*self))
    }

    fn from_json(json: &Json, _registry: &TypeRegistry) -> Result<Self, CodecError> {
        json.as_bool().ok_or_else(|| CodecError::unexpected("boolean", json))
    }
}

impl JsonCodec for i64 {
    fn to_json(&self, _registry: &TypeRegistry) -> Result<Json, CodecError> {
        Ok(Json::from(*self))
    }

    fn from_json(json: &Json, _registry: &TypeRegistry) -> Result<Self, CodecError> {
        json.as_i64().ok_or_else(|| CodecError::unexpected("integer", json))
    }
}

impl JsonCodec for f64 {
    fn to_json(&self, _registry: &TypeRegistry) -> Result<Json, CodecError> {
        serde_json::Number::from_f64(*self)
            .map(Json::Number)
            .ok_or(CodecError::NonFinite(*self))
    }

    fn from_json(json: &Json, _registry: &TypeRegistry) -> Result<Self, CodecError> {
        json.as_f64().ok_or_else(|| CodecError::unexpected("number", json))
    }
}

crate::impl_typed!(String, bool, i64, f64);
