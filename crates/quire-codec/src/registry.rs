//! Type registry and tagged envelopes
//!
//! Maps stable string tags to decoders and concrete types to tags, so a value
//! can be written as `{"type": tag, "value": untagged}` and read back without
//! the reader knowing its type. Built once through [`TypeRegistryBuilder`],
//! read-only afterwards.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value as Json;

use crate::containers::{Optional, ValueList, ValueMap, ValueSet};
use crate::{CodecError, JsonCodec, Typed, Value};

/// Envelope property holding the tag
pub const TYPE_KEY: &str = "type";
/// Envelope property holding the untagged value
pub const VALUE_KEY: &str = "value";

/// Tags of the built-in types
pub mod tags {
    pub const STRING: &str = "string";
    pub const BOOLEAN: &str = "boolean";
    pub const INTEGER: &str = "integer";
    pub const DOUBLE: &str = "double";
    pub const LIST: &str = "list";
    pub const SET: &str = "set";
    pub const MAP: &str = "map";
    pub const OPTIONAL: &str = "optional";
}

/// Factory turning the untagged JSON of one tag back into a value
pub type DecodeFn = Arc<dyn Fn(&Json, &TypeRegistry) -> Result<Value, CodecError> + Send + Sync>;

type Context = Arc<dyn Any + Send + Sync>;

/// Which values a registry can tag, without its decoders
///
/// Cheap to clone. Validators hold one to reject values that could never be
/// written, before any JSON is produced.
#[derive(Debug, Clone, Default)]
pub struct TypeSet {
    types: Arc<HashSet<TypeId>>,
    tags: Arc<HashSet<&'static str>>,
}

impl TypeSet {
    /// Whether `value` has a tag in this set
    pub fn contains(&self, value: &Value) -> bool {
        match value.as_typed().variant_tag() {
            Some(tag) => self.tags.contains(tag),
            None => self.types.contains(&value.type_id()),
        }
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Immutable tag table
#[derive(Clone)]
pub struct TypeRegistry {
    decoders: HashMap<&'static str, DecodeFn>,
    tags_by_type: HashMap<TypeId, &'static str>,
    known: TypeSet,
    context: HashMap<TypeId, Context>,
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<_> = self.decoders.keys().collect();
        tags.sort();
        f.debug_struct("TypeRegistry").field("tags", &tags).finish()
    }
}

impl TypeRegistry {
    /// Registry holding only the primitive and container types
    pub fn builtin() -> Self {
        TypeRegistryBuilder::with_builtins().build()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.decoders.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Tags and types of this registry
    pub fn type_set(&self) -> &TypeSet {
        &self.known
    }

    /// Shared state attached with [`TypeRegistryBuilder::with_context`]
    pub fn context<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.context.get(&TypeId::of::<T>())?.downcast_ref::<T>()
    }

    /// Tag under which `value` is written
    pub fn tag_of(&self, value: &Value) -> Result<&'static str, CodecError> {
        let tag = match value.as_typed().variant_tag() {
            Some(tag) => Some(tag).filter(|tag| self.decoders.contains_key(tag)),
            None => self.tags_by_type.get(&value.type_id()).copied(),
        };
        tag.ok_or(CodecError::Unregistered(value.type_name()))
    }

    /// Wrap `value` in a `{"type", "value"}` envelope.
    pub fn to_tagged(&self, value: &Value) -> Result<Json, CodecError> {
        let tag = self.tag_of(value)?;
        let mut envelope = serde_json::Map::with_capacity(2);
        envelope.insert(TYPE_KEY.to_string(), Json::String(tag.to_string()));
        envelope.insert(VALUE_KEY.to_string(), value.encode(self)?);
        Ok(Json::Object(envelope))
    }

    /// Like [`to_tagged`](Self::to_tagged); an absent value is JSON `null`.
    pub fn to_tagged_opt(&self, value: Option<&Value>) -> Result<Json, CodecError> {
        value.map_or(Ok(Json::Null), |value| self.to_tagged(value))
    }

    /// Read a `{"type", "value"}` envelope.
    pub fn from_tagged(&self, json: &Json) -> Result<Value, CodecError> {
        let envelope = json
            .as_object()
            .ok_or_else(|| CodecError::unexpected("tagged object", json))?;
        let tag = envelope
            .get(TYPE_KEY)
            .ok_or(CodecError::MissingProperty(TYPE_KEY))?;
        let tag = tag
            .as_str()
            .ok_or_else(|| CodecError::unexpected("string type tag", tag))?;
        let value = envelope
            .get(VALUE_KEY)
            .ok_or(CodecError::MissingProperty(VALUE_KEY))?;
        let decode = self
            .decoders
            .get(tag)
            .ok_or_else(|| CodecError::UnsupportedType(tag.to_string()))?;
        tracing::trace!(tag, "decoding tagged value");
        decode(value, self)
    }

    /// Like [`from_tagged`](Self::from_tagged); JSON `null` is an absent value.
    pub fn from_tagged_opt(&self, json: &Json) -> Result<Option<Value>, CodecError> {
        if json.is_null() {
            return Ok(None);
        }
        self.from_tagged(json).map(Some)
    }

    /// Decode an envelope that must hold a `T`.
    pub fn decode_as<T: Typed + Clone>(&self, json: &Json) -> Result<T, CodecError> {
        let value = self.from_tagged(json)?;
        value.downcast_ref::<T>().cloned().ok_or(CodecError::Unexpected {
            expected: std::any::type_name::<T>(),
            found: value.type_name(),
        })
    }
}

/// Collects registrations; duplicates are rejected as they arrive.
#[derive(Default)]
pub struct TypeRegistryBuilder {
    decoders: HashMap<&'static str, DecodeFn>,
    tags_by_type: HashMap<TypeId, &'static str>,
    context: HashMap<TypeId, Context>,
}

impl TypeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-loaded with primitives and heterogeneous containers
    pub fn with_builtins() -> Self {
        let mut builder = Self::new();
        builder.insert_type::<String>(tags::STRING);
        builder.insert_type::<bool>(tags::BOOLEAN);
        builder.insert_type::<i64>(tags::INTEGER);
        builder.insert_type::<f64>(tags::DOUBLE);
        builder.insert_type::<ValueList>(tags::LIST);
        builder.insert_type::<ValueSet>(tags::SET);
        builder.insert_type::<ValueMap>(tags::MAP);
        builder.insert_type::<Optional>(tags::OPTIONAL);
        builder
    }

    /// Bind `tag` to `T`, decoded through its [`JsonCodec`] impl.
    pub fn register<T: Typed + JsonCodec>(
        &mut self,
        tag: &'static str,
    ) -> Result<&mut Self, CodecError> {
        self.register_fn(tag, decode_with::<T>, &[TypeId::of::<T>()])
    }

    /// Bind `tag` to a decoder and to every type in `types`.
    ///
    /// Types that pick their tag per variant ([`Typed::variant_tag`]) pass an
    /// empty `types` slice.
    pub fn register_fn<F>(
        &mut self,
        tag: &'static str,
        decode: F,
        types: &[TypeId],
    ) -> Result<&mut Self, CodecError>
    where
        F: Fn(&Json, &TypeRegistry) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        if self.decoders.contains_key(tag) {
            tracing::warn!(tag, "duplicate type tag");
            return Err(CodecError::DuplicateTag(tag.to_string()));
        }
        if let Some(existing) = types.iter().find_map(|id| self.tags_by_type.get(id)) {
            tracing::warn!(tag, existing, "type registered under two tags");
            return Err(CodecError::DuplicateType {
                tag: tag.to_string(),
                existing: existing.to_string(),
            });
        }
        self.decoders.insert(tag, Arc::new(decode));
        for id in types {
            self.tags_by_type.insert(*id, tag);
        }
        Ok(self)
    }

    /// Attach shared state that decoders look up through [`TypeRegistry::context`].
    ///
    /// One value per type; a later call replaces the earlier one.
    pub fn with_context<T: Any + Send + Sync>(&mut self, context: Arc<T>) -> &mut Self {
        self.context.insert(TypeId::of::<T>(), context);
        self
    }

    /// Snapshot of the tags and types registered so far
    pub fn type_set(&self) -> TypeSet {
        TypeSet {
            types: Arc::new(self.tags_by_type.keys().copied().collect()),
            tags: Arc::new(self.decoders.keys().copied().collect()),
        }
    }

    pub fn build(self) -> TypeRegistry {
        tracing::debug!(tags = self.decoders.len(), "type registry built");
        TypeRegistry {
            known: self.type_set(),
            decoders: self.decoders,
            tags_by_type: self.tags_by_type,
            context: self.context,
        }
    }

    fn insert_type<T: Typed + JsonCodec>(&mut self, tag: &'static str) {
        self.decoders.insert(tag, Arc::new(decode_with::<T>));
        self.tags_by_type.insert(TypeId::of::<T>(), tag);
    }
}

fn decode_with<T: Typed + JsonCodec>(json: &Json, registry: &TypeRegistry) -> Result<Value, CodecError> {
    T::from_json(json, registry).map(Value::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    struct Celsius(f64);

    impl JsonCodec for Celsius {
        fn to_json(&self, registry: &TypeRegistry) -> Result<Json, CodecError> {
            self.0.to_json(registry)
        }

        fn from_json(json: &Json, registry: &TypeRegistry) -> Result<Self, CodecError> {
            f64::from_json(json, registry).map(Celsius)
        }
    }

    crate::impl_typed!(Celsius);

    #[test]
    fn test_tagged_primitive() {
        let registry = TypeRegistry::builtin();
        let json = registry.to_tagged(&Value::from("hi")).unwrap();
        assert_eq!(json, json!({"type": "string", "value": "hi"}));
        assert_eq!(registry.from_tagged(&json).unwrap(), Value::from("hi"));
    }

    #[test]
    fn test_null_is_absent() {
        let registry = TypeRegistry::builtin();
        assert_eq!(registry.to_tagged_opt(None).unwrap(), Json::Null);
        assert_eq!(registry.from_tagged_opt(&Json::Null).unwrap(), None);
    }

    #[test]
    fn test_unregistered_type() {
        let registry = TypeRegistry::builtin();
        let err = registry.to_tagged(&Value::new(Celsius(1.0))).unwrap_err();
        assert!(matches!(err, CodecError::Unregistered(name) if name.ends_with("Celsius")));
    }

    #[test]
    fn test_custom_registration() {
        let mut builder = TypeRegistryBuilder::with_builtins();
        builder.register::<Celsius>("celsius").unwrap();
        let registry = builder.build();

        let value = Value::new(Celsius(21.5));
        let json = registry.to_tagged(&value).unwrap();
        assert_eq!(json, json!({"type": "celsius", "value": 21.5}));
        assert_eq!(registry.decode_as::<Celsius>(&json).unwrap(), Celsius(21.5));
    }

    #[test]
    fn test_duplicate_tag() {
        let mut builder = TypeRegistryBuilder::with_builtins();
        let err = builder.register::<Celsius>("string").err().unwrap();
        assert!(matches!(err, CodecError::DuplicateTag(tag) if tag == "string"));
    }

    #[test]
    fn test_duplicate_type() {
        let mut builder = TypeRegistryBuilder::new();
        builder.register::<Celsius>("celsius").unwrap();
        let err = builder.register::<Celsius>("temperature").err().unwrap();
        assert!(matches!(err, CodecError::DuplicateType { .. }));
    }

    #[test]
    fn test_missing_envelope_properties() {
        let registry = TypeRegistry::builtin();
        let err = registry.from_tagged(&json!({"value": 1})).unwrap_err();
        assert!(matches!(err, CodecError::MissingProperty("type")));
        let err = registry.from_tagged(&json!({"type": "integer"})).unwrap_err();
        assert!(matches!(err, CodecError::MissingProperty("value")));
    }

    #[test]
    fn test_unsupported_tag() {
        let registry = TypeRegistry::builtin();
        let err = registry
            .from_tagged(&json!({"type": "no-such-type", "value": 1}))
            .unwrap_err();
        assert!(matches!(&err, CodecError::UnsupportedType(tag) if tag == "no-such-type"));
        assert!(err.to_string().contains("no-such-type"));
    }

    #[test]
    fn test_decode_as_wrong_type() {
        let registry = TypeRegistry::builtin();
        let err = registry
            .decode_as::<String>(&json!({"type": "integer", "value": 3}))
            .unwrap_err();
        assert!(matches!(err, CodecError::Unexpected { found: "i64", .. }));
    }

    #[test]
    fn test_type_set_follows_registrations() {
        let mut builder = TypeRegistryBuilder::with_builtins();
        let before = builder.type_set();
        builder.register::<Celsius>("celsius").unwrap();
        let registry = builder.build();

        let value = Value::new(Celsius(3.0));
        assert!(!before.contains(&value));
        assert!(before.contains(&Value::from(1i64)));
        assert!(registry.type_set().contains(&value));
        assert!(registry.type_set().contains_tag("celsius"));
        assert_eq!(registry.type_set().len(), 9);
    }

    #[test]
    fn test_context_lookup() {
        let mut builder = TypeRegistryBuilder::with_builtins();
        builder.with_context(Arc::new(Celsius(-40.0)));
        let registry = builder.build();
        assert_eq!(registry.context::<Celsius>(), Some(&Celsius(-40.0)));
        assert_eq!(registry.context::<String>(), None);
    }

    #[test]
    fn test_tags_sorted() {
        let registry = TypeRegistry::builtin();
        let tags = registry.tags();
        assert_eq!(tags.len(), 8);
        assert!(tags.windows(2).all(|w| w[0] < w[1]));
    }
}
