//! Heterogeneous containers
//!
//! The container itself is tagged (`list`, `set`, `map`, `optional`) and every
//! element carries its own envelope, since elements may be of any registered
//! type. Statically typed `Vec<T>` and `Option<T>` skip the element tags: the
//! element type is known from context.

use serde_json::Value as Json;

use crate::{CodecError, JsonCodec, TypeRegistry, Value};

const KEY: &str = "key";
const VALUE: &str = "value";

/// Ordered list of mixed values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueList(Vec<Value>);

impl ValueList {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

impl FromIterator<Value> for ValueList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl JsonCodec for ValueList {
    fn to_json(&self, registry: &TypeRegistry) -> Result<Json, CodecError> {
        encode_all(&self.0, registry)
    }

    fn from_json(json: &Json, registry: &TypeRegistry) -> Result<Self, CodecError> {
        decode_all(json, registry).map(Self)
    }
}

/// Unordered collection of distinct values
///
/// Insertion order is kept for output; equality ignores it.
#[derive(Debug, Clone, Default)]
pub struct ValueSet(Vec<Value>);

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value`; returns `false` if an equal value was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        if self.contains(&value) {
            return false;
        }
        self.0.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.contains(value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|value| other.contains(value))
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl JsonCodec for ValueSet {
    fn to_json(&self, registry: &TypeRegistry) -> Result<Json, CodecError> {
        encode_all(&self.0, registry)
    }

    fn from_json(json: &Json, registry: &TypeRegistry) -> Result<Self, CodecError> {
        decode_all(json, registry).map(|values| values.into_iter().collect())
    }
}

/// Map with keys of any registered type
///
/// Written as an array of `{"key", "value"}` pairs because keys need not be
/// strings.
#[derive(Debug, Clone, Default)]
pub struct ValueMap(Vec<(Value, Value)>);

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; returns the previous value for `key`.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.0.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for ValueMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl FromIterator<(Value, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl JsonCodec for ValueMap {
    fn to_json(&self, registry: &TypeRegistry) -> Result<Json, CodecError> {
        self.0
            .iter()
            .map(|(key, value)| {
                let mut entry = serde_json::Map::with_capacity(2);
                entry.insert(KEY.to_string(), registry.to_tagged(key)?);
                entry.insert(VALUE.to_string(), registry.to_tagged(value)?);
                Ok(Json::Object(entry))
            })
            .collect::<Result<Vec<_>, CodecError>>()
            .map(Json::Array)
    }

    fn from_json(json: &Json, registry: &TypeRegistry) -> Result<Self, CodecError> {
        let entries = json
            .as_array()
            .ok_or_else(|| CodecError::unexpected("array of map entries", json))?;
        entries
            .iter()
            .map(|entry| -> Result<(Value, Value), CodecError> {
                let entry = entry
                    .as_object()
                    .ok_or_else(|| CodecError::unexpected("map entry object", entry))?;
                let key = entry.get(KEY).ok_or(CodecError::MissingProperty(KEY))?;
                let value = entry.get(VALUE).ok_or(CodecError::MissingProperty(VALUE))?;
                Ok((registry.from_tagged(key)?, registry.from_tagged(value)?))
            })
            .collect()
    }
}

/// Possibly absent value of any registered type
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Optional(pub Option<Value>);

impl JsonCodec for Optional {
    fn to_json(&self, registry: &TypeRegistry) -> Result<Json, CodecError> {
        registry.to_tagged_opt(self.0.as_ref())
    }

    fn from_json(json: &Json, registry: &TypeRegistry) -> Result<Self, CodecError> {
        registry.from_tagged_opt(json).map(Optional)
    }
}

crate::impl_typed!(ValueList, ValueSet, ValueMap, Optional);

// Context-typed containers: elements are written untagged.

impl<T: JsonCodec> JsonCodec for Vec<T> {
    fn to_json(&self, registry: &TypeRegistry) -> Result<Json, CodecError> {
        self.iter()
            .map(|item| item.to_json(registry))
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array)
    }

    fn from_json(json: &Json, registry: &TypeRegistry) -> Result<Self, CodecError> {
        json.as_array()
            .ok_or_else(|| CodecError::unexpected("array", json))?
            .iter()
            .map(|item| T::from_json(item, registry))
            .collect()
    }
}

impl<T: JsonCodec> JsonCodec for Option<T> {
    fn to_json(&self, registry: &TypeRegistry) -> Result<Json, CodecError> {
        self.as_ref().map_or(Ok(Json::Null), |item| item.to_json(registry))
    }

    fn from_json(json: &Json, registry: &TypeRegistry) -> Result<Self, CodecError> {
        if json.is_null() {
            return Ok(None);
        }
        T::from_json(json, registry).map(Some)
    }
}

fn encode_all(values: &[Value], registry: &TypeRegistry) -> Result<Json, CodecError> {
    values
        .iter()
        .map(|value| registry.to_tagged(value))
        .collect::<Result<Vec<_>, _>>()
        .map(Json::Array)
}

fn decode_all(json: &Json, registry: &TypeRegistry) -> Result<Vec<Value>, CodecError> {
    json.as_array()
        .ok_or_else(|| CodecError::unexpected("array", json))?
        .iter()
        .map(|item| registry.from_tagged(item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mixed_list_tags_each_element() {
        let registry = TypeRegistry::builtin();
        let list = ValueList::new(vec![Value::from("a"), Value::from(2i64), Value::from(true)]);
        let json = registry.to_tagged(&Value::new(list.clone())).unwrap();
        assert_eq!(
            json,
            json!({"type": "list", "value": [
                {"type": "string", "value": "a"},
                {"type": "integer", "value": 2},
                {"type": "boolean", "value": true},
            ]})
        );
        assert_eq!(registry.decode_as::<ValueList>(&json).unwrap(), list);
    }

    #[test]
    fn test_set_dedups_and_ignores_order() {
        let a: ValueSet = [Value::from(1i64), Value::from(2i64), Value::from(1i64)]
            .into_iter()
            .collect();
        let b: ValueSet = [Value::from(2i64), Value::from(1i64)].into_iter().collect();
        assert_eq!(a.len(), 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_map_with_non_string_keys() {
        let registry = TypeRegistry::builtin();
        let map: ValueMap = [
            (Value::from(1i64), Value::from("one")),
            (Value::from(true), Value::from(2.5f64)),
        ]
        .into_iter()
        .collect();
        let json = map.to_json(&registry).unwrap();
        assert_eq!(
            json[0],
            json!({"key": {"type": "integer", "value": 1}, "value": {"type": "string", "value": "one"}})
        );
        assert_eq!(ValueMap::from_json(&json, &registry).unwrap(), map);
    }

    #[test]
    fn test_map_insert_replaces() {
        let mut map = ValueMap::new();
        assert_eq!(map.insert(Value::from("k"), Value::from(1i64)), None);
        assert_eq!(map.insert(Value::from("k"), Value::from(2i64)), Some(Value::from(1i64)));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&Value::from("k")), Some(&Value::from(2i64)));
    }

    #[test]
    fn test_map_entry_missing_key() {
        let registry = TypeRegistry::builtin();
        let json = json!([{"value": {"type": "integer", "value": 1}}]);
        let err = ValueMap::from_json(&json, &registry).unwrap_err();
        assert!(matches!(err, CodecError::MissingProperty("key")));
    }

    #[test]
    fn test_optional() {
        let registry = TypeRegistry::builtin();
        let some = Optional(Some(Value::from("x")));
        let none = Optional(None);
        assert_eq!(
            some.to_json(&registry).unwrap(),
            json!({"type": "string", "value": "x"})
        );
        assert_eq!(none.to_json(&registry).unwrap(), Json::Null);
        let tagged = registry.to_tagged(&Value::new(none.clone())).unwrap();
        assert_eq!(registry.decode_as::<Optional>(&tagged).unwrap(), none);
    }

    #[test]
    fn test_typed_vec_is_untagged() {
        let registry = TypeRegistry::builtin();
        let values = vec!["a".to_string(), "b".to_string()];
        let json = values.to_json(&registry).unwrap();
        assert_eq!(json, json!(["a", "b"]));
        assert_eq!(Vec::<String>::from_json(&json, &registry).unwrap(), values);
    }

    #[test]
    fn test_nested_containers() {
        let registry = TypeRegistry::builtin();
        let inner = ValueList::new(vec![Value::from(1i64)]);
        let outer = ValueList::new(vec![Value::new(inner), Value::new(Optional(None))]);
        let json = registry.to_tagged(&Value::new(outer.clone())).unwrap();
        assert_eq!(registry.decode_as::<ValueList>(&json).unwrap(), outer);
    }
}
