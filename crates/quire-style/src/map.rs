//! Persistent style maps
//!
//! A [`StyleMap`] is an immutable, validated set of property values sorted by
//! property name. Edits return a new map sharing nothing mutable with the old
//! one; an edit that changes nothing returns the receiver itself, so callers
//! can detect no-ops with [`StyleMap::ptr_eq`].

use std::fmt;
use std::sync::Arc;

use quire_codec::{CodecError, TypeRegistry, Typed, Value};
use serde_json::Value as Json;

use crate::{PropertyName, PropertyRegistry, StyleError, StyleVisitor};

type Entry = (PropertyName, Value);

/// Sorted, validated property values
///
/// The empty map holds no allocation, so every empty map is the same value.
#[derive(Clone, Default)]
pub struct StyleMap {
    entries: Option<Arc<[Entry]>>,
}

impl StyleMap {
    pub const EMPTY: StyleMap = StyleMap { entries: None };

    pub fn empty() -> Self {
        Self::EMPTY
    }

    /// Validate and sort `entries`; a name given twice is an error.
    pub fn with<I>(entries: I) -> Result<Self, StyleError>
    where
        I: IntoIterator<Item = (PropertyName, Value)>,
    {
        let mut entries: Vec<Entry> = entries.into_iter().collect();
        for (name, value) in &entries {
            name.check(value)?;
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        if let Some(pair) = entries.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(StyleError::DuplicateProperty(pair[0].0.to_string()));
        }
        Ok(Self::from_sorted(entries))
    }

    fn from_sorted(entries: Vec<Entry>) -> Self {
        if entries.is_empty() {
            Self::EMPTY
        } else {
            Self {
                entries: Some(entries.into()),
            }
        }
    }

    fn entries(&self) -> &[Entry] {
        self.entries.as_deref().unwrap_or(&[])
    }

    fn position(&self, name: &str) -> Result<usize, usize> {
        self.entries()
            .binary_search_by(|(property, _)| property.as_str().cmp(name))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = self.position(name).ok()?;
        Some(&self.entries()[index].1)
    }

    /// Value of `name` if it holds a `T`
    pub fn get_as<T: Typed>(&self, name: &str) -> Option<&T> {
        self.get(name)?.downcast_ref::<T>()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_ok()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_none()
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&PropertyName, &Value)> {
        self.entries().iter().map(|(name, value)| (name, value))
    }

    pub fn names(&self) -> impl Iterator<Item = &PropertyName> {
        self.entries().iter().map(|(name, _)| name)
    }

    /// Map with `name` bound to `value`
    ///
    /// Returns the receiver itself when `name` already holds an equal value.
    pub fn set(&self, name: &PropertyName, value: Value) -> Result<Self, StyleError> {
        name.check(&value)?;
        let position = self.position(name.as_str());
        if let Ok(index) = position {
            if self.entries()[index].1 == value {
                return Ok(self.clone());
            }
        }
        let mut entries = self.entries().to_vec();
        match position {
            Ok(index) => entries[index].1 = value,
            Err(index) => entries.insert(index, (name.clone(), value)),
        }
        Ok(Self::from_sorted(entries))
    }

    /// Apply several [`set`](Self::set)s in order.
    pub fn set_all<I>(&self, entries: I) -> Result<Self, StyleError>
    where
        I: IntoIterator<Item = (PropertyName, Value)>,
    {
        entries
            .into_iter()
            .try_fold(self.clone(), |map, (name, value)| map.set(&name, value))
    }

    /// Map without `name`; the receiver itself if `name` is absent
    pub fn remove(&self, name: &str) -> Self {
        let Ok(index) = self.position(name) else {
            return self.clone();
        };
        let mut entries = self.entries().to_vec();
        entries.remove(index);
        Self::from_sorted(entries)
    }

    /// Union of both maps; where both define a property, the receiver's value wins.
    pub fn merge(&self, other: &StyleMap) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }

        let (ours, theirs) = (self.entries(), other.entries());
        let mut merged = Vec::with_capacity(ours.len() + theirs.len());
        let (mut i, mut j) = (0, 0);
        while i < ours.len() && j < theirs.len() {
            match ours[i].0.cmp(&theirs[j].0) {
                std::cmp::Ordering::Less => {
                    merged.push(ours[i].clone());
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    merged.push(theirs[j].clone());
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    merged.push(ours[i].clone());
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&ours[i..]);
        merged.extend_from_slice(&theirs[j..]);

        if merged.len() == ours.len() {
            return self.clone();
        }
        Self::from_sorted(merged)
    }

    /// Same storage; all empty maps are identical
    pub fn ptr_eq(a: &StyleMap, b: &StyleMap) -> bool {
        match (&a.entries, &b.entries) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Feed every entry, in name order, to `visitor`.
    pub fn accept<V: StyleVisitor + ?Sized>(&self, visitor: &mut V) {
        for (name, value) in self.iter() {
            name.dispatch(value, visitor);
        }
    }

    /// JSON object keyed by property name, values untagged
    pub fn to_json(&self, types: &TypeRegistry) -> Result<Json, StyleError> {
        let mut object = serde_json::Map::with_capacity(self.len());
        for (name, value) in self.iter() {
            object.insert(name.to_string(), name.to_json(value, types)?);
        }
        Ok(Json::Object(object))
    }

    pub fn from_json(
        json: &Json,
        properties: &PropertyRegistry,
        types: &TypeRegistry,
    ) -> Result<Self, StyleError> {
        let object = json
            .as_object()
            .ok_or_else(|| CodecError::unexpected("style object", json))?;
        let entries = object
            .iter()
            .map(|(name, json)| -> Result<Entry, StyleError> {
                let property = properties.resolve(name)?;
                let value = property.from_json(json, types)?;
                Ok((property, value))
            })
            .collect::<Result<Vec<_>, StyleError>>()?;
        Self::with(entries)
    }
}

impl PartialEq for StyleMap {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || self.entries() == other.entries()
    }
}

impl fmt::Debug for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
