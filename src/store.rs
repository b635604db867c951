//! In-memory property store and merge policy
//!
//! A `PropertyStore` is the multi-valued text tag map a single operation
//! works with: it is produced fresh from a file read, returned to the caller
//! or merged and discarded after a write, and never cached across calls.
//!
//! Merge rule: for every key named by the incoming store, the incoming value
//! sequence replaces the existing one wholesale. Keys the incoming store does
//! not mention are kept unchanged. An empty incoming sequence deletes the key.

use crate::error::{Result, TagbridgeError};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Normalized, non-empty, uppercase tag key (e.g. `ARTIST`, `ALBUMARTIST`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyKey(String);

impl PropertyKey {
    /// Normalize a raw key. Whitespace is trimmed and the key is uppercased;
    /// an empty key is rejected.
    pub fn new(key: impl AsRef<str>) -> Result<Self> {
        let trimmed = key.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TagbridgeError::invalid_argument(
                "property key must not be empty",
            ));
        }
        Ok(PropertyKey(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for PropertyKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PropertyKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        PropertyKey::new(raw).map_err(D::Error::custom)
    }
}

/// Multi-valued text tag map, keyed by normalized uppercase keys
///
/// Value order within a key is preserved; key iteration order is an
/// implementation detail callers must not rely on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyStore {
    entries: BTreeMap<PropertyKey, Vec<String>>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Replace the whole value sequence for a key
    pub fn set(&mut self, key: PropertyKey, values: Vec<String>) {
        self.entries.insert(key, values);
    }

    /// Append a single value to a key, creating the key if needed
    pub fn push(&mut self, key: PropertyKey, value: impl Into<String>) {
        self.entries.entry(key).or_default().push(value.into());
    }

    pub fn get(&self, key: &PropertyKey) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &PropertyKey) -> Option<Vec<String>> {
        self.entries.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyKey, &[String])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &PropertyKey> {
        self.entries.keys()
    }
}

/// Merge `incoming` over `existing`.
///
/// Every key named by `incoming` wins entirely: its value sequence replaces
/// whatever `existing` held, regardless of relative lengths. An empty
/// incoming sequence deletes the key. Keys absent from `incoming` are kept.
pub fn merge(existing: PropertyStore, incoming: PropertyStore) -> PropertyStore {
    let mut merged = existing;
    for (key, values) in incoming.entries {
        if values.is_empty() {
            merged.entries.remove(&key);
        } else {
            merged.entries.insert(key, values);
        }
    }
    merged
}
