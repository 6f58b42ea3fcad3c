//! Substitution tables shared by the allocator and the transformer

use std::collections::{BTreeMap, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered literal-to-literal replacement table
///
/// Insertion order is kept: it is the tie-break when two keys have the same
/// length. Inserting an existing key keeps the first value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl SubstitutionMap {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key -> value`; returns `false` if `key` was already present
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value.into()));
        true
    }

    /// Value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&position| self.entries[position].1.as_str())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries ordered by key length, longest first; equal lengths keep
    /// insertion order.
    pub fn longest_first(&self) -> Vec<(&str, &str)> {
        let mut ordered: Vec<(&str, &str)> = self.iter().collect();
        ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        ordered
    }

    /// Table with keys and values swapped
    pub fn inverse(&self) -> SubstitutionMap {
        self.iter().map(|(k, v)| (v, k)).collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SubstitutionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = SubstitutionMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Placeholder-to-original table stored for one job
///
/// Serialized as a flat object `{ "<PERSON_0>": "John Smith", ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct UnmaskingMap(BTreeMap<String, String>);

impl UnmaskingMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the original text behind `placeholder`
    pub fn insert(&mut self, placeholder: impl Into<String>, original: impl Into<String>) {
        self.0.insert(placeholder.into(), original.into());
    }

    /// Original text for `placeholder`
    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.0.get(placeholder).map(String::as_str)
    }

    /// Number of placeholders
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no placeholder is recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Placeholders and originals, ordered by placeholder
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Table that restores originals from placeholders
    pub fn to_substitutions(&self) -> SubstitutionMap {
        self.iter().collect()
    }

    /// Table that replaces originals with their placeholders
    pub fn to_masking(&self) -> SubstitutionMap {
        self.iter().map(|(placeholder, original)| (original, placeholder)).collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UnmaskingMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
