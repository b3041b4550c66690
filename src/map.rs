//! Ordered map type backing a [`Policy`](crate::Policy) level.
//!
//! [`PolicyMap`] wraps [`IndexMap`] so parameters are iterated in insertion
//! order. Writers walk a policy in this order, which makes output stable
//! across runs and lets tests compare text directly.
//!
//! ## Examples
//!
//! ```rust
//! use policy_writer::{PolicyMap, Value};
//!
//! let mut map = PolicyMap::new();
//! map.insert("name".to_string(), Value::from("camera"));
//! map.insert("binning".to_string(), Value::from(2));
//!
//! let keys: Vec<_> = map.keys().cloned().collect();
//! assert_eq!(keys, vec!["name", "binning"]);
//! ```

use indexmap::IndexMap;

use crate::Value;

/// An insertion-ordered map of parameter names to values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolicyMap(IndexMap<String, Value>);

impl PolicyMap {
    #[must_use]
    pub fn new() -> Self {
        PolicyMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        PolicyMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// An existing key keeps its position and the old value is returned.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl IntoIterator for PolicyMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PolicyMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for PolicyMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        PolicyMap(IndexMap::from_iter(iter))
    }
}
