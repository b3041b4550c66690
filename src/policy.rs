//! The policy tree: named parameters holding [`Value`]s.
//!
//! A [`Policy`] is one level of the tree. Parameters can be addressed either
//! directly (`"binning"`) or through a hierarchical name that walks nested
//! policies (`"camera.binning"`). Writers only read a policy; the mutating
//! operations here exist to build one.
//!
//! ## Examples
//!
//! ```rust
//! use policy_writer::{Kind, Policy, Value};
//!
//! let mut policy = Policy::new();
//! policy.set("camera.name", "lsstcam").unwrap();
//! policy.set("camera.binning", 2).unwrap();
//! policy.add("filters", "g").unwrap();
//! policy.add("filters", "r").unwrap();
//!
//! assert_eq!(policy.get("camera.binning"), Some(&Value::from(2)));
//! assert_eq!(policy.kind_of("camera"), Some(Kind::Policy));
//! assert!(policy.is_array("filters"));
//! ```

use crate::{Error, Kind, PafOptions, PafWriter, PolicyMap, PolicyWriter, Result, Value};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Delimiter between the segments of a hierarchical name.
pub const NAME_DELIMITER: char = '.';

/// One level of a policy tree.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Policy {
    map: PolicyMap,
}

impl Policy {
    #[must_use]
    pub fn new() -> Self {
        Policy::default()
    }

    /// Wraps an existing map of top-level parameters.
    #[must_use]
    pub fn from_map(map: PolicyMap) -> Self {
        Policy { map }
    }

    /// Number of top-level parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over top-level parameters in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.map.iter()
    }

    #[must_use]
    pub fn as_map(&self) -> &PolicyMap {
        &self.map
    }

    /// Returns parameter names.
    ///
    /// With `top_level_only`, only the names of this level are returned.
    /// Otherwise nested policies are walked depth first and every parameter
    /// is listed by its full hierarchical name, each policy name directly
    /// followed by the names beneath it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use policy_writer::Policy;
    ///
    /// let mut policy = Policy::new();
    /// policy.set("a.b", 1).unwrap();
    /// policy.set("c", 2).unwrap();
    ///
    /// assert_eq!(policy.names(true), vec!["a", "c"]);
    /// assert_eq!(policy.names(false), vec!["a", "a.b", "c"]);
    /// ```
    #[must_use]
    pub fn names(&self, top_level_only: bool) -> Vec<String> {
        let mut names = Vec::with_capacity(self.map.len());
        self.collect_names("", top_level_only, &mut names);
        names
    }

    fn collect_names(&self, prefix: &str, top_level_only: bool, names: &mut Vec<String>) {
        for (key, value) in self.map.iter() {
            let full = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}{NAME_DELIMITER}{key}")
            };
            names.push(full.clone());
            if let Value::Policy(policy) = value {
                if !top_level_only {
                    policy.collect_names(&full, false, names);
                }
            }
        }
    }

    /// Looks up a parameter, following hierarchical names through nested policies.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        let segments = split_name(name).ok()?;
        let (leaf, parents) = segments.split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.map.get(segment)?.as_policy()?;
        }
        current.map.get(leaf)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the element kind stored under `name`.
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<Kind> {
        self.get(name).map(Value::kind)
    }

    /// Returns `true` if `name` holds an array value.
    #[must_use]
    pub fn is_array(&self, name: &str) -> bool {
        self.get(name).is_some_and(Value::is_array)
    }

    /// Sets a parameter, replacing any previous value.
    ///
    /// Missing intermediate policies of a hierarchical name are created.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] for an empty name or segment, and
    /// [`Error::TypeMismatch`] when an intermediate segment holds something
    /// other than a policy.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<Option<Value>> {
        let (parent, leaf) = self.parent_mut(name)?;
        Ok(parent.map.insert(leaf.to_string(), value.into()))
    }

    /// Appends a value to a parameter.
    ///
    /// A missing parameter is created; a single value is promoted to an
    /// array. Arrays in `value` are appended element by element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the kind of `value` differs from
    /// the kind already stored, plus the naming errors of [`Policy::set`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use policy_writer::{Error, Policy, Value};
    ///
    /// let mut policy = Policy::new();
    /// policy.add("ids", 1).unwrap();
    /// policy.add("ids", vec![2, 3]).unwrap();
    /// assert_eq!(policy.get("ids"), Some(&Value::from(vec![1, 2, 3])));
    ///
    /// assert!(matches!(policy.add("ids", "four"), Err(Error::TypeMismatch { .. })));
    /// ```
    pub fn add(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let (parent, leaf) = self.parent_mut(name)?;
        let Some(slot) = parent.map.get_mut(leaf) else {
            parent.map.insert(leaf.to_string(), value);
            return Ok(());
        };
        if slot.kind() != value.kind() {
            return Err(Error::type_mismatch(name, slot.kind(), value.kind()));
        }
        let mut array = std::mem::replace(slot, Value::Bool(false)).into_array();
        let appended = array.append(name, value.into_array());
        *slot = Value::Array(array);
        appended
    }

    /// Removes a parameter and returns its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let segments = split_name(name).ok()?;
        let (leaf, parents) = segments.split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.map.get_mut(segment)?.as_policy_mut()?;
        }
        current.map.remove(leaf)
    }

    fn parent_mut<'n>(&mut self, name: &'n str) -> Result<(&mut Policy, &'n str)> {
        let segments = split_name(name)?;
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(Error::invalid_name(name));
        };
        let mut current = self;
        for segment in parents {
            if !current.map.contains_key(segment) {
                current
                    .map
                    .insert((*segment).to_string(), Value::Policy(Policy::new()));
            }
            current = match current.map.get_mut(segment) {
                Some(Value::Policy(p)) => p,
                Some(other) => {
                    return Err(Error::type_mismatch(name, Kind::Policy, other.kind()));
                }
                None => return Err(Error::invalid_name(name)),
            };
        }
        Ok((current, *leaf))
    }
}

/// Splits a hierarchical name into its segments.
///
/// # Errors
///
/// Returns [`Error::InvalidName`] if the name or any segment is empty.
pub fn split_name(name: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = name.split(NAME_DELIMITER).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(Error::invalid_name(name));
    }
    Ok(segments)
}

impl FromIterator<(String, Value)> for Policy {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Policy {
            map: PolicyMap::from_iter(iter),
        }
    }
}

impl<'a> IntoIterator for &'a Policy {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

impl Serialize for Policy {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.map.len()))?;
        for (k, v) in self.map.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Renders the policy in PAF syntax.
///
/// Dotted keys are written as one token. A key that cannot be written at
/// all ends the output with a `#` comment line naming the error.
impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = PafOptions::new().with_hierarchical_names(true);
        let mut writer = PafWriter::with_options(Vec::new(), options);
        let written = writer.write(self, false);
        let bytes = writer.into_inner().unwrap_or_default();
        f.write_str(&String::from_utf8_lossy(&bytes))?;
        match written {
            Ok(()) => Ok(()),
            Err(err) => writeln!(f, "# {err}"),
        }
    }
}
