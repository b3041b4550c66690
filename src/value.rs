//! Dynamic value representation for policy parameters.
//!
//! A policy parameter holds exactly one of six kinds of data, either as a
//! single value or as a homogeneous array:
//!
//! - [`Kind::Bool`], [`Kind::Int`], [`Kind::Double`], [`Kind::String`]: scalars
//! - [`Kind::Policy`]: a nested [`Policy`]
//! - [`Kind::File`]: a [`PolicyFile`] reference to an external policy file
//!
//! [`Value`] is the single-or-array sum type and [`Array`] keeps one typed
//! vector per element kind, so a writer can dispatch over every case with an
//! exhaustive `match`.
//!
//! ## Examples
//!
//! ```rust
//! use policy_writer::{Array, Kind, Value};
//!
//! let port = Value::from(8080);
//! assert_eq!(port.kind(), Kind::Int);
//! assert!(!port.is_array());
//!
//! let hosts = Value::from(vec!["alpha", "beta"]);
//! assert_eq!(hosts.kind(), Kind::String);
//! assert_eq!(hosts.as_array().map(Array::len), Some(2));
//! ```

use crate::{Error, Policy, Result};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// The element kind of a policy parameter.
///
/// # Examples
///
/// ```rust
/// use policy_writer::Kind;
///
/// assert_eq!(Kind::Double.to_string(), "double");
/// assert_eq!(Kind::File.to_string(), "PolicyFile");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Double,
    String,
    Policy,
    File,
}

impl Kind {
    /// Returns the display name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Double => "double",
            Kind::String => "string",
            Kind::Policy => "Policy",
            Kind::File => "PolicyFile",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to an external file holding policy data.
///
/// Writers emit the path of the file, never its content.
///
/// # Examples
///
/// ```rust
/// use policy_writer::PolicyFile;
///
/// let file = PolicyFile::new("conf/defaults.paf");
/// assert_eq!(file.to_string(), "conf/defaults.paf");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PolicyFile {
    path: PathBuf,
}

impl PolicyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PolicyFile { path: path.into() }
    }

    /// Returns the referenced path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for PolicyFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl From<&str> for PolicyFile {
    fn from(path: &str) -> Self {
        PolicyFile::new(path)
    }
}

impl From<PathBuf> for PolicyFile {
    fn from(path: PathBuf) -> Self {
        PolicyFile { path }
    }
}

/// Newtype name marking a file reference, so the policy serializer can keep
/// it apart from a plain string. Other serializers see the path string.
pub(crate) const FILE_TOKEN: &str = "$policy_writer::PolicyFile";

impl Serialize for PolicyFile {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_newtype_struct(FILE_TOKEN, &self.path.display().to_string())
    }
}

/// A homogeneous, ordered sequence of policy values.
///
/// There is one variant per element [`Kind`]; mixed arrays cannot be built.
/// Use [`Array::from_values`] to assemble one from loosely typed [`Value`]s.
#[derive(Clone, Debug, PartialEq)]
pub enum Array {
    Bool(Vec<bool>),
    Int(Vec<i64>),
    Double(Vec<f64>),
    String(Vec<String>),
    Policy(Vec<Policy>),
    File(Vec<PolicyFile>),
}

impl Array {
    /// Builds a typed array from single values.
    ///
    /// The element kind is taken from the first value; every following value
    /// must have the same kind. Nested arrays are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] when a value's kind differs from the
    /// first one, when a value is itself an array, or when `values` is empty
    /// (no element kind can be inferred).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use policy_writer::{Array, Error, Value};
    ///
    /// let ints = Array::from_values("ids", vec![Value::from(1), Value::from(2)]).unwrap();
    /// assert_eq!(ints, Array::Int(vec![1, 2]));
    ///
    /// let mixed = Array::from_values("ids", vec![Value::from(1), Value::from("two")]);
    /// assert!(matches!(mixed, Err(Error::TypeMismatch { .. })));
    /// ```
    pub fn from_values<I>(name: &str, values: I) -> Result<Array>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut iter = values.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| Error::type_mismatch_desc(name, "array element", "empty list"))?;
        let mut array = match first {
            Value::Array(_) => {
                return Err(Error::type_mismatch_desc(name, "single value", "array"));
            }
            scalar => scalar.into_array(),
        };
        for value in iter {
            if value.is_array() {
                return Err(Error::type_mismatch_desc(name, "single value", "array"));
            }
            array.append(name, value.into_array())?;
        }
        Ok(array)
    }

    /// Returns the element kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Array::Bool(_) => Kind::Bool,
            Array::Int(_) => Kind::Int,
            Array::Double(_) => Kind::Double,
            Array::String(_) => Kind::String,
            Array::Policy(_) => Kind::Policy,
            Array::File(_) => Kind::File,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Array::Bool(v) => v.len(),
            Array::Int(v) => v.len(),
            Array::Double(v) => v.len(),
            Array::String(v) => v.len(),
            Array::Policy(v) => v.len(),
            Array::File(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves all elements of `other` to the end of this array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the element kinds differ.
    pub fn append(&mut self, name: &str, other: Array) -> Result<()> {
        match (self, other) {
            (Array::Bool(a), Array::Bool(b)) => a.extend(b),
            (Array::Int(a), Array::Int(b)) => a.extend(b),
            (Array::Double(a), Array::Double(b)) => a.extend(b),
            (Array::String(a), Array::String(b)) => a.extend(b),
            (Array::Policy(a), Array::Policy(b)) => a.extend(b),
            (Array::File(a), Array::File(b)) => a.extend(b),
            (this, other) => {
                return Err(Error::type_mismatch(name, this.kind(), other.kind()));
            }
        }
        Ok(())
    }
}

impl Serialize for Array {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        fn seq<S: Serializer, T: Serialize>(
            serializer: S,
            items: &[T],
        ) -> std::result::Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(items.len()))?;
            for item in items {
                seq.serialize_element(item)?;
            }
            seq.end()
        }

        match self {
            Array::Bool(v) => seq(serializer, v),
            Array::Int(v) => seq(serializer, v),
            Array::Double(v) => seq(serializer, v),
            Array::String(v) => seq(serializer, v),
            Array::Policy(v) => seq(serializer, v),
            Array::File(v) => seq(serializer, v),
        }
    }
}

/// A dynamically-typed policy parameter value.
///
/// # Examples
///
/// ```rust
/// use policy_writer::{Kind, Policy, Value};
///
/// let nested = Value::from(Policy::new());
/// assert_eq!(nested.kind(), Kind::Policy);
/// assert!(nested.as_policy().is_some());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Policy(Policy),
    File(PolicyFile),
    Array(Array),
}

impl Value {
    /// Returns the value's kind; for arrays, the element kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Double(_) => Kind::Double,
            Value::String(_) => Kind::String,
            Value::Policy(_) => Kind::Policy,
            Value::File(_) => Kind::File,
            Value::Array(a) => a.kind(),
        }
    }

    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_policy(&self) -> Option<&Policy> {
        match self {
            Value::Policy(p) => Some(p),
            _ => None,
        }
    }

    pub(crate) fn as_policy_mut(&mut self) -> Option<&mut Policy> {
        match self {
            Value::Policy(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_file(&self) -> Option<&PolicyFile> {
        match self {
            Value::File(f) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Converts a single value into a one-element array; arrays are returned as is.
    #[must_use]
    pub fn into_array(self) -> Array {
        match self {
            Value::Bool(b) => Array::Bool(vec![b]),
            Value::Int(i) => Array::Int(vec![i]),
            Value::Double(d) => Array::Double(vec![d]),
            Value::String(s) => Array::String(vec![s]),
            Value::Policy(p) => Array::Policy(vec![p]),
            Value::File(f) => Array::File(vec![f]),
            Value::Array(a) => a,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Double(d) => serializer.serialize_f64(*d),
            Value::String(s) => serializer.serialize_str(s),
            Value::Policy(p) => p.serialize(serializer),
            Value::File(f) => f.serialize(serializer),
            Value::Array(a) => a.serialize(serializer),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Double(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Policy> for Value {
    fn from(value: Policy) -> Self {
        Value::Policy(value)
    }
}

impl From<PolicyFile> for Value {
    fn from(value: PolicyFile) -> Self {
        Value::File(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl From<Vec<bool>> for Value {
    fn from(value: Vec<bool>) -> Self {
        Value::Array(Array::Bool(value))
    }
}

impl From<Vec<i32>> for Value {
    fn from(value: Vec<i32>) -> Self {
        Value::Array(Array::Int(value.into_iter().map(i64::from).collect()))
    }
}

impl From<Vec<i64>> for Value {
    fn from(value: Vec<i64>) -> Self {
        Value::Array(Array::Int(value))
    }
}

impl From<Vec<f64>> for Value {
    fn from(value: Vec<f64>) -> Self {
        Value::Array(Array::Double(value))
    }
}

impl From<Vec<&str>> for Value {
    fn from(value: Vec<&str>) -> Self {
        Value::Array(Array::String(
            value.into_iter().map(str::to_string).collect(),
        ))
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::Array(Array::String(value))
    }
}

impl From<Vec<Policy>> for Value {
    fn from(value: Vec<Policy>) -> Self {
        Value::Array(Array::Policy(value))
    }
}

impl From<Vec<PolicyFile>> for Value {
    fn from(value: Vec<PolicyFile>) -> Self {
        Value::Array(Array::File(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_kind_follows_first_value() {
        let array = Array::from_values(
            "flags",
            vec![Value::from(true), Value::from(false), Value::from(true)],
        )
        .unwrap();
        assert_eq!(array.kind(), Kind::Bool);
        assert_eq!(array, Array::Bool(vec![true, false, true]));
    }

    #[test]
    fn test_array_rejects_mixed_kinds() {
        let err = Array::from_values("x", vec![Value::from(1.5), Value::from(2)]).unwrap_err();
        match err {
            Error::TypeMismatch {
                name,
                expected,
                found,
            } => {
                assert_eq!(name, "x");
                assert_eq!(expected, "double");
                assert_eq!(found, "int");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_array_rejects_nested_arrays_and_empty_input() {
        let nested = Array::from_values("x", vec![Value::from(vec![1, 2])]);
        assert!(matches!(nested, Err(Error::TypeMismatch { .. })));

        let empty = Array::from_values("x", Vec::<Value>::new());
        assert!(matches!(empty, Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_append_keeps_order() {
        let mut array = Array::String(vec!["a".to_string()]);
        array
            .append("s", Array::String(vec!["b".to_string(), "c".to_string()]))
            .unwrap();
        assert_eq!(
            array,
            Array::String(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert!(array.append("s", Array::Int(vec![1])).is_err());
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::from(3).as_int(), Some(3));
        assert_eq!(Value::from(3).as_double(), None);
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(
            Value::from(PolicyFile::new("a.paf")).as_file().map(|f| f.path()),
            Some(Path::new("a.paf"))
        );
        assert_eq!(Value::from(vec![1.0, 2.0]).kind(), Kind::Double);
    }

    #[test]
    fn test_serialize_to_json() {
        let value = Value::from(vec![1, 2, 3]);
        assert_eq!(serde_json::to_string(&value).unwrap(), "[1,2,3]");

        let file = Value::from(PolicyFile::new("base.paf"));
        assert_eq!(serde_json::to_string(&file).unwrap(), "\"base.paf\"");
    }
}
