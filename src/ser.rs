//! Conversion of `Serialize` types into policies.
//!
//! [`to_policy`](crate::to_policy) runs any struct or string-keyed map
//! through [`ValueSerializer`] and returns the resulting [`Policy`], which
//! can then be written with any [`PolicyWriter`](crate::PolicyWriter).
//!
//! ## Mapping
//!
//! | Rust / serde                  | policy value                       |
//! |-------------------------------|------------------------------------|
//! | `bool`                        | `bool`                             |
//! | signed and unsigned integers  | `int` (`u64` above `i64::MAX` fails)|
//! | `f32`, `f64`                  | `double`                           |
//! | `char`, `&str`, `String`      | `string`                           |
//! | unit enum variant             | `string` holding the variant name  |
//! | struct, map (dotted keys nest)| nested `Policy`                    |
//! | sequence, tuple, bytes        | homogeneous array                  |
//! | [`PolicyFile`]                | `PolicyFile`                       |
//! | `None`, `()`, empty sequence  | parameter omitted                  |
//! | newtype/tuple/struct variant  | `Policy` with one entry per variant|
//!
//! ## Examples
//!
//! ```rust
//! use policy_writer::{to_policy, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Camera { name: String, binning: u32, serial: Option<String> }
//!
//! let camera = Camera { name: "lsstcam".into(), binning: 2, serial: None };
//! let policy = to_policy(&camera).unwrap();
//!
//! assert_eq!(policy.get("binning"), Some(&Value::from(2)));
//! assert!(!policy.contains("serial"));
//! ```

use crate::value::FILE_TOKEN;
use crate::{Array, Error, Policy, PolicyFile, PolicyMap, Result, Value};
use serde::{ser, Serialize};

/// A serde serializer producing policy [`Value`]s.
///
/// `Ok(None)` means "no value": the enclosing map or struct skips the entry.
/// `name` is the parameter being serialized and only feeds error messages.
pub struct ValueSerializer {
    name: String,
}

impl ValueSerializer {
    pub fn new(name: &str) -> Self {
        ValueSerializer {
            name: name.to_string(),
        }
    }
}

pub struct SerializeVec {
    name: String,
    vec: Vec<Value>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    name: String,
    policy: Policy,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Option<Value>;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Option<Value>> {
        Ok(Some(Value::Bool(v)))
    }

    fn serialize_i8(self, v: i8) -> Result<Option<Value>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Option<Value>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Option<Value>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Option<Value>> {
        Ok(Some(Value::Int(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Option<Value>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Option<Value>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Option<Value>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Option<Value>> {
        let v = i64::try_from(v).map_err(|_| {
            Error::custom(format!("integer {v} for '{}' does not fit an int", self.name))
        })?;
        Ok(Some(Value::Int(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Option<Value>> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Option<Value>> {
        Ok(Some(Value::Double(v)))
    }

    fn serialize_char(self, v: char) -> Result<Option<Value>> {
        Ok(Some(Value::String(v.to_string())))
    }

    fn serialize_str(self, v: &str) -> Result<Option<Value>> {
        Ok(Some(Value::String(v.to_string())))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Option<Value>> {
        if v.is_empty() {
            return Ok(None);
        }
        Ok(Some(Value::Array(Array::Int(
            v.iter().map(|&b| i64::from(b)).collect(),
        ))))
    }

    fn serialize_none(self) -> Result<Option<Value>> {
        Ok(None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Option<Value>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Option<Value>> {
        Ok(None)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Option<Value>> {
        Ok(None)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Option<Value>> {
        Ok(Some(Value::String(variant.to_string())))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Option<Value>>
    where
        T: ?Sized + Serialize,
    {
        let name_for_error = self.name.clone();
        match (name, value.serialize(self)?) {
            (FILE_TOKEN, Some(Value::String(path))) => Ok(Some(Value::File(PolicyFile::new(path)))),
            (FILE_TOKEN, _) => Err(Error::custom(format!(
                "file reference '{name_for_error}' must be a path"
            ))),
            (_, inner) => Ok(inner),
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Option<Value>>
    where
        T: ?Sized + Serialize,
    {
        let mut map = PolicyMap::new();
        if let Some(inner) = value.serialize(ValueSerializer::new(variant))? {
            map.insert(variant.to_string(), inner);
        }
        Ok(Some(Value::Policy(Policy::from_map(map))))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(self.name, len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(self.name, len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(self.name, len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(variant.to_string(), len, Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(self.name, None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(self.name, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(variant.to_string(), Some(variant)))
    }
}

impl SerializeVec {
    fn new(name: String, capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            name,
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match value.serialize(ValueSerializer::new(&self.name))? {
            Some(v) => {
                self.vec.push(v);
                Ok(())
            }
            None => Err(Error::custom(format!(
                "array '{}' cannot hold a missing value",
                self.name
            ))),
        }
    }

    /// An empty sequence has no element kind and is left out.
    fn finish(self) -> Result<Option<Value>> {
        if self.vec.is_empty() {
            return Ok(None);
        }
        let array = Value::Array(Array::from_values(&self.name, self.vec)?);
        wrap_variant(self.variant, array)
    }
}

impl SerializeMap {
    fn new(name: String, variant: Option<&'static str>) -> Self {
        SerializeMap {
            name,
            policy: Policy::new(),
            current_key: None,
            variant,
        }
    }

    /// Sets `key` unless the value serializes to nothing.
    ///
    /// A dotted key nests like [`Policy::set`], so `"a.b"` lands under `a`.
    fn insert<T>(&mut self, key: String, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if let Some(v) = value.serialize(ValueSerializer::new(&key))? {
            self.policy.set(&key, v)?;
        }
        Ok(())
    }

    fn finish(self) -> Result<Option<Value>> {
        wrap_variant(self.variant, Value::Policy(self.policy))
    }
}

fn wrap_variant(variant: Option<&'static str>, value: Value) -> Result<Option<Value>> {
    Ok(Some(match variant {
        None => value,
        Some(variant) => Value::Policy(Policy::from_iter([(variant.to_string(), value)])),
    }))
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match key.serialize(ValueSerializer::new(&self.name))? {
            Some(Value::String(s)) => {
                self.current_key = Some(s);
                Ok(())
            }
            _ => Err(Error::custom(format!(
                "keys of map '{}' must be strings",
                self.name
            ))),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}
