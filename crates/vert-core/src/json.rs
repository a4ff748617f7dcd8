//! In-process host backed by `serde_json::Value`.
//!
//! JSON has no `undefined`; a missing property or out-of-range index reads
//! as [`TypeTag::Undefined`] so it decodes exactly like JS would. Integers
//! are read and written exactly, beyond the 2^53 an `f64` can hold. Numbers
//! that JSON cannot carry (NaN, infinities) are written as `null`.

use crate::dynamic::{DynamicValue, Runtime, TypeTag};
use serde_json::{Map, Number, Value};

/// A JSON node, or the absence of one (`undefined`).
#[derive(Debug, Clone, Copy)]
pub struct JsonRef<'a>(Option<&'a Value>);

impl<'a> JsonRef<'a> {
    pub fn new(value: &'a Value) -> Self {
        JsonRef(Some(value))
    }

    pub fn get(&self) -> Option<&'a Value> {
        self.0
    }
}

impl<'a> From<&'a Value> for JsonRef<'a> {
    fn from(value: &'a Value) -> Self {
        JsonRef::new(value)
    }
}

impl DynamicValue for JsonRef<'_> {
    fn type_tag(&self) -> TypeTag {
        match self.0 {
            None => TypeTag::Undefined,
            Some(Value::Null) => TypeTag::Null,
            Some(Value::Bool(_)) => TypeTag::Boolean,
            Some(Value::Number(_)) => TypeTag::Number,
            Some(Value::String(_)) => TypeTag::String,
            Some(Value::Array(_)) => TypeTag::Array,
            Some(Value::Object(_)) => TypeTag::Object,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        self.0.and_then(Value::as_bool)
    }

    fn as_number(&self) -> Option<f64> {
        self.0.and_then(Value::as_f64)
    }

    fn as_i64(&self) -> Option<i64> {
        self.0.and_then(Value::as_i64)
    }

    fn as_u64(&self) -> Option<u64> {
        self.0.and_then(Value::as_u64)
    }

    fn as_string(&self) -> Option<String> {
        self.0.and_then(Value::as_str).map(str::to_string)
    }

    fn get_property(&self, name: &str) -> Self {
        JsonRef(self.0.and_then(|v| v.as_object()).and_then(|m| m.get(name)))
    }

    fn property_keys(&self) -> Vec<String> {
        match self.0 {
            Some(Value::Object(m)) => m.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    fn get_index(&self, index: usize) -> Self {
        JsonRef(self.0.and_then(|v| v.as_array()).and_then(|a| a.get(index)))
    }

    fn length(&self) -> usize {
        match self.0 {
            Some(Value::Array(a)) => a.len(),
            _ => 0,
        }
    }
}

/// Builds `serde_json::Value` trees for the encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRuntime;

impl Runtime for JsonRuntime {
    type Value = Value;

    fn null(&self) -> Value {
        Value::Null
    }

    fn boolean(&self, b: bool) -> Value {
        Value::Bool(b)
    }

    fn number(&self, n: f64) -> Value {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }

    fn int(&self, i: i64) -> Value {
        Value::Number(Number::from(i))
    }

    fn uint(&self, u: u64) -> Value {
        Value::Number(Number::from(u))
    }

    fn string(&self, s: &str) -> Value {
        Value::String(s.to_string())
    }

    fn new_object(&self) -> Value {
        Value::Object(Map::new())
    }

    fn new_array(&self, len: usize) -> Value {
        Value::Array(vec![Value::Null; len])
    }

    fn set_property(&self, object: &mut Value, name: &str, value: Value) {
        if let Value::Object(m) = object {
            m.insert(name.to_string(), value);
        }
    }

    fn set_index(&self, array: &mut Value, index: usize, value: Value) {
        if let Value::Array(a) = array {
            if index >= a.len() {
                a.resize(index + 1, Value::Null);
            }
            a[index] = value;
        }
    }
}
