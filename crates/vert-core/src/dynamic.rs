//! The dynamic-value boundary.
//!
//! The converters never own a dynamic value representation. They read
//! through [`DynamicValue`] and build through [`Runtime`], both supplied by
//! the host: `serde_json` in-process (see [`crate::json`]) or a JS engine
//! through `vert-wasm`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime type tag of a dynamic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Symbol,
    Object,
    Array,
    Function,
    BigInt,
}

impl TypeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Undefined => "undefined",
            TypeTag::Null => "null",
            TypeTag::Boolean => "boolean",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Symbol => "symbol",
            TypeTag::Object => "object",
            TypeTag::Array => "array",
            TypeTag::Function => "function",
            TypeTag::BigInt => "bigint",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read access to a dynamic value.
///
/// Lookups return `Self` so hosts with handle semantics (JS values) and
/// borrowed trees (`&serde_json::Value`) fit the same walk. A missing
/// property or out-of-range index reads as undefined.
pub trait DynamicValue: Sized {
    fn type_tag(&self) -> TypeTag;

    fn is_null_or_undefined(&self) -> bool {
        matches!(self.type_tag(), TypeTag::Null | TypeTag::Undefined)
    }

    fn as_bool(&self) -> Option<bool>;

    fn as_number(&self) -> Option<f64>;

    /// The number as an exact signed integer, for hosts that keep one.
    /// Integer targets prefer this over [`as_number`](Self::as_number).
    fn as_i64(&self) -> Option<i64> {
        None
    }

    /// The number as an exact unsigned integer, for hosts that keep one.
    fn as_u64(&self) -> Option<u64> {
        None
    }

    fn as_string(&self) -> Option<String>;

    fn get_property(&self, name: &str) -> Self;

    /// Own enumerable property names of an object.
    fn property_keys(&self) -> Vec<String>;

    fn get_index(&self, index: usize) -> Self;

    /// Length of an array; 0 for anything else.
    fn length(&self) -> usize;
}

/// Construction side of a host runtime.
///
/// Holds what would otherwise be global singletons (null, the object and
/// array constructors), so the encoder takes it as an explicit context.
pub trait Runtime {
    type Value;

    fn null(&self) -> Self::Value;

    fn boolean(&self, b: bool) -> Self::Value;

    fn number(&self, n: f64) -> Self::Value;

    fn int(&self, i: i64) -> Self::Value {
        self.number(i as f64)
    }

    fn uint(&self, u: u64) -> Self::Value {
        self.number(u as f64)
    }

    fn string(&self, s: &str) -> Self::Value;

    fn new_object(&self) -> Self::Value;

    fn new_array(&self, len: usize) -> Self::Value;

    fn set_property(&self, object: &mut Self::Value, name: &str, value: Self::Value);

    fn set_index(&self, array: &mut Self::Value, index: usize, value: Self::Value);
}

/// A map key as seen by the decoder: keys are always strings on the
/// dynamic side, whatever the typed key type is.
#[derive(Debug, Clone, Copy)]
pub(crate) enum KeyValue<'a> {
    Key(&'a str),
    Undefined,
}

impl DynamicValue for KeyValue<'_> {
    fn type_tag(&self) -> TypeTag {
        match self {
            KeyValue::Key(_) => TypeTag::String,
            KeyValue::Undefined => TypeTag::Undefined,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        None
    }

    fn as_number(&self) -> Option<f64> {
        None
    }

    fn as_string(&self) -> Option<String> {
        match self {
            KeyValue::Key(k) => Some((*k).to_string()),
            KeyValue::Undefined => None,
        }
    }

    fn get_property(&self, _name: &str) -> Self {
        KeyValue::Undefined
    }

    fn property_keys(&self) -> Vec<String> {
        Vec::new()
    }

    fn get_index(&self, _index: usize) -> Self {
        KeyValue::Undefined
    }

    fn length(&self) -> usize {
        0
    }
}
