//! JS host for vert-core.
//!
//! Wraps `wasm_bindgen::JsValue` as a [`DynamicValue`] and builds new JS
//! values through [`JsRuntime`], so Rust code compiled to WASM can take
//! arbitrary JS values as typed Rust values and hand typed values back.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p vert-wasm --target wasm32-unknown-unknown --release
//! ```
//!
//! Errors cross the boundary as JS `Error` objects whose `detail` property
//! carries a JSON payload (`code`, `tag`, `kind`, `expected`, `actual`).

use js_sys::{Array, Object};
use serde::Serialize;
use vert_core::{DynamicValue, Error, Func, Kind, Reflect, Runtime, TypeTag, TypedValue};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// A JS value on the read side of the decoder.
#[derive(Debug, Clone)]
pub struct Value(JsValue);

impl Value {
    pub fn new(value: JsValue) -> Self {
        Value(value)
    }

    pub fn js_value(&self) -> &JsValue {
        &self.0
    }

    pub fn into_inner(self) -> JsValue {
        self.0
    }
}

impl From<JsValue> for Value {
    fn from(value: JsValue) -> Self {
        Value(value)
    }
}

impl DynamicValue for Value {
    fn type_tag(&self) -> TypeTag {
        let v = &self.0;
        if v.is_undefined() {
            TypeTag::Undefined
        } else if v.is_null() {
            TypeTag::Null
        } else if v.as_bool().is_some() {
            TypeTag::Boolean
        } else if v.as_f64().is_some() {
            TypeTag::Number
        } else if v.is_string() {
            TypeTag::String
        } else if v.is_symbol() {
            TypeTag::Symbol
        } else if v.is_bigint() {
            TypeTag::BigInt
        } else if v.is_function() {
            TypeTag::Function
        } else if Array::is_array(v) {
            TypeTag::Array
        } else {
            TypeTag::Object
        }
    }

    fn as_bool(&self) -> Option<bool> {
        self.0.as_bool()
    }

    fn as_number(&self) -> Option<f64> {
        self.0.as_f64()
    }

    fn as_string(&self) -> Option<String> {
        self.0.as_string()
    }

    fn get_property(&self, name: &str) -> Self {
        Value(js_sys::Reflect::get(&self.0, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED))
    }

    fn property_keys(&self) -> Vec<String> {
        match self.0.dyn_ref::<Object>() {
            Some(object) => Object::keys(object)
                .iter()
                .filter_map(|k| k.as_string())
                .collect(),
            None => Vec::new(),
        }
    }

    fn get_index(&self, index: usize) -> Self {
        let Ok(index) = u32::try_from(index) else {
            return Value(JsValue::UNDEFINED);
        };
        Value(js_sys::Reflect::get_u32(&self.0, index).unwrap_or(JsValue::UNDEFINED))
    }

    fn length(&self) -> usize {
        js_sys::Reflect::get(&self.0, &"length".into())
            .ok()
            .and_then(|v| v.as_f64())
            .map_or(0, |n| n as usize)
    }
}

/// Builds JS values for the encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsRuntime;

impl Runtime for JsRuntime {
    type Value = JsValue;

    fn null(&self) -> JsValue {
        JsValue::NULL
    }

    fn boolean(&self, b: bool) -> JsValue {
        JsValue::from_bool(b)
    }

    fn number(&self, n: f64) -> JsValue {
        JsValue::from_f64(n)
    }

    fn string(&self, s: &str) -> JsValue {
        JsValue::from_str(s)
    }

    fn new_object(&self) -> JsValue {
        Object::new().into()
    }

    fn new_array(&self, len: usize) -> JsValue {
        Array::new_with_length(len as u32).into()
    }

    fn set_property(&self, object: &mut JsValue, name: &str, value: JsValue) {
        // Reflect.set only fails on non-objects, and new_object always
        // hands out a plain object.
        let _ = js_sys::Reflect::set(object, &JsValue::from_str(name), &value);
    }

    fn set_index(&self, array: &mut JsValue, index: usize, value: JsValue) {
        let _ = js_sys::Reflect::set_u32(array, index as u32, &value);
    }
}

/// The tag the decoder sees for `value` (`"array"` for arrays, unlike
/// `typeof`).
#[wasm_bindgen(js_name = typeTag)]
pub fn type_tag(value: JsValue) -> String {
    Value(value).type_tag().to_string()
}

/// Decode a JS value as a `T`. `Ok(None)` for `null` or `undefined`.
pub fn decode<T: Reflect>(value: &JsValue) -> Result<Option<T>, JsValue> {
    vert_core::decode_as(&Value(value.clone())).map_err(|e| to_js_error(&e))
}

/// Encode a `T` as a fresh JS value.
pub fn encode<T: Reflect>(value: &T) -> JsValue {
    vert_core::encode_from(&JsRuntime, value)
}

/// Call `f` with the elements of a JS arguments array.
pub fn call(f: &Func, args: &Array) -> Result<Vec<TypedValue>, JsValue> {
    let args: Vec<Value> = args.iter().map(Value).collect();
    vert_core::invoke(f, &args).map_err(|e| to_js_error(&e))
}

/// Call `f` and encode every result as a JS value.
pub fn call_and_encode(f: &Func, args: &Array) -> Result<Array, JsValue> {
    let results = call(f, args)?;
    Ok(results
        .iter()
        .map(|r| vert_core::encode(&JsRuntime, r))
        .collect())
}

// ---------------------------------------------------------------------------
// Error payloads crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, PartialEq)]
struct ErrorDetail {
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<TypeTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<Kind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    actual: Option<String>,
}

impl From<&Error> for ErrorDetail {
    fn from(err: &Error) -> Self {
        let detail = |code| ErrorDetail {
            code,
            tag: None,
            kind: None,
            expected: None,
            actual: None,
        };
        match err {
            Error::KindMismatch { tag, kind } => ErrorDetail {
                tag: Some(*tag),
                kind: Some(*kind),
                ..detail("kind_mismatch")
            },
            Error::InvalidTarget { kind } => ErrorDetail {
                kind: Some(*kind),
                ..detail("invalid_target")
            },
            Error::Arity { expected, actual } => ErrorDetail {
                expected: Some(expected.to_string()),
                actual: Some(actual.to_string()),
                ..detail("arity")
            },
            Error::Fault { tag, kind, .. } => ErrorDetail {
                tag: Some(*tag),
                kind: Some(*kind),
                ..detail("fault")
            },
            Error::Conversion { expected, actual } => ErrorDetail {
                expected: Some(expected.to_string()),
                actual: Some(actual.to_string()),
                ..detail("conversion")
            },
        }
    }
}

/// Convert an error into a JS `Error` with a JSON `detail` payload.
pub fn to_js_error(err: &Error) -> JsValue {
    let error = js_sys::Error::new(&err.to_string());
    if let Ok(json) = serde_json::to_string(&ErrorDetail::from(err)) {
        if let Ok(detail) = js_sys::JSON::parse(&json) {
            let _ = js_sys::Reflect::set(&error, &"detail".into(), &detail);
        }
    }
    error.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_mismatch_detail() {
        let err = Error::KindMismatch {
            tag: TypeTag::Boolean,
            kind: Kind::I64,
        };
        let detail = serde_json::to_value(ErrorDetail::from(&err)).unwrap();
        assert_eq!(
            detail,
            json!({"code": "kind_mismatch", "tag": "boolean", "kind": "i64"})
        );
    }

    #[test]
    fn arity_detail() {
        let err = Error::Arity {
            expected: 2,
            actual: 1,
        };
        let detail = serde_json::to_value(ErrorDetail::from(&err)).unwrap();
        assert_eq!(
            detail,
            json!({"code": "arity", "expected": "2", "actual": "1"})
        );
    }

    #[test]
    fn fault_detail_drops_reason() {
        let err = Error::Fault {
            tag: TypeTag::Number,
            kind: Kind::U8,
            reason: "300 overflows u8".into(),
        };
        let detail = serde_json::to_value(ErrorDetail::from(&err)).unwrap();
        assert_eq!(
            detail,
            json!({"code": "fault", "tag": "number", "kind": "u8"})
        );
    }
}
