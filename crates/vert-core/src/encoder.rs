//! Encoder: typed value → dynamic value.
//!
//! Encoding walks the value's own runtime shape and cannot fail. Nil
//! pointers, interfaces, maps, and slices become the host's null; empty but
//! non-nil maps and slices become empty objects and arrays. Struct fields use
//! the same exposed names the decoder reads, and unexported fields are never
//! written.
//!
//! # Example
//! ```
//! use serde_json::json;
//! use vert_core::json::JsonRuntime;
//! use vert_core::{encode, Type, TypedValue};
//!
//! let items = TypedValue::Slice {
//!     elem: Type::String,
//!     items: Some(vec![TypedValue::String("a".into())]),
//! };
//! assert_eq!(encode(&JsonRuntime, &items), json!(["a"]));
//! ```

use crate::dynamic::Runtime;
use crate::types::StructType;
use crate::value::{MapValue, TypedValue};
use std::sync::Arc;
use tracing::trace;

/// Encode `value` into a fresh dynamic value built by `rt`.
pub fn encode<R: Runtime>(rt: &R, value: &TypedValue) -> R::Value {
    trace!(ty = %value.type_of(), "encode");
    value_of(rt, value)
}

fn value_of<R: Runtime>(rt: &R, value: &TypedValue) -> R::Value {
    match value {
        TypedValue::Pointer { target, .. } => pointer_or_interface(rt, target.as_deref()),
        TypedValue::Interface(held) => pointer_or_interface(rt, held.as_deref()),
        TypedValue::Slice { items, .. } => match items {
            Some(items) => sequence(rt, items),
            None => rt.null(),
        },
        TypedValue::Array { items, .. } => sequence(rt, items),
        TypedValue::Map(m) => map(rt, m),
        TypedValue::Struct { ty, fields } => structure(rt, ty, fields),
        TypedValue::Bool(b) => rt.boolean(*b),
        TypedValue::Int(_, i) => rt.int(*i),
        TypedValue::Uint(_, u) => rt.uint(*u),
        TypedValue::Float(_, f) => rt.number(*f),
        TypedValue::String(s) => rt.string(s),
    }
}

fn pointer_or_interface<R: Runtime>(rt: &R, inner: Option<&TypedValue>) -> R::Value {
    match inner {
        Some(v) => value_of(rt, v),
        None => rt.null(),
    }
}

/// A new array of the same length, elements in order.
fn sequence<R: Runtime>(rt: &R, items: &[TypedValue]) -> R::Value {
    let mut array = rt.new_array(items.len());
    for (i, item) in items.iter().enumerate() {
        let element = value_of(rt, item);
        rt.set_index(&mut array, i, element);
    }
    array
}

/// A new object keyed by each entry's string representation.
fn map<R: Runtime>(rt: &R, m: &MapValue) -> R::Value {
    if m.is_nil() {
        return rt.null();
    }
    let mut object = rt.new_object();
    for (k, v) in m.iter() {
        let property = value_of(rt, v);
        rt.set_property(&mut object, &k.key_string(), property);
    }
    object
}

fn structure<R: Runtime>(rt: &R, ty: &Arc<StructType>, fields: &[TypedValue]) -> R::Value {
    let mut object = rt.new_object();
    for (field, value) in ty.fields.iter().zip(fields) {
        if !field.exported {
            continue;
        }
        let property = value_of(rt, value);
        rt.set_property(&mut object, field.exposed_name(), property);
    }
    object
}
