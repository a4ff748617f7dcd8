//! Decoder: dynamic value → typed value, driven by the destination's type.
//!
//! The walk is a recursive descent over the destination. Each step returns
//! `Ok(None)` when the dynamic value is null or undefined, meaning "leave the
//! destination untouched", and `Ok(Some(v))` with a freshly built value
//! otherwise. Nothing the caller owns is mutated until the whole walk has
//! succeeded.
//!
//! # Example
//! ```
//! use serde_json::json;
//! use vert_core::json::JsonRef;
//! use vert_core::{decode, StructType, Type, TypedValue};
//!
//! let small = StructType::builder("Small")
//!     .field("Tag", Type::String)
//!     .renamed("tag")
//!     .field("Field", Type::String)
//!     .build_type();
//!
//! let input = json!({"tag": "t1", "Field": "f1"});
//! let value = decode(&small, &JsonRef::new(&input)).unwrap().unwrap();
//! assert_eq!(value.field("Tag"), Some(&TypedValue::String("t1".into())));
//! assert_eq!(value.field("Field"), Some(&TypedValue::String("f1".into())));
//! ```

use crate::dynamic::{DynamicValue, KeyValue, TypeTag};
use crate::error::{Error, Result};
use crate::types::{FloatKind, IntKind, Kind, StructType, Type, UintKind};
use crate::value::{MapValue, TypedValue};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Decode `value` into a fresh value of type `target`.
///
/// Returns `Ok(None)` when `value` is null or undefined, for every target.
pub fn decode<V: DynamicValue>(target: &Type, value: &V) -> Result<Option<TypedValue>> {
    let tag = value.type_tag();
    trace!(ty = %target, %tag, "decode");
    let zero = target.zero();
    recover(tag, target.kind(), || assign(&zero, value)).inspect_err(|e| {
        debug!(ty = %target, error = %e, "decode failed");
    })
}

/// Decode `value` through the non-nil pointer `dst`.
///
/// The pointee's current contents steer the walk (an interface that holds a
/// value is decoded as that value's type; existing pointers are reused). On
/// error `dst` is left as it was. A null or undefined `value` leaves it
/// untouched as well.
pub fn decode_into<V: DynamicValue>(dst: &mut TypedValue, value: &V) -> Result<()> {
    if !matches!(dst, TypedValue::Pointer { target: Some(_), .. }) {
        return Err(Error::InvalidTarget { kind: dst.kind() });
    }
    let tag = value.type_tag();
    trace!(ty = %dst.type_of(), %tag, "decode into");
    let decoded = recover(tag, dst.kind(), || assign(dst, value)).inspect_err(|e| {
        debug!(error = %e, "decode into failed");
    })?;
    if let Some(v) = decoded {
        *dst = v;
    }
    Ok(())
}

/// Runs a walk, turning a panic raised by the host collaborator into a
/// [`Error::Fault`] carrying the root tag and kind.
fn recover<T>(tag: TypeTag, kind: Kind, walk: impl FnOnce() -> Result<T>) -> Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(walk)) {
        Ok(result) => result,
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            warn!(%tag, %kind, %reason, "recovered panic during decode");
            Err(Error::fault(tag, kind, format!("unexpected panic: {reason}")))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Recursively decode `jv` against the destination `dst`.
pub(crate) fn assign<V: DynamicValue>(dst: &TypedValue, jv: &V) -> Result<Option<TypedValue>> {
    if jv.is_null_or_undefined() {
        return Ok(None);
    }

    match dst {
        TypedValue::Pointer { elem, target } => return assign_pointer(elem, target.as_deref(), jv),
        TypedValue::Interface(Some(held)) => return assign_interface(held, jv),
        _ => {}
    }

    match jv.type_tag() {
        tag @ (TypeTag::Boolean | TypeTag::Number | TypeTag::String) => {
            assign_basic(dst, jv, tag).map(Some)
        }
        TypeTag::Object => assign_object(dst, jv),
        TypeTag::Array => assign_sequence(dst, jv),
        tag => Err(Error::mismatch(tag, dst.kind())),
    }
}

/// A nil pointer is allocated; the pointee is only overwritten when it
/// decodes to something.
fn assign_pointer<V: DynamicValue>(
    elem: &Type,
    target: Option<&TypedValue>,
    jv: &V,
) -> Result<Option<TypedValue>> {
    let pointee = match target {
        Some(existing) => existing.clone(),
        None => elem.zero(),
    };
    let value = assign(&pointee, jv)?.unwrap_or(pointee);
    Ok(Some(TypedValue::Pointer {
        elem: elem.clone(),
        target: Some(Box::new(value)),
    }))
}

/// An interface holding a value is decoded as the held value's type.
fn assign_interface<V: DynamicValue>(held: &TypedValue, jv: &V) -> Result<Option<TypedValue>> {
    let value = match assign(held, jv)? {
        Some(v) => v,
        None => held.clone(),
    };
    Ok(Some(TypedValue::interface(value)))
}

fn assign_basic<V: DynamicValue>(dst: &TypedValue, jv: &V, tag: TypeTag) -> Result<TypedValue> {
    let kind = dst.kind();
    match (tag, dst) {
        (TypeTag::Boolean, TypedValue::Bool(_)) => boolean(jv, kind).map(TypedValue::Bool),
        (TypeTag::Number, TypedValue::Int(k, _)) => {
            let i = integer(jv, kind)?;
            to_int(i, *k)
                .map(|i| TypedValue::Int(*k, i))
                .map_err(|reason| Error::fault(tag, kind, reason))
        }
        (TypeTag::Number, TypedValue::Uint(k, _)) => {
            let i = integer(jv, kind)?;
            to_uint(i, *k)
                .map(|u| TypedValue::Uint(*k, u))
                .map_err(|reason| Error::fault(tag, kind, reason))
        }
        (TypeTag::Number, TypedValue::Float(k, _)) => {
            let n = number(jv, kind)?;
            to_float(n, *k)
                .map(|f| TypedValue::Float(*k, f))
                .map_err(|reason| Error::fault(tag, kind, reason))
        }
        (TypeTag::String, TypedValue::String(_)) => string(jv, kind).map(TypedValue::String),
        // Nothing held, so the dynamic value's own type is the best guess.
        (_, TypedValue::Interface(None)) => {
            let value = match tag {
                TypeTag::Boolean => TypedValue::Bool(boolean(jv, kind)?),
                TypeTag::Number => TypedValue::Float(FloatKind::F64, number(jv, kind)?),
                _ => TypedValue::String(string(jv, kind)?),
            };
            Ok(TypedValue::interface(value))
        }
        _ => Err(Error::mismatch(tag, kind)),
    }
}

fn boolean<V: DynamicValue>(jv: &V, kind: Kind) -> Result<bool> {
    jv.as_bool()
        .ok_or_else(|| Error::fault(TypeTag::Boolean, kind, "host returned no boolean"))
}

fn number<V: DynamicValue>(jv: &V, kind: Kind) -> Result<f64> {
    jv.as_number()
        .ok_or_else(|| Error::fault(TypeTag::Number, kind, "host returned no number"))
}

fn string<V: DynamicValue>(jv: &V, kind: Kind) -> Result<String> {
    jv.as_string()
        .ok_or_else(|| Error::fault(TypeTag::String, kind, "host returned no string"))
}

/// The number as an integer: exact when the host keeps one, otherwise from
/// its `f64`, which must be finite and integral.
fn integer<V: DynamicValue>(jv: &V, kind: Kind) -> Result<i128> {
    if let Some(i) = jv.as_i64() {
        return Ok(i128::from(i));
    }
    if let Some(u) = jv.as_u64() {
        return Ok(i128::from(u));
    }
    let n = number(jv, kind)?;
    integral(n).map_err(|reason| Error::fault(TypeTag::Number, kind, reason))
}

fn integral(n: f64) -> std::result::Result<i128, String> {
    if !n.is_finite() {
        return Err(format!("{n} is not a finite number"));
    }
    if n.fract() != 0.0 {
        return Err(format!("{n} is not an integer"));
    }
    Ok(n as i128)
}

fn to_int(i: i128, kind: IntKind) -> std::result::Result<i64, String> {
    let (min, max) = match kind {
        IntKind::I8 => (i8::MIN as i128, i8::MAX as i128),
        IntKind::I16 => (i16::MIN as i128, i16::MAX as i128),
        IntKind::I32 => (i32::MIN as i128, i32::MAX as i128),
        IntKind::I64 => (i64::MIN as i128, i64::MAX as i128),
        IntKind::Isize => (isize::MIN as i128, isize::MAX as i128),
    };
    if i < min || i > max {
        return Err(format!("{i} overflows {}", Kind::from(kind)));
    }
    Ok(i as i64)
}

fn to_uint(i: i128, kind: UintKind) -> std::result::Result<u64, String> {
    let max = match kind {
        UintKind::U8 => u8::MAX as i128,
        UintKind::U16 => u16::MAX as i128,
        UintKind::U32 => u32::MAX as i128,
        UintKind::U64 => u64::MAX as i128,
        UintKind::Usize => usize::MAX as i128,
    };
    if i < 0 || i > max {
        return Err(format!("{i} overflows {}", Kind::from(kind)));
    }
    Ok(i as u64)
}

fn to_float(n: f64, kind: FloatKind) -> std::result::Result<f64, String> {
    match kind {
        FloatKind::F64 => Ok(n),
        FloatKind::F32 => {
            let narrowed = n as f32;
            if n.is_finite() && narrowed.is_infinite() {
                return Err(format!("{n} overflows f32"));
            }
            Ok(f64::from(narrowed))
        }
    }
}

fn assign_object<V: DynamicValue>(dst: &TypedValue, jv: &V) -> Result<Option<TypedValue>> {
    match dst {
        TypedValue::Struct { ty, .. } => assign_struct(ty, jv).map(Some),
        TypedValue::Map(m) => assign_map(m, jv).map(Some),
        other => Err(Error::mismatch(TypeTag::Object, other.kind())),
    }
}

/// Builds a fresh struct; exported fields are looked up by exposed name,
/// absent or null properties leave the field at its zero value.
fn assign_struct<V: DynamicValue>(ty: &Arc<StructType>, jv: &V) -> Result<TypedValue> {
    let mut fields: Vec<TypedValue> = ty.fields.iter().map(|f| f.ty.zero()).collect();
    for (field, slot) in ty.fields.iter().zip(fields.iter_mut()) {
        if !field.exported {
            continue;
        }
        let property = jv.get_property(field.exposed_name());
        if let Some(v) = assign(slot, &property)? {
            *slot = v;
        }
    }
    Ok(TypedValue::Struct {
        ty: Arc::clone(ty),
        fields,
    })
}

/// Keys are strings on the dynamic side; each is decoded as the declared key
/// type, so a key type that cannot come from a string fails. Entries whose
/// key or value decodes to nothing are skipped. A non-nil destination map
/// keeps its entries.
fn assign_map<V: DynamicValue>(m: &MapValue, jv: &V) -> Result<TypedValue> {
    let keys = jv.property_keys();
    let mut out = if m.is_nil() {
        MapValue::with_capacity(m.key.clone(), m.elem.clone(), keys.len())
    } else {
        m.clone()
    };
    let key_zero = m.key.zero();
    let elem_zero = m.elem.zero();
    for key in &keys {
        let Some(k) = assign(&key_zero, &KeyValue::Key(key))? else {
            continue;
        };
        let Some(v) = assign(&elem_zero, &jv.get_property(key))? else {
            continue;
        };
        out.insert(k, v);
    }
    Ok(TypedValue::Map(out))
}

fn assign_sequence<V: DynamicValue>(dst: &TypedValue, jv: &V) -> Result<Option<TypedValue>> {
    match dst {
        TypedValue::Slice { elem, items } => assign_slice(elem, items.as_deref(), jv).map(Some),
        TypedValue::Array { elem, items } => assign_array(elem, items, jv).map(Some),
        other => Err(Error::mismatch(TypeTag::Array, other.kind())),
    }
}

/// Appends every non-null element in order; a nil destination becomes a
/// fresh, non-nil slice even when the dynamic array is empty.
fn assign_slice<V: DynamicValue>(
    elem: &Type,
    existing: Option<&[TypedValue]>,
    jv: &V,
) -> Result<TypedValue> {
    let n = jv.length();
    let mut items = match existing {
        Some(items) => items.to_vec(),
        None => Vec::with_capacity(n),
    };
    let zero = elem.zero();
    for i in 0..n {
        if let Some(v) = assign(&zero, &jv.get_index(i))? {
            items.push(v);
        }
    }
    Ok(TypedValue::Slice {
        elem: elem.clone(),
        items: Some(items),
    })
}

/// Writes element `i` into position `i`; dynamic elements past the declared
/// length are ignored and null elements leave their position as it was.
fn assign_array<V: DynamicValue>(
    elem: &Type,
    existing: &[TypedValue],
    jv: &V,
) -> Result<TypedValue> {
    let mut items = existing.to_vec();
    let n = jv.length().min(items.len());
    let zero = elem.zero();
    for (i, slot) in items.iter_mut().enumerate().take(n) {
        if let Some(v) = assign(&zero, &jv.get_index(i))? {
            *slot = v;
        }
    }
    Ok(TypedValue::Array {
        elem: elem.clone(),
        items,
    })
}
