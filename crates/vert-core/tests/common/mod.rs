//! Shared helpers for the integration tests.

#![allow(dead_code)]

use serde_json::Value;
use vert_core::json::JsonRef;
use vert_core::{decode, Result, Type, TypedValue};

/// Install a test-writer subscriber once; `RUST_LOG=vert_core=trace` shows
/// the decoder's events.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Decode a JSON fixture against `ty`.
pub fn decode_json(ty: &Type, json: &Value) -> Result<Option<TypedValue>> {
    decode(ty, &JsonRef::new(json))
}

pub fn string(s: &str) -> TypedValue {
    TypedValue::String(s.to_string())
}

/// The two-field struct used throughout: `Tag` is exposed as `tag`.
pub fn small_type() -> Type {
    vert_core::StructType::builder("Small")
        .field("Tag", Type::String)
        .renamed("tag")
        .field("Field", Type::String)
        .build_type()
}

pub fn small(tag: &str, field: &str) -> TypedValue {
    match small_type() {
        Type::Struct(ty) => TypedValue::Struct {
            ty,
            fields: vec![string(tag), string(field)],
        },
        _ => unreachable!(),
    }
}
