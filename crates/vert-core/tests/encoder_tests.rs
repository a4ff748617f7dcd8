mod common;

use common::{small, small_type, string};
use serde_json::json;
use vert_core::json::JsonRuntime;
use vert_core::{
    encode, FloatKind, IntKind, MapValue, StructType, Type, TypedValue, UintKind,
};

// ============================================================================
// Nil and empty
// ============================================================================

#[test]
fn nil_values_encode_as_null() {
    let nils = vec![
        Type::pointer(Type::String).zero(),
        Type::Interface.zero(),
        Type::map(Type::String, Type::Bool).zero(),
        Type::slice(Type::Bool).zero(),
    ];
    for v in &nils {
        assert_eq!(encode(&JsonRuntime, v), json!(null), "{v:?}");
    }
}

#[test]
fn empty_but_non_nil_collections_stay_empty() {
    let map = TypedValue::Map(MapValue::with_capacity(Type::String, Type::Bool, 0));
    assert_eq!(encode(&JsonRuntime, &map), json!({}));

    let slice = TypedValue::Slice {
        elem: Type::Bool,
        items: Some(Vec::new()),
    };
    assert_eq!(encode(&JsonRuntime, &slice), json!([]));

    let array = Type::array(0, Type::Bool).zero();
    assert_eq!(encode(&JsonRuntime, &array), json!([]));
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn scalars() {
    assert_eq!(encode(&JsonRuntime, &TypedValue::Bool(true)), json!(true));
    assert_eq!(
        encode(&JsonRuntime, &TypedValue::Int(IntKind::I16, -12)),
        json!(-12)
    );
    assert_eq!(
        encode(&JsonRuntime, &TypedValue::Uint(UintKind::U64, u64::MAX)),
        json!(u64::MAX)
    );
    assert_eq!(
        encode(&JsonRuntime, &TypedValue::Float(FloatKind::F64, 3.14)),
        json!(3.14)
    );
    assert_eq!(encode(&JsonRuntime, &string("s")), json!("s"));
}

#[test]
fn integers_stay_integers_in_json() {
    let v = encode(&JsonRuntime, &TypedValue::Int(IntKind::I64, 42));
    assert!(v.is_i64());
    assert_eq!(v.to_string(), "42");
}

#[test]
fn non_finite_floats_become_null_in_json() {
    let v = encode(&JsonRuntime, &TypedValue::Float(FloatKind::F64, f64::NAN));
    assert_eq!(v, json!(null));
    let v = encode(&JsonRuntime, &TypedValue::Float(FloatKind::F64, f64::INFINITY));
    assert_eq!(v, json!(null));
}

// ============================================================================
// Composites
// ============================================================================

#[test]
fn struct_uses_exposed_names() {
    assert_eq!(
        encode(&JsonRuntime, &small("t1", "f1")),
        json!({"tag": "t1", "Field": "f1"})
    );
}

#[test]
fn unexported_fields_are_never_written() {
    let ty = StructType::builder("Hidden")
        .field("Visible", Type::Bool)
        .field("secret", Type::String)
        .unexported()
        .build_type();
    let Type::Struct(st) = ty else {
        unreachable!()
    };
    let value = TypedValue::Struct {
        ty: st,
        fields: vec![TypedValue::Bool(true), string("hidden")],
    };
    assert_eq!(encode(&JsonRuntime, &value), json!({"Visible": true}));
}

#[test]
fn zero_struct_writes_every_exported_field() {
    assert_eq!(
        encode(&JsonRuntime, &small_type().zero()),
        json!({"tag": "", "Field": ""})
    );
}

#[test]
fn pointers_and_interfaces_encode_their_target() {
    let v = TypedValue::pointer_to(TypedValue::pointer_to(small("a", "b")));
    assert_eq!(encode(&JsonRuntime, &v), json!({"tag": "a", "Field": "b"}));

    let v = TypedValue::interface(TypedValue::Float(FloatKind::F64, 5.2));
    assert_eq!(encode(&JsonRuntime, &v), json!(5.2));
}

#[test]
fn nil_pointer_field_encodes_as_null_property() {
    let ty = StructType::builder("P")
        .field("Ptr", Type::pointer(Type::String))
        .build_type();
    assert_eq!(encode(&JsonRuntime, &ty.zero()), json!({"Ptr": null}));
}

#[test]
fn map_keys_use_their_string_form() {
    let mut m = MapValue::with_capacity(Type::Int(IntKind::I64), Type::String, 2);
    m.insert(TypedValue::Int(IntKind::I64, 17), string("seventeen"));
    m.insert(TypedValue::Int(IntKind::I64, -1), string("minus one"));
    assert_eq!(
        encode(&JsonRuntime, &TypedValue::Map(m)),
        json!({"17": "seventeen", "-1": "minus one"})
    );
}

#[test]
fn map_of_structs() {
    let mut m = MapValue::with_capacity(Type::String, small_type(), 1);
    m.insert(string("k"), small("t", "f"));
    assert_eq!(
        encode(&JsonRuntime, &TypedValue::Map(m)),
        json!({"k": {"tag": "t", "Field": "f"}})
    );
}

#[test]
fn sequences_keep_order_and_length() {
    let slice = TypedValue::Slice {
        elem: Type::pointer(Type::Bool),
        items: Some(vec![
            TypedValue::pointer_to(TypedValue::Bool(true)),
            Type::pointer(Type::Bool).zero(),
            TypedValue::pointer_to(TypedValue::Bool(false)),
        ]),
    };
    assert_eq!(encode(&JsonRuntime, &slice), json!([true, null, false]));

    let array = TypedValue::Array {
        elem: Type::Uint(UintKind::U8),
        items: vec![
            TypedValue::Uint(UintKind::U8, 1),
            TypedValue::Uint(UintKind::U8, 2),
        ],
    };
    assert_eq!(encode(&JsonRuntime, &array), json!([1, 2]));
}
