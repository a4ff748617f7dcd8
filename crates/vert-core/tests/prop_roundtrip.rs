/// Property-based roundtrip tests.
///
/// Generates native Rust values, encodes them to JSON and decodes them back,
/// checking `decode(encode(v)) == v`. Also checks that arbitrary JSON never
/// panics the decoder, whatever the target type.
///
/// Strategies stay inside what the bridge carries losslessly:
/// - finite floats only (NaN and infinities encode as null)
/// - no `None` inside maps or vectors (null entries are skipped on decode)
mod common;

use proptest::prelude::*;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use vert_core::json::{JsonRef, JsonRuntime};
use vert_core::{
    decode, decode_as, encode, encode_from, reflect_struct, FloatKind, IntKind, Type, UintKind,
};

#[derive(Debug, Clone, PartialEq)]
struct Record {
    name: String,
    count: i64,
    ratio: f64,
    small: u8,
    flags: Vec<bool>,
    tags: BTreeMap<String, i32>,
    parent: Option<String>,
    window: [u16; 2],
}

reflect_struct!(Record {
    name: String => "Name",
    count: i64,
    ratio: f64,
    small: u8,
    flags: Vec<bool>,
    tags: BTreeMap<String, i32>,
    parent: Option<String> => "Parent",
    window: [u16; 2],
});

// ============================================================================
// Strategies
// ============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,15}").unwrap()
}

fn arb_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,30}",
        Just(String::new()),
        Just("null".to_string()),
        Just("caf\u{00e9}".to_string()),
        Just("line1\nline2".to_string()),
    ]
}

/// Full-range integers, weighted towards the edges where an `f64` stops
/// being exact.
fn arb_int() -> impl Strategy<Value = i64> {
    prop_oneof![
        any::<i64>(),
        Just(i64::MIN),
        Just(i64::MAX),
        (-1_000i64..1_000).prop_map(|d| (1i64 << 53) + d),
        (-1_000i64..1_000).prop_map(|d| -(1i64 << 53) + d),
    ]
}

fn arb_finite_float() -> impl Strategy<Value = f64> {
    prop::num::f64::NORMAL | prop::num::f64::ZERO
}

fn arb_record() -> impl Strategy<Value = Record> {
    (
        arb_string(),
        arb_int(),
        arb_finite_float(),
        any::<u8>(),
        prop::collection::vec(any::<bool>(), 0..8),
        prop::collection::btree_map(arb_key(), any::<i32>(), 0..6),
        prop::option::of(arb_string()),
        any::<[u16; 2]>(),
    )
        .prop_map(
            |(name, count, ratio, small, flags, tags, parent, window)| Record {
                name,
                count,
                ratio,
                small,
                flags,
                tags,
                parent,
                window,
            },
        )
}

/// Arbitrary JSON, including shapes no target type accepts.
fn arb_json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(Number::from(n))),
        arb_finite_float().prop_map(|f| Number::from_f64(f).map_or(Value::Null, Value::Number)),
        arb_string().prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((arb_key(), inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn arb_target() -> impl Strategy<Value = Type> {
    let leaf = prop_oneof![
        Just(Type::Bool),
        Just(Type::Int(IntKind::I8)),
        Just(Type::Int(IntKind::I64)),
        Just(Type::Uint(UintKind::U32)),
        Just(Type::Float(FloatKind::F32)),
        Just(Type::Float(FloatKind::F64)),
        Just(Type::String),
        Just(Type::Interface),
        Just(common::small_type()),
    ];
    leaf.prop_recursive(2, 16, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(Type::pointer),
            inner.clone().prop_map(Type::slice),
            inner.clone().prop_map(|t| Type::array(2, t)),
            inner.prop_map(|t| Type::map(Type::String, t)),
        ]
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn record_roundtrips(record in arb_record()) {
        let encoded = encode_from(&JsonRuntime, &record);
        let decoded: Record = decode_as(&JsonRef::new(&encoded)).unwrap().unwrap();
        prop_assert_eq!(decoded, record);
    }

    #[test]
    fn vec_of_records_roundtrips(records in prop::collection::vec(arb_record(), 0..4)) {
        let encoded = encode_from(&JsonRuntime, &records);
        let decoded: Vec<Record> = decode_as(&JsonRef::new(&encoded)).unwrap().unwrap();
        prop_assert_eq!(decoded, records);
    }

    #[test]
    fn ints_roundtrip_exactly(n in arb_int()) {
        let encoded = encode_from(&JsonRuntime, &n);
        let decoded: i64 = decode_as(&JsonRef::new(&encoded)).unwrap().unwrap();
        prop_assert_eq!(decoded, n);
    }

    #[test]
    fn uints_roundtrip_exactly(n in any::<u64>()) {
        let encoded = encode_from(&JsonRuntime, &n);
        let decoded: u64 = decode_as(&JsonRef::new(&encoded)).unwrap().unwrap();
        prop_assert_eq!(decoded, n);
    }

    #[test]
    fn null_decodes_to_nothing(ty in arb_target()) {
        prop_assert_eq!(decode(&ty, &JsonRef::new(&Value::Null)).unwrap(), None);
    }

    #[test]
    fn decode_never_panics(ty in arb_target(), value in arb_json_value()) {
        let _ = decode(&ty, &JsonRef::new(&value));
    }

    #[test]
    fn decoded_values_reencode_to_a_fixpoint(ty in arb_target(), value in arb_json_value()) {
        if let Ok(Some(decoded)) = decode(&ty, &JsonRef::new(&value)) {
            let once = encode(&JsonRuntime, &decoded);
            let again = decode(&ty, &JsonRef::new(&once)).unwrap().unwrap();
            prop_assert_eq!(encode(&JsonRuntime, &again), once);
        }
    }
}
