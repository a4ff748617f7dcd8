//! Native Rust types on top of the descriptor model.
//!
//! [`Reflect`] ties a Rust type to its [`Type`] and converts values to and
//! from [`TypedValue`]. The mapping is:
//!
//! | Rust                          | Type                |
//! |-------------------------------|---------------------|
//! | `bool`, integers, `f32`/`f64` | scalar of that kind |
//! | `String`                      | `String`            |
//! | `Option<T>`                   | `Pointer(T)`        |
//! | `Vec<T>`                      | `Slice(T)`          |
//! | `[T; N]`                      | `Array(N, T)`       |
//! | `HashMap<K, V>`, `BTreeMap`   | `Map(K, V)`         |
//! | structs via [`reflect_struct!`](crate::reflect_struct) | `Struct` |
//!
//! `Vec` and the map types cannot be nil, so a nil slice or map converts to
//! an empty one.

use crate::decoder::{decode, decode_into};
use crate::dynamic::{DynamicValue, Runtime};
use crate::encoder::encode;
use crate::error::{Error, Result};
use crate::types::{FloatKind, IntKind, Kind, Type, UintKind};
use crate::value::{MapValue, TypedValue};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// A Rust type with a type descriptor.
pub trait Reflect: Sized {
    fn type_descriptor() -> Type;

    fn to_typed(&self) -> TypedValue;

    fn from_typed(value: TypedValue) -> Result<Self>;
}

/// Decode `value` as a `T`. `Ok(None)` for null or undefined.
pub fn decode_as<T: Reflect, V: DynamicValue>(value: &V) -> Result<Option<T>> {
    decode(&T::type_descriptor(), value)?
        .map(T::from_typed)
        .transpose()
}

/// Decode `value` into an existing `T`, using its current contents as the
/// destination. `dst` is only replaced once the whole walk has succeeded.
pub fn assign_to<T: Reflect, V: DynamicValue>(value: &V, dst: &mut T) -> Result<()> {
    let mut ptr = TypedValue::pointer_to(dst.to_typed());
    decode_into(&mut ptr, value)?;
    if let TypedValue::Pointer {
        target: Some(inner),
        ..
    } = ptr
    {
        *dst = T::from_typed(*inner)?;
    }
    Ok(())
}

/// Encode a `T` through `rt`.
pub fn encode_from<T: Reflect, R: Runtime>(rt: &R, value: &T) -> R::Value {
    encode(rt, &value.to_typed())
}

fn unexpected(expected: Kind, actual: &TypedValue) -> Error {
    Error::Conversion {
        expected,
        actual: actual.kind(),
    }
}

impl Reflect for bool {
    fn type_descriptor() -> Type {
        Type::Bool
    }

    fn to_typed(&self) -> TypedValue {
        TypedValue::Bool(*self)
    }

    fn from_typed(value: TypedValue) -> Result<Self> {
        match value {
            TypedValue::Bool(b) => Ok(b),
            other => Err(unexpected(Kind::Bool, &other)),
        }
    }
}

impl Reflect for String {
    fn type_descriptor() -> Type {
        Type::String
    }

    fn to_typed(&self) -> TypedValue {
        TypedValue::String(self.clone())
    }

    fn from_typed(value: TypedValue) -> Result<Self> {
        match value {
            TypedValue::String(s) => Ok(s),
            other => Err(unexpected(Kind::String, &other)),
        }
    }
}

macro_rules! reflect_int {
    ($($t:ty => $k:ident),* $(,)?) => {$(
        impl Reflect for $t {
            fn type_descriptor() -> Type {
                Type::Int(IntKind::$k)
            }

            fn to_typed(&self) -> TypedValue {
                TypedValue::Int(IntKind::$k, *self as i64)
            }

            fn from_typed(value: TypedValue) -> Result<Self> {
                match value {
                    TypedValue::Int(_, i) => {
                        <$t>::try_from(i).map_err(|_| unexpected(IntKind::$k.into(), &value))
                    }
                    other => Err(unexpected(IntKind::$k.into(), &other)),
                }
            }
        }
    )*};
}

macro_rules! reflect_uint {
    ($($t:ty => $k:ident),* $(,)?) => {$(
        impl Reflect for $t {
            fn type_descriptor() -> Type {
                Type::Uint(UintKind::$k)
            }

            fn to_typed(&self) -> TypedValue {
                TypedValue::Uint(UintKind::$k, *self as u64)
            }

            fn from_typed(value: TypedValue) -> Result<Self> {
                match value {
                    TypedValue::Uint(_, u) => {
                        <$t>::try_from(u).map_err(|_| unexpected(UintKind::$k.into(), &value))
                    }
                    other => Err(unexpected(UintKind::$k.into(), &other)),
                }
            }
        }
    )*};
}

reflect_int!(i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize);
reflect_uint!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize);

impl Reflect for f32 {
    fn type_descriptor() -> Type {
        Type::Float(FloatKind::F32)
    }

    fn to_typed(&self) -> TypedValue {
        TypedValue::Float(FloatKind::F32, f64::from(*self))
    }

    fn from_typed(value: TypedValue) -> Result<Self> {
        match value {
            TypedValue::Float(_, f) => Ok(f as f32),
            other => Err(unexpected(Kind::F32, &other)),
        }
    }
}

impl Reflect for f64 {
    fn type_descriptor() -> Type {
        Type::Float(FloatKind::F64)
    }

    fn to_typed(&self) -> TypedValue {
        TypedValue::Float(FloatKind::F64, *self)
    }

    fn from_typed(value: TypedValue) -> Result<Self> {
        match value {
            TypedValue::Float(_, f) => Ok(f),
            other => Err(unexpected(Kind::F64, &other)),
        }
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn type_descriptor() -> Type {
        Type::pointer(T::type_descriptor())
    }

    fn to_typed(&self) -> TypedValue {
        TypedValue::Pointer {
            elem: T::type_descriptor(),
            target: self.as_ref().map(|v| Box::new(v.to_typed())),
        }
    }

    fn from_typed(value: TypedValue) -> Result<Self> {
        match value {
            TypedValue::Pointer { target, .. } => target.map(|v| T::from_typed(*v)).transpose(),
            other => Err(unexpected(Kind::Pointer, &other)),
        }
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_descriptor() -> Type {
        Type::slice(T::type_descriptor())
    }

    fn to_typed(&self) -> TypedValue {
        TypedValue::Slice {
            elem: T::type_descriptor(),
            items: Some(self.iter().map(Reflect::to_typed).collect()),
        }
    }

    fn from_typed(value: TypedValue) -> Result<Self> {
        match value {
            TypedValue::Slice { items, .. } => items
                .unwrap_or_default()
                .into_iter()
                .map(T::from_typed)
                .collect(),
            other => Err(unexpected(Kind::Slice, &other)),
        }
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_descriptor() -> Type {
        Type::array(N, T::type_descriptor())
    }

    fn to_typed(&self) -> TypedValue {
        TypedValue::Array {
            elem: T::type_descriptor(),
            items: self.iter().map(Reflect::to_typed).collect(),
        }
    }

    fn from_typed(value: TypedValue) -> Result<Self> {
        match value {
            TypedValue::Array { items, .. } => {
                let items = items
                    .into_iter()
                    .map(T::from_typed)
                    .collect::<Result<Vec<T>>>()?;
                items.try_into().map_err(|_| Error::Conversion {
                    expected: Kind::Array,
                    actual: Kind::Slice,
                })
            }
            other => Err(unexpected(Kind::Array, &other)),
        }
    }
}

fn map_to_typed<'a, K, V>(entries: impl ExactSizeIterator<Item = (&'a K, &'a V)>) -> TypedValue
where
    K: Reflect + 'a,
    V: Reflect + 'a,
{
    let mut m = MapValue::with_capacity(K::type_descriptor(), V::type_descriptor(), entries.len());
    for (k, v) in entries {
        m.insert(k.to_typed(), v.to_typed());
    }
    TypedValue::Map(m)
}

fn map_from_typed<K, V, M>(value: TypedValue) -> Result<M>
where
    K: Reflect,
    V: Reflect,
    M: FromIterator<(K, V)>,
{
    match value {
        TypedValue::Map(m) => m
            .into_entries()
            .into_iter()
            .map(|(k, v)| Ok((K::from_typed(k)?, V::from_typed(v)?)))
            .collect(),
        other => Err(unexpected(Kind::Map, &other)),
    }
}

impl<K: Reflect + Eq + Hash, V: Reflect> Reflect for HashMap<K, V> {
    fn type_descriptor() -> Type {
        Type::map(K::type_descriptor(), V::type_descriptor())
    }

    fn to_typed(&self) -> TypedValue {
        map_to_typed(self.iter())
    }

    fn from_typed(value: TypedValue) -> Result<Self> {
        map_from_typed::<K, V, Self>(value)
    }
}

impl<K: Reflect + Ord, V: Reflect> Reflect for BTreeMap<K, V> {
    fn type_descriptor() -> Type {
        Type::map(K::type_descriptor(), V::type_descriptor())
    }

    fn to_typed(&self) -> TypedValue {
        map_to_typed(self.iter())
    }

    fn from_typed(value: TypedValue) -> Result<Self> {
        map_from_typed::<K, V, Self>(value)
    }
}

/// Implement [`Reflect`] for a struct with named fields.
///
/// Every field type must itself implement `Reflect`. `=> "name"` sets the
/// property name used on the dynamic side; `#[unexported]` keeps a field
/// out of decoding and encoding entirely (it still round-trips through
/// `to_typed`/`from_typed`).
///
/// ```
/// use serde_json::json;
/// use vert_core::json::{JsonRef, JsonRuntime};
/// use vert_core::{decode_as, encode_from, reflect_struct};
///
/// #[derive(Debug, PartialEq)]
/// struct Small {
///     tag: String,
///     field: String,
///     cache: u32,
/// }
///
/// reflect_struct!(Small {
///     tag: String => "Tag",
///     field: String,
///     #[unexported]
///     cache: u32,
/// });
///
/// let input = json!({"Tag": "t1", "field": "f1", "cache": 7});
/// let small: Small = decode_as(&JsonRef::new(&input)).unwrap().unwrap();
/// assert_eq!(small, Small { tag: "t1".into(), field: "f1".into(), cache: 0 });
/// assert_eq!(encode_from(&JsonRuntime, &small), json!({"Tag": "t1", "field": "f1"}));
/// ```
#[macro_export]
macro_rules! reflect_struct {
    (@rename) => { ::std::option::Option::None };
    (@rename $rename:literal) => {
        ::std::option::Option::Some(::std::string::String::from($rename))
    };
    (@exported) => { true };
    (@exported unexported) => { false };
    ($name:ident { $( $(#[$flag:ident])? $field:ident : $ty:ty $(=> $rename:literal)? ),* $(,)? }) => {
        const _: () = {
            fn struct_type() -> ::std::sync::Arc<$crate::StructType> {
                static TYPE: ::std::sync::OnceLock<::std::sync::Arc<$crate::StructType>> =
                    ::std::sync::OnceLock::new();
                ::std::sync::Arc::clone(TYPE.get_or_init(|| {
                    ::std::sync::Arc::new($crate::StructType {
                        name: ::std::string::String::from(stringify!($name)),
                        fields: vec![$(
                            $crate::Field {
                                name: ::std::string::String::from(stringify!($field)),
                                rename: $crate::reflect_struct!(@rename $($rename)?),
                                ty: <$ty as $crate::Reflect>::type_descriptor(),
                                exported: $crate::reflect_struct!(@exported $($flag)?),
                            }
                        ),*],
                    })
                }))
            }

            impl $crate::Reflect for $name {
                fn type_descriptor() -> $crate::Type {
                    $crate::Type::Struct(struct_type())
                }

                fn to_typed(&self) -> $crate::TypedValue {
                    $crate::TypedValue::Struct {
                        ty: struct_type(),
                        fields: vec![$( $crate::Reflect::to_typed(&self.$field) ),*],
                    }
                }

                fn from_typed(value: $crate::TypedValue) -> $crate::Result<Self> {
                    match value {
                        $crate::TypedValue::Struct { fields, .. } => {
                            let mut fields = fields.into_iter();
                            Ok($name {
                                $(
                                    $field: <$ty as $crate::Reflect>::from_typed(
                                        fields.next().ok_or($crate::Error::Conversion {
                                            expected: $crate::Kind::Struct,
                                            actual: $crate::Kind::Struct,
                                        })?,
                                    )?,
                                )*
                            })
                        }
                        other => Err($crate::Error::Conversion {
                            expected: $crate::Kind::Struct,
                            actual: other.kind(),
                        }),
                    }
                }
            }
        };
    };
}
