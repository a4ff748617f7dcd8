//! Typed values: the statically typed side of the bridge.
//!
//! A [`TypedValue`] always knows its own [`Type`], so the encoder can walk
//! it without a separate descriptor. Pointers, interfaces, maps, and slices
//! are nil-able; a nil value is distinct from an empty one.

use crate::types::{FloatKind, IntKind, Kind, StructType, Type, UintKind};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::sync::Arc;

/// A value conforming to a [`Type`].
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Bool(bool),
    Int(IntKind, i64),
    Uint(UintKind, u64),
    Float(FloatKind, f64),
    String(String),
    Pointer {
        elem: Type,
        target: Option<Box<TypedValue>>,
    },
    Interface(Option<Box<TypedValue>>),
    Struct {
        ty: Arc<StructType>,
        /// One value per field of `ty`, in declaration order.
        fields: Vec<TypedValue>,
    },
    Map(MapValue),
    Slice {
        elem: Type,
        items: Option<Vec<TypedValue>>,
    },
    Array {
        elem: Type,
        items: Vec<TypedValue>,
    },
}

impl TypedValue {
    /// A non-nil pointer to `value`.
    pub fn pointer_to(value: TypedValue) -> Self {
        TypedValue::Pointer {
            elem: value.type_of(),
            target: Some(Box::new(value)),
        }
    }

    /// An interface holding `value`.
    pub fn interface(value: TypedValue) -> Self {
        TypedValue::Interface(Some(Box::new(value)))
    }

    pub fn type_of(&self) -> Type {
        match self {
            TypedValue::Bool(_) => Type::Bool,
            TypedValue::Int(k, _) => Type::Int(*k),
            TypedValue::Uint(k, _) => Type::Uint(*k),
            TypedValue::Float(k, _) => Type::Float(*k),
            TypedValue::String(_) => Type::String,
            TypedValue::Pointer { elem, .. } => Type::pointer(elem.clone()),
            TypedValue::Interface(_) => Type::Interface,
            TypedValue::Struct { ty, .. } => Type::Struct(Arc::clone(ty)),
            TypedValue::Map(m) => Type::map(m.key.clone(), m.elem.clone()),
            TypedValue::Slice { elem, .. } => Type::slice(elem.clone()),
            TypedValue::Array { elem, items } => Type::array(items.len(), elem.clone()),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            TypedValue::Bool(_) => Kind::Bool,
            TypedValue::Int(k, _) => (*k).into(),
            TypedValue::Uint(k, _) => (*k).into(),
            TypedValue::Float(k, _) => (*k).into(),
            TypedValue::String(_) => Kind::String,
            TypedValue::Pointer { .. } => Kind::Pointer,
            TypedValue::Interface(_) => Kind::Interface,
            TypedValue::Struct { .. } => Kind::Struct,
            TypedValue::Map(_) => Kind::Map,
            TypedValue::Slice { .. } => Kind::Slice,
            TypedValue::Array { .. } => Kind::Array,
        }
    }

    /// True for a nil pointer, empty interface, nil map, or nil slice.
    pub fn is_nil(&self) -> bool {
        match self {
            TypedValue::Pointer { target, .. } => target.is_none(),
            TypedValue::Interface(held) => held.is_none(),
            TypedValue::Map(m) => m.is_nil(),
            TypedValue::Slice { items, .. } => items.is_none(),
            _ => false,
        }
    }

    /// Struct field by declared name.
    pub fn field(&self, name: &str) -> Option<&TypedValue> {
        match self {
            TypedValue::Struct { ty, fields } => ty.field_index(name).and_then(|i| fields.get(i)),
            _ => None,
        }
    }

    /// Pointee of a non-nil pointer, or the value held by an interface.
    pub fn deref(&self) -> Option<&TypedValue> {
        match self {
            TypedValue::Pointer { target, .. } => target.as_deref(),
            TypedValue::Interface(held) => held.as_deref(),
            _ => None,
        }
    }

    /// String representation of a map key on the dynamic side.
    pub fn key_string(&self) -> String {
        match self {
            TypedValue::String(s) => s.clone(),
            TypedValue::Pointer { .. } | TypedValue::Interface(_) => match self.deref() {
                Some(inner) => inner.key_string(),
                None => "null".to_string(),
            },
            other => other.to_string(),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Bool(b) => write!(f, "{b}"),
            TypedValue::Int(_, i) => write!(f, "{i}"),
            TypedValue::Uint(_, u) => write!(f, "{u}"),
            TypedValue::Float(_, x) => write!(f, "{x}"),
            TypedValue::String(s) => f.write_str(s),
            TypedValue::Pointer { target: None, .. } | TypedValue::Interface(None) => {
                f.write_str("<nil>")
            }
            TypedValue::Pointer {
                target: Some(inner),
                ..
            } => write!(f, "&{inner}"),
            TypedValue::Interface(Some(inner)) => write!(f, "{inner}"),
            TypedValue::Struct { fields, .. } => {
                f.write_str("{")?;
                write_joined(f, fields.iter())?;
                f.write_str("}")
            }
            TypedValue::Map(m) => {
                f.write_str("map[")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                f.write_str("]")
            }
            TypedValue::Slice { items, .. } => {
                f.write_str("[")?;
                write_joined(f, items.iter().flatten())?;
                f.write_str("]")
            }
            TypedValue::Array { items, .. } => {
                f.write_str("[")?;
                write_joined(f, items.iter())?;
                f.write_str("]")
            }
        }
    }
}

fn write_joined<'a>(
    f: &mut fmt::Formatter<'_>,
    values: impl Iterator<Item = &'a TypedValue>,
) -> fmt::Result {
    for (i, v) in values.enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{v}")?;
    }
    Ok(())
}

/// A typed map. Entries keep insertion order, but equality ignores it.
///
/// Lookups go through a hash index over the keys, so decoding an object with
/// many properties stays linear.
#[derive(Clone)]
pub struct MapValue {
    pub key: Type,
    pub elem: Type,
    entries: Option<Vec<(TypedValue, TypedValue)>>,
    /// Key hash to positions in `entries`; collisions share a bucket.
    index: HashMap<u64, Vec<usize>>,
}

impl MapValue {
    /// A nil map.
    pub fn nil(key: Type, elem: Type) -> Self {
        Self {
            key,
            elem,
            entries: None,
            index: HashMap::new(),
        }
    }

    /// An empty, non-nil map with room for `capacity` entries.
    pub fn with_capacity(key: Type, elem: Type, capacity: usize) -> Self {
        Self {
            key,
            elem,
            entries: Some(Vec::with_capacity(capacity)),
            index: HashMap::with_capacity(capacity),
        }
    }

    pub fn is_nil(&self) -> bool {
        self.entries.is_none()
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert or replace the entry for `key`. A nil map becomes non-nil.
    pub fn insert(&mut self, key: TypedValue, value: TypedValue) {
        let hash = key_hash(&key);
        let entries = self.entries.get_or_insert_with(Vec::new);
        let bucket = self.index.entry(hash).or_default();
        match bucket.iter().copied().find(|&i| entries[i].0 == key) {
            Some(i) => entries[i].1 = value,
            None => {
                bucket.push(entries.len());
                entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &TypedValue) -> Option<&TypedValue> {
        let entries = self.entries.as_ref()?;
        self.index
            .get(&key_hash(key))?
            .iter()
            .map(|&i| &entries[i])
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypedValue, &TypedValue)> {
        self.entries.iter().flatten().map(|(k, v)| (k, v))
    }

    pub fn into_entries(self) -> Vec<(TypedValue, TypedValue)> {
        self.entries.unwrap_or_default()
    }
}

impl fmt::Debug for MapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapValue")
            .field("key", &self.key)
            .field("elem", &self.elem)
            .field("entries", &self.entries)
            .finish()
    }
}

impl PartialEq for MapValue {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.elem == other.elem
            && self.is_nil() == other.is_nil()
            && self.len() == other.len()
            && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

/// Hash of a map key, consistent with `TypedValue`'s equality: equal values
/// hash alike (`0.0` and `-0.0` included).
fn key_hash(key: &TypedValue) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_value(key, &mut hasher);
    hasher.finish()
}

fn hash_value<H: Hasher>(value: &TypedValue, state: &mut H) {
    mem::discriminant(value).hash(state);
    match value {
        TypedValue::Bool(b) => b.hash(state),
        TypedValue::Int(_, i) => i.hash(state),
        TypedValue::Uint(_, u) => u.hash(state),
        TypedValue::Float(_, f) => {
            let bits = if *f == 0.0 { 0 } else { f.to_bits() };
            bits.hash(state);
        }
        TypedValue::String(s) => s.hash(state),
        TypedValue::Pointer { target, .. } => {
            if let Some(inner) = target {
                hash_value(inner, state);
            }
        }
        TypedValue::Interface(held) => {
            if let Some(inner) = held {
                hash_value(inner, state);
            }
        }
        TypedValue::Struct { fields, .. } => fields.iter().for_each(|f| hash_value(f, state)),
        // Entry order is not part of map equality.
        TypedValue::Map(m) => m.len().hash(state),
        TypedValue::Slice { items, .. } => {
            items.is_some().hash(state);
            items.iter().flatten().for_each(|v| hash_value(v, state));
        }
        TypedValue::Array { items, .. } => items.iter().for_each(|v| hash_value(v, state)),
    }
}
