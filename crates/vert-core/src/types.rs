//! Type descriptors: structural reflection over a static type.
//!
//! A [`Type`] is a closed set of variants, one per shape the converters
//! handle. Structs carry an ordered field list; each field has a declared
//! name, an optional rename (the name used on the dynamic side), and an
//! exported flag. Unexported fields are never read or written by the
//! converters.

use crate::value::{MapValue, TypedValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Signed integer widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
}

/// Unsigned integer widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UintKind {
    U8,
    U16,
    U32,
    U64,
    Usize,
}

/// Floating point widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    F32,
    F64,
}

/// The coarse structural category of a type, as reported in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
    Pointer,
    Interface,
    Struct,
    Map,
    Slice,
    Array,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::Isize => "isize",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::Usize => "usize",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::String => "string",
            Kind::Pointer => "pointer",
            Kind::Interface => "interface",
            Kind::Struct => "struct",
            Kind::Map => "map",
            Kind::Slice => "slice",
            Kind::Array => "array",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<IntKind> for Kind {
    fn from(k: IntKind) -> Self {
        match k {
            IntKind::I8 => Kind::I8,
            IntKind::I16 => Kind::I16,
            IntKind::I32 => Kind::I32,
            IntKind::I64 => Kind::I64,
            IntKind::Isize => Kind::Isize,
        }
    }
}

impl From<UintKind> for Kind {
    fn from(k: UintKind) -> Self {
        match k {
            UintKind::U8 => Kind::U8,
            UintKind::U16 => Kind::U16,
            UintKind::U32 => Kind::U32,
            UintKind::U64 => Kind::U64,
            UintKind::Usize => Kind::Usize,
        }
    }
}

impl From<FloatKind> for Kind {
    fn from(k: FloatKind) -> Self {
        match k {
            FloatKind::F32 => Kind::F32,
            FloatKind::F64 => Kind::F64,
        }
    }
}

/// A type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Bool,
    Int(IntKind),
    Uint(UintKind),
    Float(FloatKind),
    String,
    /// Nullable reference to a value of the element type.
    Pointer(Box<Type>),
    /// A value whose concrete type is only known from what it holds.
    Interface,
    Struct(Arc<StructType>),
    Map(Box<Type>, Box<Type>),
    /// Nullable, variable-length sequence.
    Slice(Box<Type>),
    /// Fixed-length sequence.
    Array(usize, Box<Type>),
}

impl Type {
    pub fn pointer(elem: Type) -> Self {
        Type::Pointer(Box::new(elem))
    }

    pub fn map(key: Type, elem: Type) -> Self {
        Type::Map(Box::new(key), Box::new(elem))
    }

    pub fn slice(elem: Type) -> Self {
        Type::Slice(Box::new(elem))
    }

    pub fn array(len: usize, elem: Type) -> Self {
        Type::Array(len, Box::new(elem))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Type::Bool => Kind::Bool,
            Type::Int(k) => (*k).into(),
            Type::Uint(k) => (*k).into(),
            Type::Float(k) => (*k).into(),
            Type::String => Kind::String,
            Type::Pointer(_) => Kind::Pointer,
            Type::Interface => Kind::Interface,
            Type::Struct(_) => Kind::Struct,
            Type::Map(..) => Kind::Map,
            Type::Slice(_) => Kind::Slice,
            Type::Array(..) => Kind::Array,
        }
    }

    /// Element type of a pointer, slice, array, or map.
    pub fn elem(&self) -> Option<&Type> {
        match self {
            Type::Pointer(e) | Type::Slice(e) | Type::Array(_, e) | Type::Map(_, e) => Some(e),
            _ => None,
        }
    }

    /// Key type of a map.
    pub fn key(&self) -> Option<&Type> {
        match self {
            Type::Map(k, _) => Some(k),
            _ => None,
        }
    }

    pub fn array_len(&self) -> Option<usize> {
        match self {
            Type::Array(n, _) => Some(*n),
            _ => None,
        }
    }

    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Type::Struct(s) => Some(&s.fields),
            _ => None,
        }
    }

    /// The zero value: false, 0, "", nil pointer/map/slice, empty interface,
    /// and structs/arrays with every element zeroed.
    pub fn zero(&self) -> TypedValue {
        match self {
            Type::Bool => TypedValue::Bool(false),
            Type::Int(k) => TypedValue::Int(*k, 0),
            Type::Uint(k) => TypedValue::Uint(*k, 0),
            Type::Float(k) => TypedValue::Float(*k, 0.0),
            Type::String => TypedValue::String(String::new()),
            Type::Pointer(elem) => TypedValue::Pointer {
                elem: (**elem).clone(),
                target: None,
            },
            Type::Interface => TypedValue::Interface(None),
            Type::Struct(s) => TypedValue::Struct {
                fields: s.fields.iter().map(|f| f.ty.zero()).collect(),
                ty: Arc::clone(s),
            },
            Type::Map(key, elem) => TypedValue::Map(MapValue::nil((**key).clone(), (**elem).clone())),
            Type::Slice(elem) => TypedValue::Slice {
                elem: (**elem).clone(),
                items: None,
            },
            Type::Array(n, elem) => TypedValue::Array {
                elem: (**elem).clone(),
                items: (0..*n).map(|_| elem.zero()).collect(),
            },
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Pointer(e) => write!(f, "*{e}"),
            Type::Struct(s) => f.write_str(&s.name),
            Type::Map(k, e) => write!(f, "map[{k}]{e}"),
            Type::Slice(e) => write!(f, "[]{e}"),
            Type::Array(n, e) => write!(f, "[{n}]{e}"),
            other => f.write_str(other.kind().as_str()),
        }
    }
}

/// A struct field descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Declared field name.
    pub name: String,
    /// Explicit name mapping for the dynamic side.
    pub rename: Option<String>,
    pub ty: Type,
    pub exported: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            rename: None,
            ty,
            exported: true,
        }
    }

    /// Property name used on the dynamic side: the rename if present,
    /// otherwise the declared name.
    pub fn exposed_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name)
    }
}

/// A struct type: a name and its ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    pub name: String,
    pub fields: Vec<Field>,
}

impl StructType {
    pub fn builder(name: impl Into<String>) -> StructTypeBuilder {
        StructTypeBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Index of the field with the given declared name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// Fluent builder for [`StructType`].
///
/// ```
/// use vert_core::{StructType, Type};
///
/// let small = StructType::builder("Small")
///     .field("Tag", Type::String)
///     .renamed("tag")
///     .field("Field", Type::String)
///     .build();
/// assert_eq!(small.fields[0].exposed_name(), "tag");
/// assert_eq!(small.fields[1].exposed_name(), "Field");
/// ```
#[derive(Debug)]
pub struct StructTypeBuilder {
    name: String,
    fields: Vec<Field>,
}

impl StructTypeBuilder {
    pub fn field(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.fields.push(Field::new(name, ty));
        self
    }

    /// Set the dynamic-side name of the most recently added field.
    pub fn renamed(mut self, exposed: impl Into<String>) -> Self {
        if let Some(f) = self.fields.last_mut() {
            f.rename = Some(exposed.into());
        }
        self
    }

    /// Mark the most recently added field as unexported.
    pub fn unexported(mut self) -> Self {
        if let Some(f) = self.fields.last_mut() {
            f.exported = false;
        }
        self
    }

    pub fn build(self) -> StructType {
        StructType {
            name: self.name,
            fields: self.fields,
        }
    }

    /// Build straight into a [`Type::Struct`].
    pub fn build_type(self) -> Type {
        Type::Struct(Arc::new(self.build()))
    }
}
