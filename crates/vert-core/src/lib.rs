//! # vert-core
//!
//! Type-directed conversion between **dynamic values** (null, boolean,
//! number, string, property bags, arrays, as handed over by a JS engine or
//! any JSON-shaped peer) and **statically typed values** (structs, maps,
//! slices, arrays, pointers, interfaces, scalars).
//!
//! Neither side needs to know the other's type system ahead of time: the
//! decoder is driven by a [`Type`] descriptor, the encoder by the typed
//! value's own shape, and [`invoke`] decodes a callable's arguments from its
//! declared parameter types.
//!
//! ## Quick start
//!
//! ```rust
//! use serde_json::json;
//! use vert_core::json::{JsonRef, JsonRuntime};
//! use vert_core::{decode_as, encode_from, reflect_struct};
//!
//! #[derive(Debug, PartialEq)]
//! struct Small {
//!     tag: String,
//!     field: String,
//! }
//!
//! reflect_struct!(Small { tag: String => "tag", field: String => "field" });
//!
//! // dynamic → typed
//! let input = json!({"tag": "t1", "field": "f1"});
//! let small: Small = decode_as(&JsonRef::new(&input)).unwrap().unwrap();
//! assert_eq!(small, Small { tag: "t1".into(), field: "f1".into() });
//!
//! // typed → dynamic (roundtrip)
//! assert_eq!(encode_from(&JsonRuntime, &small), input);
//! ```
//!
//! ## Modules
//!
//! - [`decoder`]: dynamic value → typed value (`decode`, `decode_into`)
//! - [`encoder`]: typed value → dynamic value (`encode`)
//! - [`invoke`]: call a typed [`Func`] with dynamic arguments
//! - [`types`]: [`Type`] descriptors, struct fields and name mapping
//! - [`value`]: [`TypedValue`], the typed side of every conversion
//! - [`dynamic`]: the host boundary: [`DynamicValue`] and [`Runtime`]
//! - [`reflect`]: native Rust types via [`Reflect`] and [`reflect_struct!`]
//! - [`json`]: in-process host over `serde_json::Value` (feature `json`)
//! - [`error`]: error types

pub mod decoder;
pub mod dynamic;
pub mod encoder;
pub mod error;
pub mod invoke;
#[cfg(feature = "json")]
pub mod json;
pub mod reflect;
pub mod types;
pub mod value;

pub use decoder::{decode, decode_into};
pub use dynamic::{DynamicValue, Runtime, TypeTag};
pub use encoder::encode;
pub use error::{Error, Result};
pub use invoke::{invoke, Func, IntoFunc, IntoResults};
pub use reflect::{assign_to, decode_as, encode_from, Reflect};
pub use types::{Field, FloatKind, IntKind, Kind, StructType, StructTypeBuilder, Type, UintKind};
pub use value::{MapValue, TypedValue};
