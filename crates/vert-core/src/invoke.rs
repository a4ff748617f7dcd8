//! Invoke: call a typed function with dynamic arguments.
//!
//! Each declared parameter is decoded from the argument at the same
//! position. Extra trailing arguments are ignored; too few is an
//! [`Error::Arity`]. Results come back as typed values and are not encoded;
//! callers that need dynamic results pass them to [`crate::encode`].

use crate::decoder::decode;
use crate::dynamic::DynamicValue;
use crate::error::{Error, Result};
use crate::reflect::Reflect;
use crate::types::Type;
use crate::value::TypedValue;
use std::fmt;
use tracing::{debug, trace};

type Body = dyn Fn(Vec<TypedValue>) -> Result<Vec<TypedValue>> + Send + Sync;

/// A callable with declared parameter types.
pub struct Func {
    params: Vec<Type>,
    body: Box<Body>,
}

impl Func {
    /// A callable over typed values. `body` receives exactly one value per
    /// declared parameter, in order.
    pub fn new<F>(params: Vec<Type>, body: F) -> Self
    where
        F: Fn(Vec<TypedValue>) -> Result<Vec<TypedValue>> + Send + Sync + 'static,
    {
        Self {
            params,
            body: Box::new(body),
        }
    }

    /// Wrap a Rust closure whose parameters implement [`Reflect`] and which
    /// returns `()` or a tuple of `Reflect` values.
    ///
    /// ```
    /// use serde_json::json;
    /// use vert_core::json::JsonRef;
    /// use vert_core::{invoke, Func, TypedValue};
    ///
    /// let greet = Func::wrap(|name: String| (format!("hello {name}"),));
    /// let args = [json!("ada"), json!("ignored")];
    /// let args: Vec<JsonRef> = args.iter().map(JsonRef::new).collect();
    /// let results = invoke(&greet, &args).unwrap();
    /// assert_eq!(results, vec![TypedValue::String("hello ada".into())]);
    /// ```
    pub fn wrap<Args, F: IntoFunc<Args>>(f: F) -> Self {
        f.into_func()
    }

    pub fn num_params(&self) -> usize {
        self.params.len()
    }

    pub fn param_type(&self, i: usize) -> Option<&Type> {
        self.params.get(i)
    }

    pub fn params(&self) -> &[Type] {
        &self.params
    }

    /// Call with already typed arguments.
    pub fn call(&self, args: Vec<TypedValue>) -> Result<Vec<TypedValue>> {
        (self.body)(args)
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Func").field("params", &self.params).finish_non_exhaustive()
    }
}

/// Decode `args` against `f`'s parameter types and call it.
///
/// The first argument that fails to decode aborts the call before `f` runs.
/// A null or undefined argument is passed as the parameter's zero value.
pub fn invoke<V: DynamicValue>(f: &Func, args: &[V]) -> Result<Vec<TypedValue>> {
    let expected = f.num_params();
    trace!(expected, actual = args.len(), "invoke");
    if args.len() < expected {
        debug!(expected, actual = args.len(), "invoke: not enough arguments");
        return Err(Error::Arity {
            expected,
            actual: args.len(),
        });
    }

    let mut values = Vec::with_capacity(expected);
    for (i, (ty, arg)) in f.params.iter().zip(args).enumerate() {
        let value = decode(ty, arg).inspect_err(|e| {
            debug!(param = i, error = %e, "invoke: argument failed to decode");
        })?;
        values.push(value.unwrap_or_else(|| ty.zero()));
    }
    f.call(values)
}

/// Results of a wrapped closure: `()` or a tuple of [`Reflect`] values.
pub trait IntoResults {
    fn into_results(self) -> Vec<TypedValue>;
}

impl IntoResults for () {
    fn into_results(self) -> Vec<TypedValue> {
        Vec::new()
    }
}

macro_rules! impl_into_results {
    ($($ty:ident $var:ident),+) => {
        impl<$($ty: Reflect),+> IntoResults for ($($ty,)+) {
            fn into_results(self) -> Vec<TypedValue> {
                let ($($var,)+) = self;
                vec![$($var.to_typed()),+]
            }
        }
    };
}

impl_into_results!(A a);
impl_into_results!(A a, B b);
impl_into_results!(A a, B b, C c);

/// Conversion of a Rust closure into a [`Func`]; see [`Func::wrap`].
pub trait IntoFunc<Args> {
    fn into_func(self) -> Func;
}

macro_rules! impl_into_func {
    ($($ty:ident $var:ident),*) => {
        impl<Call, Out, $($ty,)*> IntoFunc<($($ty,)*)> for Call
        where
            Call: Fn($($ty),*) -> Out + Send + Sync + 'static,
            Out: IntoResults,
            $($ty: Reflect,)*
        {
            #[allow(unused_mut, unused_variables)]
            fn into_func(self) -> Func {
                let params = vec![$($ty::type_descriptor()),*];
                let expected = params.len();
                Func::new(params, move |args: Vec<TypedValue>| {
                    let actual = args.len();
                    let mut args = args.into_iter();
                    $(
                        let $var = $ty::from_typed(
                            args.next().ok_or(Error::Arity { expected, actual })?,
                        )?;
                    )*
                    Ok(self($($var),*).into_results())
                })
            }
        }
    };
}

impl_into_func!();
impl_into_func!(A a);
impl_into_func!(A a, B b);
impl_into_func!(A a, B b, C c);
impl_into_func!(A a, B b, C c, D d);
impl_into_func!(A a, B b, C c, D d, E e);
impl_into_func!(A a, B b, C c, D d, E e, F f);
