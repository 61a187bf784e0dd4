//! Front-end argument values
//!
//! A call site passes a flat list of [`Value`]s alternating key, value, key,
//! value. Keys are only honoured when they are strings; values are resolved
//! by the field encoder according to the capability they carry.

use super::attr::AttrValue;
use crate::core::FieldValue;
use num_complex::{Complex32, Complex64};
use serde::Serialize;
use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// A value that knows how to produce its own loggable representation
pub trait Marshaler: fmt::Debug + Send + Sync {
    fn marshal_log(&self) -> Value;
}

/// An arbitrary structured value with no special handling.
///
/// Implemented for every `Serialize + Debug` type; the default encoding is
/// its JSON text.
pub trait Loggable: fmt::Debug + Send + Sync {
    /// JSON text of the value
    fn to_json(&self) -> serde_json::Result<String>;

    /// Access to the concrete type, for formatters that special-case types
    fn as_any(&self) -> &dyn Any;
}

impl<T> Loggable for T
where
    T: Serialize + fmt::Debug + Send + Sync + 'static,
{
    fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Fallback encoder for values with no special handling
///
/// # Example
///
/// ```
/// use rust_logr_adapter::{FieldValue, FormatFn};
/// use std::sync::Arc;
///
/// let debug_text: FormatFn = Arc::new(|value| FieldValue::String(format!("{:?}", value)));
/// ```
pub type FormatFn = Arc<dyn Fn(&dyn Loggable) -> FieldValue + Send + Sync>;

/// One front-end argument, either a key or a value
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    Bool(bool),
    Complex(Complex64),
    /// Raw bytes, logged as their (lossy) UTF-8 text
    Bytes(Vec<u8>),
    Error(Arc<dyn Error + Send + Sync>),
    Marshaler(Arc<dyn Marshaler>),
    /// Lazily-resolvable structured value
    Attr(AttrValue),
    Any(Arc<dyn Loggable>),
}

impl Value {
    /// Wrap an arbitrary serializable value
    pub fn any<T>(value: T) -> Self
    where
        T: Serialize + fmt::Debug + Send + Sync + 'static,
    {
        Value::Any(Arc::new(value))
    }

    pub fn error<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Value::Error(Arc::new(err))
    }

    pub fn marshaler<M>(value: M) -> Self
    where
        M: Marshaler + 'static,
    {
        Value::Marshaler(Arc::new(value))
    }

    /// The key text, if this value can serve as a key
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "Int({})", i),
            Value::Uint(u) => write!(f, "Uint({})", u),
            Value::Float(fl) => write!(f, "Float({})", fl),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Complex(c) => write!(f, "Complex({})", c),
            Value::Bytes(b) => write!(f, "Bytes({:?})", String::from_utf8_lossy(b)),
            Value::Error(e) => write!(f, "Error({})", e),
            Value::Marshaler(m) => write!(f, "Marshaler({:?})", m),
            Value::Attr(a) => write!(f, "Attr({:?})", a),
            Value::Any(v) => write!(f, "Any({:?})", v),
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Uint(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Complex32> for Value {
    fn from(v: Complex32) -> Self {
        Value::Complex(Complex64::new(f64::from(v.re), f64::from(v.im)))
    }
}

impl From<Complex64> for Value {
    fn from(v: Complex64) -> Self {
        Value::Complex(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<AttrValue> for Value {
    fn from(v: AttrValue) -> Self {
        Value::Attr(v)
    }
}

/// Build a front-end argument list from heterogeneous expressions
///
/// Every element goes through `Value::from`, so plain literals, strings,
/// byte vectors and [`AttrValue`]s can be mixed freely.
///
/// ```
/// use rust_logr_adapter::{kv, Value};
///
/// let args = kv!["animal", "walrus", "count", 3, "list", Value::any(vec![1, 2, 3])];
/// assert_eq!(args.len(), 6);
/// ```
#[macro_export]
macro_rules! kv {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($arg)),+]
    };
}
