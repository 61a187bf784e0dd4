//! Lazily-resolvable structured values
//!
//! An [`AttrValue`] is a deferred, possibly nested value. Groups hold child
//! [`Attr`]s; a [`LogValuer`] produces its value only when the record is
//! actually encoded.

use super::value::Loggable;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on chained `log_value` calls before resolution gives up
pub const MAX_RESOLVE_STEPS: usize = 100;

/// A value computed at encoding time
pub trait LogValuer: fmt::Debug + Send + Sync {
    fn log_value(&self) -> AttrValue;
}

/// A deferred structured value
#[derive(Clone, Debug)]
pub enum AttrValue {
    String(String),
    Int64(i64),
    Uint64(u64),
    Float64(f64),
    Bool(bool),
    Duration(Duration),
    Time(DateTime<Utc>),
    Group(Vec<Attr>),
    LogValuer(Arc<dyn LogValuer>),
    /// Opaque value, encoded by the fallback rule
    Any(Arc<dyn Loggable>),
}

impl AttrValue {
    pub fn group(attrs: impl IntoIterator<Item = Attr>) -> Self {
        AttrValue::Group(attrs.into_iter().collect())
    }

    pub fn valuer<V: LogValuer + 'static>(valuer: V) -> Self {
        AttrValue::LogValuer(Arc::new(valuer))
    }

    pub fn any<T>(value: T) -> Self
    where
        T: Serialize + fmt::Debug + Send + Sync + 'static,
    {
        AttrValue::Any(Arc::new(value))
    }

    /// Call `log_value` until a non-valuer comes out.
    ///
    /// A valuer that keeps producing valuers is cut off after
    /// [`MAX_RESOLVE_STEPS`] and resolves to a string describing the loop.
    #[must_use]
    pub fn resolve(self) -> AttrValue {
        let mut current = self;
        for _ in 0..MAX_RESOLVE_STEPS {
            match current {
                AttrValue::LogValuer(valuer) => current = valuer.log_value(),
                resolved => return resolved,
            }
        }
        match current {
            AttrValue::LogValuer(valuer) => AttrValue::String(format!(
                "log_value called too many times on {:?}",
                valuer
            )),
            resolved => resolved,
        }
    }
}

/// A key paired with a deferred value
#[derive(Clone, Debug)]
pub struct Attr {
    pub key: String,
    pub value: AttrValue,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: AttrValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, AttrValue::String(value.into()))
    }

    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, AttrValue::Int64(value))
    }

    pub fn uint(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, AttrValue::Uint64(value))
    }

    pub fn float(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, AttrValue::Float64(value))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, AttrValue::Bool(value))
    }

    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, AttrValue::Duration(value))
    }

    pub fn time(key: impl Into<String>, value: DateTime<Utc>) -> Self {
        Self::new(key, AttrValue::Time(value))
    }

    /// A named group; an empty key makes the children inline into the parent
    pub fn group(key: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self::new(key, AttrValue::group(attrs))
    }

    pub fn any<T>(key: impl Into<String>, value: T) -> Self
    where
        T: Serialize + fmt::Debug + Send + Sync + 'static,
    {
        Self::new(key, AttrValue::any(value))
    }
}
