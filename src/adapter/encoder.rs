//! Field encoder
//!
//! Turns a flat key/value argument list into a [`LogContext`]. Encoding never
//! fails; malformed input is dropped and unencodable values degrade to text.
//!
//! Policy:
//! - an odd number of arguments discards the whole list
//! - a pair whose key is not a string is skipped
//! - values resolve in order: [`Marshaler`], lazily-resolvable [`AttrValue`],
//!   native scalars and errors, byte sequences, then the fallback (custom
//!   formatter if configured, JSON text otherwise)
//!
//! [`Marshaler`]: super::value::Marshaler

use super::attr::AttrValue;
use super::value::{FormatFn, Loggable, Value};
use crate::core::{FieldValue, LogContext};

/// Encode `args` into a fresh field mapping
///
/// ```
/// use rust_logr_adapter::{adapter::encoder::encode, kv, FieldValue};
///
/// let fields = encode(None, &kv!["animal", b"walrus".to_vec(), 42, "dropped"]);
/// assert_eq!(fields.get("animal"), Some(&FieldValue::from("walrus")));
/// assert_eq!(fields.len(), 1);
/// ```
pub fn encode(formatter: Option<&FormatFn>, args: &[Value]) -> LogContext {
    let mut fields = LogContext::new();
    encode_into(&mut fields, formatter, args);
    fields
}

/// Encode `args` over an existing mapping; later keys overwrite earlier ones
pub fn encode_into(fields: &mut LogContext, formatter: Option<&FormatFn>, args: &[Value]) {
    if args.len() % 2 != 0 {
        return;
    }

    for pair in args.chunks_exact(2) {
        let Some(key) = pair[0].as_key() else {
            continue;
        };
        encode_value(fields, formatter, key, &pair[1]);
    }
}

fn encode_value(fields: &mut LogContext, formatter: Option<&FormatFn>, key: &str, value: &Value) {
    match value {
        Value::Marshaler(marshaler) => {
            let marshaled = marshaler.marshal_log();
            encode_plain(fields, formatter, key, &marshaled);
        }
        other => encode_plain(fields, formatter, key, other),
    }
}

/// Every rule except the marshal step
fn encode_plain(fields: &mut LogContext, formatter: Option<&FormatFn>, key: &str, value: &Value) {
    match value {
        // A marshaler that marshals to another marshaler is not invoked again
        Value::Marshaler(marshaler) => {
            fields.add_field(key, FieldValue::String(format!("{:?}", marshaler)))
        }
        Value::Attr(attr) => resolve_into(fields, formatter, key, attr.clone()),
        Value::Int(i) => fields.add_field(key, FieldValue::Int(*i)),
        Value::Uint(u) => fields.add_field(key, FieldValue::Uint(*u)),
        Value::Float(f) => fields.add_field(key, FieldValue::Float(*f)),
        Value::Str(s) => fields.add_field(key, FieldValue::String(s.clone())),
        Value::Bool(b) => fields.add_field(key, FieldValue::Bool(*b)),
        Value::Complex(c) => fields.add_field(key, FieldValue::Complex(*c)),
        Value::Error(err) => fields.add_field(key, FieldValue::String(err.to_string())),
        Value::Bytes(bytes) => {
            fields.add_field(key, FieldValue::String(String::from_utf8_lossy(bytes).into_owned()))
        }
        Value::Any(any) => fields.add_field(key, fallback(formatter, any.as_ref())),
    }
}

/// Resolve a deferred value into `target` under `key`.
///
/// A group with a non-empty key nests as a sub-mapping; a group with an
/// empty key merges its children straight into `target`. Empty groups
/// contribute nothing.
pub fn resolve_into(
    target: &mut LogContext,
    formatter: Option<&FormatFn>,
    key: &str,
    value: AttrValue,
) {
    match value.resolve() {
        AttrValue::String(s) => target.add_field(key, FieldValue::String(s)),
        AttrValue::Int64(i) => target.add_field(key, FieldValue::Int(i)),
        AttrValue::Uint64(u) => target.add_field(key, FieldValue::Uint(u)),
        AttrValue::Float64(f) => target.add_field(key, FieldValue::Float(f)),
        AttrValue::Bool(b) => target.add_field(key, FieldValue::Bool(b)),
        AttrValue::Duration(d) => target.add_field(key, FieldValue::Duration(d)),
        AttrValue::Time(t) => target.add_field(key, FieldValue::Time(t)),
        AttrValue::Group(attrs) => {
            if key.is_empty() {
                for attr in attrs {
                    resolve_into(target, formatter, &attr.key, attr.value);
                }
                return;
            }
            if attrs.is_empty() {
                return;
            }
            let mut nested = LogContext::new();
            for attr in attrs {
                resolve_into(&mut nested, formatter, &attr.key, attr.value);
            }
            target.add_field(key, FieldValue::Group(nested));
        }
        // resolve() never hands back a valuer
        AttrValue::LogValuer(valuer) => {
            target.add_field(key, FieldValue::String(format!("{:?}", valuer)))
        }
        AttrValue::Any(any) => target.add_field(key, fallback(formatter, any.as_ref())),
    }
}

/// Encode a value with no special handling
///
/// The formatter wins when configured. Otherwise the value's JSON text is
/// used, and a serialization failure yields a placeholder string.
pub fn fallback(formatter: Option<&FormatFn>, value: &dyn Loggable) -> FieldValue {
    if let Some(format) = formatter {
        return format(value);
    }
    match value.to_json() {
        Ok(json) => FieldValue::String(json),
        Err(err) => FieldValue::String(format!("<unencodable: {}>", err)),
    }
}
