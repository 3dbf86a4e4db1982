//! Typed key/value fields attached to log records.
//!
//! Fields are an ordered sequence of [`Field`] values. Each key is a string
//! and each value a [`Value`]. The [`kv!`](crate::kv) macro builds them from
//! `key => value` pairs, so a key without a value cannot be written. When a
//! loose alternating list has to be accepted, [`pairs`] converts it and
//! rejects odd lengths instead of truncating.

use serde_json::Value as Json;
use std::fmt;
use thiserror::Error;

/// A field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text, also used for anything rendered through [`Value::display`]
    Str(String),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    Uint(u64),
    /// Floating point number
    Float(f64),
    /// Boolean flag
    Bool(bool),
    /// Placeholder for a value that was never supplied
    Missing,
}

impl Value {
    /// Capture any displayable value as text.
    pub fn display(value: impl fmt::Display) -> Self {
        Value::Str(value.to_string())
    }

    /// Borrow the text of a `Str` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// JSON equivalent. Non-finite floats have no JSON number and become text.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Str(s) => Json::String(s.clone()),
            Value::Int(n) => Json::from(*n),
            Value::Uint(n) => Json::from(*n),
            Value::Float(n) => serde_json::Number::from_f64(*n)
                .map(Json::Number)
                .unwrap_or_else(|| Json::String(n.to_string())),
            Value::Bool(b) => Json::Bool(*b),
            Value::Missing => Json::Null,
        }
    }

    /// Inverse of [`Value::to_json`]. Arrays and objects are kept as their
    /// JSON text.
    pub fn from_json(json: Json) -> Self {
        match json {
            Json::Null => Value::Missing,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
                (Some(i), _, _) => Value::Int(i),
                (None, Some(u), _) => Value::Uint(u),
                (None, None, Some(f)) => Value::Float(f),
                (None, None, None) => Value::Str(n.to_string()),
            },
            Json::String(s) => Value::Str(s),
            other => Value::Str(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Uint(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Missing => f.write_str("<missing>"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Str(value.clone())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

macro_rules! impl_from_int {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::$variant(value as $target)
                }
            }
        )*
    };
}

impl_from_int!(Int as i64: i8, i16, i32, i64, isize);
impl_from_int!(Uint as u64: u8, u16, u32, u64, usize);

/// One key/value pair attached to a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: String,
    value: Value,
}

impl Field {
    /// Create a field from anything convertible into a key and a [`Value`].
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Field key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Field value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Renders as `key=value`, quoting the value when it would otherwise be
/// ambiguous on a logfmt line.
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.value.to_string();
        if needs_quoting(&rendered) {
            write!(f, "{}={:?}", self.key, rendered)
        } else {
            write!(f, "{}={}", self.key, rendered)
        }
    }
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '=' || c == '"' || c.is_control())
}

/// Space-separated logfmt rendering of one or more field slices.
///
/// Slices are rendered in order, which is how attached fields end up ahead
/// of per-call fields.
#[derive(Debug, Clone, Copy)]
pub struct FieldsDisplay<'a> {
    groups: &'a [&'a [Field]],
}

impl<'a> FieldsDisplay<'a> {
    /// Render the given groups back to back.
    pub fn new(groups: &'a [&'a [Field]]) -> Self {
        Self { groups }
    }

    /// True when no group holds a field.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|group| group.is_empty())
    }
}

impl fmt::Display for FieldsDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for field in self.groups.iter().flat_map(|group| group.iter()) {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}

/// Encode fields as a JSON array of `[key, value]` pairs.
///
/// This is how a record's fields travel inside a single `tracing` event
/// field: order, duplicates and value types all survive
/// [`decode_fields`].
///
/// ```
/// use tracelogr::field::{decode_fields, encode_fields, Field};
/// use tracelogr::kv;
///
/// let fields = kv!["v" => 0, "err" => "whoops"];
/// let encoded = encode_fields(&[&fields]);
/// assert_eq!(encoded, r#"[["v",0],["err","whoops"]]"#);
/// assert_eq!(decode_fields(&encoded), Some(fields));
/// ```
pub fn encode_fields(groups: &[&[Field]]) -> String {
    let pairs = groups
        .iter()
        .flat_map(|group| group.iter())
        .map(|field| Json::Array(vec![Json::String(field.key.clone()), field.value.to_json()]))
        .collect();
    Json::Array(pairs).to_string()
}

/// Decode the output of [`encode_fields`]. `None` when `encoded` is not a
/// list of `[string, value]` pairs.
pub fn decode_fields(encoded: &str) -> Option<Vec<Field>> {
    let Json::Array(pairs) = serde_json::from_str(encoded).ok()? else {
        return None;
    };
    pairs
        .into_iter()
        .map(|pair| match pair {
            Json::Array(mut entry) if entry.len() == 2 => {
                let value = entry.pop()?;
                match entry.pop()? {
                    Json::String(key) => Some(Field {
                        key,
                        value: Value::from_json(value),
                    }),
                    _ => None,
                }
            }
            _ => None,
        })
        .collect()
}

/// Errors converting a loose alternating key/value list into fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// The list ended on a key with no value.
    #[error("Odd number of key/value items ({len}); the last key has no value")]
    OddCount { len: usize },

    /// A key position held something other than a string.
    #[error("Key at index {index} is not a string")]
    NonStringKey { index: usize },
}

/// Convert an alternating `key, value, key, value, ...` list into fields.
///
/// Keys must be [`Value::Str`]. An odd-length list fails with
/// [`FieldError::OddCount`] before anything is converted.
///
/// ```
/// use tracelogr::field::{pairs, FieldError, Value};
///
/// let fields = pairs(vec!["key".into(), Value::from(1)]).unwrap();
/// assert_eq!(fields[0].to_string(), "key=1");
///
/// let err = pairs(vec!["dangling".into()]).unwrap_err();
/// assert_eq!(err, FieldError::OddCount { len: 1 });
/// ```
pub fn pairs(items: Vec<Value>) -> Result<Vec<Field>, FieldError> {
    if items.len() % 2 != 0 {
        return Err(FieldError::OddCount { len: items.len() });
    }

    let mut fields = Vec::with_capacity(items.len() / 2);
    let mut iter = items.into_iter().enumerate();
    while let (Some((index, key)), Some((_, value))) = (iter.next(), iter.next()) {
        match key {
            Value::Str(key) => fields.push(Field { key, value }),
            _ => return Err(FieldError::NonStringKey { index }),
        }
    }
    Ok(fields)
}

/// Build a `Vec<Field>` from `key => value` pairs.
///
/// ```
/// use tracelogr::kv;
///
/// let fields = kv!["user" => "ada", "attempt" => 3];
/// assert_eq!(fields.len(), 2);
/// assert_eq!(fields[1].to_string(), "attempt=3");
/// ```
#[macro_export]
macro_rules! kv {
    () => {
        ::std::vec::Vec::<$crate::field::Field>::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        ::std::vec![$($crate::field::Field::new($key, $value)),+]
    };
}
