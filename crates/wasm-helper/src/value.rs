//! Resolved host values.
//!
//! Every lookup into the host graph produces a [`Value`]. Scalars are copied
//! out; objects and functions stay behind opaque handles owned by the host.

use serde::ser::{Error as _, Serialize, Serializer};
use std::fmt;

/// The dynamic kind of a host value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Undefined,
    Null,
    Bool,
    Number,
    Text,
    Object,
    Function,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Undefined => "undefined",
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Number => "number",
            ValueKind::Text => "string",
            ValueKind::Object => "object",
            ValueKind::Function => "function",
        };
        f.write_str(name)
    }
}

/// A value read from (or written to) the host graph.
///
/// `O` and `F` are the host's object and function handles. Call sites match
/// on the variant instead of comparing against undefined/null sentinels.
#[derive(Clone, Debug, PartialEq)]
pub enum Value<O, F> {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Object(O),
    Function(F),
}

impl<O, F> Value<O, F> {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Undefined => ValueKind::Undefined,
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::Text(_) => ValueKind::Text,
            Value::Object(_) => ValueKind::Object,
            Value::Function(_) => ValueKind::Function,
        }
    }

    /// True for `undefined` and `null`, the two values a path cannot pass through.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Integer extraction. Truncates toward zero; `None` for non-finite numbers
    /// and for every other kind.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&O> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&F> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }
}

impl<O, F> Default for Value<O, F> {
    fn default() -> Self {
        Value::Undefined
    }
}

impl<O, F> From<()> for Value<O, F> {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl<O, F> From<bool> for Value<O, F> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<O, F> From<f64> for Value<O, F> {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl<O, F> From<i32> for Value<O, F> {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl<O, F> From<u32> for Value<O, F> {
    fn from(n: u32) -> Self {
        Value::Number(n.into())
    }
}

impl<O, F> From<&str> for Value<O, F> {
    fn from(text: &str) -> Self {
        Value::Text(text.to_owned())
    }
}

impl<O, F> From<String> for Value<O, F> {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

/// Renders the value the way the host stringifies it.
impl<O: fmt::Debug, F: fmt::Debug> fmt::Display for Value<O, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{}", *n as i64),
            Value::Number(n) if n.is_nan() => f.write_str("NaN"),
            Value::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(text) => f.write_str(text),
            Value::Object(object) => write!(f, "{object:?}"),
            Value::Function(function) => write!(f, "{function:?}"),
        }
    }
}

/// Scalars serialize natively; host handles cannot leave the host.
impl<O, F> Serialize for Value<O, F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(text) => serializer.serialize_str(text),
            Value::Object(_) | Value::Function(_) => Err(S::Error::custom(format!(
                "cannot serialize a host {} handle",
                self.kind()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Plain = Value<(), ()>;

    #[test]
    fn nullish_covers_undefined_and_null_only() {
        assert!(Plain::Undefined.is_nullish());
        assert!(Plain::Null.is_nullish());
        assert!(!Plain::from(0).is_nullish());
        assert!(!Plain::from("").is_nullish());
        assert!(!Plain::from(false).is_nullish());
    }

    #[test]
    fn int_extraction_truncates() {
        assert_eq!(Plain::from(6).as_int(), Some(6));
        assert_eq!(Plain::from(-2.9).as_int(), Some(-2));
        assert_eq!(Plain::from(f64::NAN).as_int(), None);
        assert_eq!(Plain::from("6").as_int(), None);
    }

    #[test]
    fn display_matches_host_stringification() {
        assert_eq!(Plain::Undefined.to_string(), "undefined");
        assert_eq!(Plain::Null.to_string(), "null");
        assert_eq!(Plain::from(6).to_string(), "6");
        assert_eq!(Plain::from(1.5).to_string(), "1.5");
        assert_eq!(Plain::from(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Plain::from("hello").to_string(), "hello");
    }

    #[test]
    fn handles_refuse_to_serialize() {
        assert_eq!(serde_json::to_string(&Plain::from(5)).unwrap(), "5.0");
        assert_eq!(serde_json::to_string(&Plain::Undefined).unwrap(), "null");
        let error = serde_json::to_string(&Plain::Object(())).unwrap_err();
        assert!(error.to_string().contains("object"));
    }
}
