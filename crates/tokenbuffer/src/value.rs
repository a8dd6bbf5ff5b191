//! Document trees.
//!
//! A [`Value`] is the materialized form of one complete value in an event
//! stream. [`Value::write_to`] turns a tree back into events and
//! [`TreeBuilder`](crate::TreeBuilder) goes the other way.
use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::fmt::{self, Write};

use bstr::ByteSlice;

use crate::{BufferError, Embedded, EventSink, Number, Scalar};

pub type Map = BTreeMap<String, Value>;
pub type Array = Vec<Value>;

/// A document tree.
///
/// Numbers keep their stored representation and embedded values are carried
/// as is.
///
/// # Examples
///
/// ```
/// use tokenbuffer::{Map, TokenBuffer, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::from("value"));
/// let v = Value::Object(map);
///
/// let mut buffer = TokenBuffer::default();
/// v.write_to(&mut buffer)?;
/// assert_eq!(buffer.to_string(), "[TokenBuffer: StartObject, FieldName(key), String, EndObject]");
/// assert_eq!(buffer.to_values()?, vec![v]);
/// # Ok::<(), tokenbuffer::BufferError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Array),
    Object(Map),
    Embedded(Embedded),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Number> for Value {
    fn from(v: Number) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Number(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl From<Embedded> for Value {
    fn from(v: Embedded) -> Self {
        Self::Embedded(v)
    }
}

impl From<Scalar> for Value {
    fn from(v: Scalar) -> Self {
        match v {
            Scalar::String(s) => Self::String(s.as_ref().into()),
            Scalar::Number(n) => Self::Number(n),
            Scalar::Bool(b) => Self::Bool(b),
            Scalar::Null => Self::Null,
        }
    }
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(..))
    }

    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(..))
    }

    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// Member `key` of an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Writes this tree as a sequence of events. Object members are written
    /// in key order.
    ///
    /// # Errors
    /// Whatever `sink` reports.
    pub fn write_to<W: EventSink + ?Sized>(&self, sink: &mut W) -> Result<(), BufferError> {
        match self {
            Self::Null => sink.scalar(Scalar::Null),
            Self::Bool(b) => sink.scalar(Scalar::Bool(*b)),
            Self::Number(n) => sink.scalar(Scalar::Number(n.clone())),
            Self::String(s) => sink.scalar(Scalar::String(s.as_str().into())),
            Self::Array(items) => {
                sink.start_array()?;
                for item in items {
                    item.write_to(sink)?;
                }
                sink.end_array()
            }
            Self::Object(map) => {
                sink.start_object()?;
                for (key, value) in map {
                    sink.field_name(key.as_str().into())?;
                    value.write_to(sink)?;
                }
                sink.end_object()
            }
            Self::Embedded(e) => sink.embedded(e.clone()),
        }
    }
}

/// Escapes a string for inclusion in a JSON string literal.
fn write_escaped_string<W: Write>(src: &str, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\u{2028}' | '\u{2029}' => write!(f, "\\u{:04X}", c as u32)?,
            c if c.is_ascii_control() || c.is_control() && c as u32 <= 0xFFFF => {
                write!(f, "\\u{:04X}", c as u32)?;
            }
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Renders as JSON text. Raw embedded text is written verbatim, binary as a
/// lossily decoded string, and opaque host values as `null`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => {
                f.write_char('"')?;
                write_escaped_string(s, f)?;
                f.write_char('"')
            }
            Value::Array(arr) => {
                f.write_str("[")?;
                let mut first = true;
                for v in arr {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                let mut first = true;
                for (k, v) in map {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    f.write_char('"')?;
                    write_escaped_string(k, f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_str("}")
            }
            Value::Embedded(Embedded::Raw(raw)) => f.write_str(raw),
            Value::Embedded(Embedded::Tree(tree)) => write!(f, "{tree}"),
            Value::Embedded(Embedded::Binary(bytes)) => {
                f.write_char('"')?;
                write_escaped_string(&bytes.to_str_lossy(), f)?;
                f.write_char('"')
            }
            Value::Embedded(Embedded::Opaque(_)) => f.write_str("null"),
        }
    }
}
