//! The vocabulary shared by the writer and reader roles.
//!
//! A [`TokenKind`] is one step of a structural/content stream. Kinds are
//! stored as 4-bit codes, so there can be at most 15 of them; code `0` is
//! reserved for "slot not in use".
//!
//! Payloads travel with the kinds that need them: names and strings carry
//! text, numeric kinds carry a [`Number`], embedded values carry an
//! [`Embedded`]. Structural markers, booleans and null carry nothing.
use alloc::{string::String, sync::Arc, vec::Vec};
use core::{any::Any, fmt};

use bigdecimal::BigDecimal;
use bstr::BString;
use num_bigint::BigInt;

use crate::{Number, Value};

/// The two container shapes.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// `{ ... }`
    Object,
    /// `[ ... ]`
    Array,
}

/// The closed set of event kinds.
///
/// Discriminants are the 4-bit codes stored in a segment's packed kind word.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    StartObject = 1,
    EndObject = 2,
    StartArray = 3,
    EndArray = 4,
    FieldName = 5,
    String = 6,
    Int = 7,
    Float = 8,
    True = 9,
    False = 10,
    Null = 11,
    Embedded = 12,
}

impl TokenKind {
    const BY_CODE: [Option<TokenKind>; 16] = [
        None,
        Some(Self::StartObject),
        Some(Self::EndObject),
        Some(Self::StartArray),
        Some(Self::EndArray),
        Some(Self::FieldName),
        Some(Self::String),
        Some(Self::Int),
        Some(Self::Float),
        Some(Self::True),
        Some(Self::False),
        Some(Self::Null),
        Some(Self::Embedded),
        None,
        None,
        None,
    ];

    /// The 4-bit code of this kind. Never zero.
    #[must_use]
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a 4-bit code; `0` and unassigned codes yield `None`.
    #[must_use]
    #[inline]
    pub const fn from_code(code: u8) -> Option<Self> {
        Self::BY_CODE[(code & 0xF) as usize]
    }

    /// The start marker for a container of the given shape.
    #[must_use]
    pub const fn start(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Object => Self::StartObject,
            ContainerKind::Array => Self::StartArray,
        }
    }

    /// The end marker for a container of the given shape.
    #[must_use]
    pub const fn end(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Object => Self::EndObject,
            ContainerKind::Array => Self::EndArray,
        }
    }

    /// The container shape this marker opens or closes.
    #[must_use]
    pub const fn container_kind(self) -> Option<ContainerKind> {
        match self {
            Self::StartObject | Self::EndObject => Some(ContainerKind::Object),
            Self::StartArray | Self::EndArray => Some(ContainerKind::Array),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_start(self) -> bool {
        matches!(self, Self::StartObject | Self::StartArray)
    }

    #[must_use]
    pub const fn is_end(self) -> bool {
        matches!(self, Self::EndObject | Self::EndArray)
    }

    /// Start and end markers.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        self.is_start() || self.is_end()
    }

    /// Every value kind except containers: strings, numbers, booleans, null
    /// and embedded values.
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Int
                | Self::Float
                | Self::True
                | Self::False
                | Self::Null
                | Self::Embedded
        )
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    #[must_use]
    pub const fn is_boolean(self) -> bool {
        matches!(self, Self::True | Self::False)
    }

    /// Literal text for kinds whose text never varies.
    #[must_use]
    pub const fn as_literal(self) -> Option<&'static str> {
        match self {
            Self::StartObject => Some("{"),
            Self::EndObject => Some("}"),
            Self::StartArray => Some("["),
            Self::EndArray => Some("]"),
            Self::True => Some("true"),
            Self::False => Some("false"),
            Self::Null => Some("null"),
            _ => None,
        }
    }

    /// The variant name, used in diagnostics and buffer dumps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::StartObject => "StartObject",
            Self::EndObject => "EndObject",
            Self::StartArray => "StartArray",
            Self::EndArray => "EndArray",
            Self::FieldName => "FieldName",
            Self::String => "String",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::True => "True",
            Self::False => "False",
            Self::Null => "Null",
            Self::Embedded => "Embedded",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An out-of-band identifier attached to a single event: a format-native
/// type tag or object identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NativeId {
    Str(Arc<str>),
    Int(i64),
}

impl fmt::Display for NativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for NativeId {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for NativeId {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<Arc<str>> for NativeId {
    fn from(s: Arc<str>) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for NativeId {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for NativeId {
    fn from(i: i32) -> Self {
        Self::Int(i.into())
    }
}

/// An opaque value carried through the stream unchanged.
#[derive(Clone)]
pub enum Embedded {
    /// Raw binary content.
    Binary(BString),
    /// Pre-encoded document text, passed through to the output verbatim.
    Raw(String),
    /// A nested document tree.
    Tree(Arc<Value>),
    /// Any other host value.
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Embedded {
    /// Wraps an arbitrary host value.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(Arc::new(value))
    }

    /// Borrows an opaque host value as `T`, if that is what it holds.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Opaque(v) => v.downcast_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) => Some(b.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Debug for Embedded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary(b) => f.debug_tuple("Binary").field(b).finish(),
            Self::Raw(r) => f.debug_tuple("Raw").field(r).finish(),
            Self::Tree(t) => f.debug_tuple("Tree").field(t).finish(),
            Self::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

// Opaque values have no notion of equality beyond identity.
impl PartialEq for Embedded {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Binary(a), Self::Binary(b)) => a == b,
            (Self::Raw(a), Self::Raw(b)) => a == b,
            (Self::Tree(a), Self::Tree(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Vec<u8>> for Embedded {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Binary(bytes.into())
    }
}

impl From<&[u8]> for Embedded {
    fn from(bytes: &[u8]) -> Self {
        Self::Binary(bytes.into())
    }
}

impl From<Value> for Embedded {
    fn from(tree: Value) -> Self {
        Self::Tree(Arc::new(tree))
    }
}

/// A scalar value handed to [`EventSink::scalar`](crate::EventSink::scalar).
///
/// Integral numbers produce [`TokenKind::Int`]; floating, decimal and textual
/// numbers produce [`TokenKind::Float`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(Arc<str>),
    Number(Number),
    Bool(bool),
    Null,
}

impl Scalar {
    /// The kind this scalar is recorded as.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::String(_) => TokenKind::String,
            Self::Number(n) if n.is_integral() => TokenKind::Int,
            Self::Number(_) => TokenKind::Float,
            Self::Bool(true) => TokenKind::True,
            Self::Bool(false) => TokenKind::False,
            Self::Null => TokenKind::Null,
        }
    }

    pub(crate) fn into_parts(self) -> (TokenKind, Payload) {
        let kind = self.kind();
        let payload = match self {
            Self::String(s) => Payload::Text(s),
            Self::Number(n) => Payload::Number(n),
            Self::Bool(_) | Self::Null => Payload::Absent,
        };
        (kind, payload)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<Arc<str>> for Scalar {
    fn from(s: Arc<str>) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

macro_rules! impl_scalar_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(n: $t) -> Self {
                    Self::Number(n.into())
                }
            }
        )*
    };
}

impl_scalar_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, BigInt, BigDecimal, Number);

/// What a slot stores beside its kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) enum Payload {
    #[default]
    Absent,
    Text(Arc<str>),
    Number(Number),
    Embedded(Embedded),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_and_zero_is_unused() {
        assert_eq!(TokenKind::from_code(0), None);
        for code in 1..=12u8 {
            let kind = TokenKind::from_code(code).unwrap();
            assert_eq!(kind.code(), code);
        }
        assert_eq!(TokenKind::from_code(13), None);
        assert_eq!(TokenKind::from_code(15), None);
    }

    #[test]
    fn classification() {
        assert!(TokenKind::Int.is_numeric());
        assert!(TokenKind::Float.is_scalar());
        assert!(TokenKind::Embedded.is_scalar());
        assert!(!TokenKind::FieldName.is_scalar());
        assert!(!TokenKind::FieldName.is_structural());
        assert!(TokenKind::EndArray.is_structural());
        assert_eq!(
            TokenKind::EndArray.container_kind(),
            Some(ContainerKind::Array)
        );
        assert_eq!(TokenKind::start(ContainerKind::Object), TokenKind::StartObject);
        assert_eq!(TokenKind::True.as_literal(), Some("true"));
        assert_eq!(TokenKind::String.as_literal(), None);
    }

    #[test]
    fn scalar_kinds_follow_number_representation() {
        assert_eq!(Scalar::from(1i32).kind(), TokenKind::Int);
        assert_eq!(Scalar::from(BigInt::from(7)).kind(), TokenKind::Int);
        assert_eq!(Scalar::from(1.5f64).kind(), TokenKind::Float);
        assert_eq!(
            Scalar::Number(Number::Textual("12".into())).kind(),
            TokenKind::Float
        );
        assert_eq!(Scalar::from(None::<i32>), Scalar::Null);
        assert_eq!(Scalar::from(false).kind(), TokenKind::False);
    }

    #[test]
    fn opaque_values_compare_by_identity() {
        let a = Embedded::opaque(5u32);
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Embedded::opaque(5u32));
        assert_eq!(a.downcast_ref::<u32>(), Some(&5));
        assert_eq!(a.downcast_ref::<i64>(), None);
    }
}
