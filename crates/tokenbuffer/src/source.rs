//! The reading side of an event stream.
use alloc::borrow::Cow;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::{BufferError, Embedded, NativeId, Number, TokenKind};

/// A forward-only stream of events: a live document reader, or a
/// [`BufferReader`](crate::BufferReader) replaying a buffer.
///
/// Accessors describe the *current* event, the one most recently returned by
/// [`advance`](Self::advance).
pub trait EventSource {
    /// Moves to the next event and returns its kind, or `None` at the end.
    fn advance(&mut self) -> Option<TokenKind>;

    /// Kind of the current event.
    fn current_kind(&self) -> Option<TokenKind>;

    /// Text of the current event: the name or string for names and strings,
    /// canonical number text for numbers, the literal for everything else.
    /// `None` for embedded values or when there is no current event.
    fn current_text(&self) -> Option<Cow<'_, str>>;

    /// The current number exactly as stored.
    ///
    /// # Errors
    /// [`BufferError::EndOfStream`] without a current event,
    /// [`BufferError::TypeMismatch`] when it is not numeric.
    fn number_value(&self) -> Result<Number, BufferError>;

    /// # Errors
    /// As [`number_value`](Self::number_value), or
    /// [`BufferError::NumericOverflow`] when the value does not fit.
    fn as_i32(&self) -> Result<i32, BufferError> {
        self.number_value()?.to_i32()
    }

    /// # Errors
    /// As [`number_value`](Self::number_value), or
    /// [`BufferError::NumericOverflow`] when the value does not fit.
    fn as_i64(&self) -> Result<i64, BufferError> {
        self.number_value()?.to_i64()
    }

    /// # Errors
    /// As [`number_value`](Self::number_value), or
    /// [`BufferError::NumericOverflow`] for non-finite floats.
    fn as_bigint(&self) -> Result<BigInt, BufferError> {
        self.number_value()?.to_bigint()
    }

    /// # Errors
    /// As [`number_value`](Self::number_value), or
    /// [`BufferError::NumericOverflow`] when the value does not fit.
    fn as_f32(&self) -> Result<f32, BufferError> {
        self.number_value()?.to_f32()
    }

    /// # Errors
    /// As [`number_value`](Self::number_value), or
    /// [`BufferError::NumericOverflow`] when the value does not fit.
    fn as_f64(&self) -> Result<f64, BufferError> {
        self.number_value()?.to_f64()
    }

    /// # Errors
    /// As [`number_value`](Self::number_value), or
    /// [`BufferError::InvalidNumber`] for non-finite floats.
    fn as_bigdecimal(&self) -> Result<BigDecimal, BufferError> {
        self.number_value()?.to_bigdecimal()
    }

    /// The embedded value, only when the current event is one.
    fn current_embedded(&self) -> Option<&Embedded>;

    /// Native type id of the current event.
    fn current_type_id(&self) -> Option<&NativeId> {
        None
    }

    /// Native object id of the current event.
    fn current_object_id(&self) -> Option<&NativeId> {
        None
    }

    /// Whether this source can report native type ids at all.
    fn supports_type_ids(&self) -> bool {
        false
    }

    /// Whether this source can report native object ids at all.
    fn supports_object_ids(&self) -> bool {
        false
    }
}

impl<S: EventSource + ?Sized> EventSource for &mut S {
    fn advance(&mut self) -> Option<TokenKind> {
        (**self).advance()
    }

    fn current_kind(&self) -> Option<TokenKind> {
        (**self).current_kind()
    }

    fn current_text(&self) -> Option<Cow<'_, str>> {
        (**self).current_text()
    }

    fn number_value(&self) -> Result<Number, BufferError> {
        (**self).number_value()
    }

    fn as_i32(&self) -> Result<i32, BufferError> {
        (**self).as_i32()
    }

    fn as_i64(&self) -> Result<i64, BufferError> {
        (**self).as_i64()
    }

    fn as_bigint(&self) -> Result<BigInt, BufferError> {
        (**self).as_bigint()
    }

    fn as_f32(&self) -> Result<f32, BufferError> {
        (**self).as_f32()
    }

    fn as_f64(&self) -> Result<f64, BufferError> {
        (**self).as_f64()
    }

    fn as_bigdecimal(&self) -> Result<BigDecimal, BufferError> {
        (**self).as_bigdecimal()
    }

    fn current_embedded(&self) -> Option<&Embedded> {
        (**self).current_embedded()
    }

    fn current_type_id(&self) -> Option<&NativeId> {
        (**self).current_type_id()
    }

    fn current_object_id(&self) -> Option<&NativeId> {
        (**self).current_object_id()
    }

    fn supports_type_ids(&self) -> bool {
        (**self).supports_type_ids()
    }

    fn supports_object_ids(&self) -> bool {
        (**self).supports_object_ids()
    }
}
