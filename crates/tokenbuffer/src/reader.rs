//! The reader role: a forward-only cursor over a buffer's segments.
use alloc::{borrow::Cow, string::ToString};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::{
    BufferError, Embedded, EventSource, NativeId, Number, NumberType, StreamContext, TokenKind,
    context::ContextStack,
    segment::{Segment, SegmentChain, TOKENS_PER_SEGMENT},
    token::Payload,
};

/// Lifecycle of a [`BufferReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// Not yet advanced.
    Fresh,
    /// Positioned on an event.
    InProgress,
    /// Ran past the last event.
    Exhausted,
    /// Closed by the caller. Terminal.
    Closed,
}

/// Replays a [`TokenBuffer`](crate::TokenBuffer), rebuilding the nesting
/// context as it goes.
///
/// Created by [`TokenBuffer::reader`](crate::TokenBuffer::reader). Each reader
/// owns its position and context; the buffer's storage is only borrowed.
#[derive(Debug, Clone)]
pub struct BufferReader<'a> {
    chain: &'a SegmentChain,
    has_native_type_ids: bool,
    has_native_object_ids: bool,
    segment: usize,
    slot: usize,
    state: ReaderState,
    current: Option<TokenKind>,
    context: ContextStack,
}

impl<'a> BufferReader<'a> {
    pub(crate) fn new(
        chain: &'a SegmentChain,
        has_native_type_ids: bool,
        has_native_object_ids: bool,
    ) -> Self {
        Self {
            chain,
            has_native_type_ids,
            has_native_object_ids,
            segment: 0,
            slot: 0,
            state: ReaderState::Fresh,
            current: None,
            context: ContextStack::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> ReaderState {
        self.state
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state == ReaderState::Closed
    }

    /// Stops the traversal; every later [`advance`](EventSource::advance)
    /// returns `None`. Idempotent.
    pub fn close(&mut self) {
        if self.state != ReaderState::Closed {
            tracing::trace!(segment = self.segment, slot = self.slot, "closing buffer reader");
            self.state = ReaderState::Closed;
            self.current = None;
        }
    }

    /// The nesting context reconstructed so far.
    #[must_use]
    pub fn context(&self) -> StreamContext<'_> {
        self.context.current()
    }

    fn next_position(&self) -> (usize, usize) {
        match self.state {
            ReaderState::Fresh => (0, 0),
            _ if self.slot + 1 == TOKENS_PER_SEGMENT => (self.segment + 1, 0),
            _ => (self.segment, self.slot + 1),
        }
    }

    fn kind_at(&self, (segment, slot): (usize, usize)) -> Option<TokenKind> {
        self.chain.segment(segment)?.kind_at(slot)
    }

    fn current_segment(&self) -> Option<&'a Segment> {
        self.current?;
        self.chain.segment(self.segment)
    }

    fn payload(&self) -> Option<&'a Payload> {
        let slot = self.slot;
        self.current_segment().map(|segment| segment.payload_at(slot))
    }

    /// Kind of the event after the current one, without moving.
    #[must_use]
    pub fn peek_next_kind(&self) -> Option<TokenKind> {
        match self.state {
            ReaderState::Exhausted | ReaderState::Closed => None,
            ReaderState::Fresh | ReaderState::InProgress => self.kind_at(self.next_position()),
        }
    }

    /// Advances and returns the name if the new event is a field name.
    pub fn next_name(&mut self) -> Option<&'a str> {
        if self.advance()? != TokenKind::FieldName {
            return None;
        }
        match self.payload()? {
            Payload::Text(name) => Some(&**name),
            _ => None,
        }
    }

    /// Name associated with the current event.
    ///
    /// For a field name and the value following it, that name. For a start
    /// marker, the name under which the container appears in its parent.
    #[must_use]
    pub fn current_name(&self) -> Option<&str> {
        let context = self.context.current();
        match self.current {
            Some(kind) if kind.is_start() => context.parent().and_then(|p| p.current_name()),
            _ => context.current_name(),
        }
    }

    /// The current number exactly as stored, without copying it.
    ///
    /// # Errors
    /// [`BufferError::EndOfStream`] without a current event,
    /// [`BufferError::TypeMismatch`] when it is not numeric.
    pub fn stored_number(&self) -> Result<&'a Number, BufferError> {
        let kind = self.current.ok_or(BufferError::EndOfStream)?;
        match self.payload() {
            Some(Payload::Number(n)) => Ok(n),
            _ => Err(BufferError::TypeMismatch {
                expected: "numeric",
                found: kind,
            }),
        }
    }

    /// Representation of the current number; textual numbers are decoded
    /// first.
    ///
    /// # Errors
    /// As [`stored_number`](Self::stored_number), or
    /// [`BufferError::InvalidNumber`] for undecodable text.
    pub fn number_type(&self) -> Result<NumberType, BufferError> {
        let number = self.stored_number()?;
        number
            .resolve()?
            .number_type()
            .ok_or_else(|| BufferError::InvalidNumber(number.to_string()))
    }

    /// Whether the current event is a floating NaN.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.stored_number().is_ok_and(Number::is_nan)
    }

    /// The current embedded value.
    ///
    /// # Errors
    /// [`BufferError::EndOfStream`] without a current event,
    /// [`BufferError::TypeMismatch`] for any other kind.
    pub fn embedded_value(&self) -> Result<&'a Embedded, BufferError> {
        let kind = self.current.ok_or(BufferError::EndOfStream)?;
        match self.payload() {
            Some(Payload::Embedded(value)) => Ok(value),
            _ => Err(BufferError::TypeMismatch {
                expected: "embedded",
                found: kind,
            }),
        }
    }

    /// Bytes of an embedded binary value.
    ///
    /// # Errors
    /// [`BufferError::EndOfStream`] without a current event,
    /// [`BufferError::TypeMismatch`] unless it is embedded binary.
    pub fn binary_value(&self) -> Result<&'a [u8], BufferError> {
        let kind = self.current.ok_or(BufferError::EndOfStream)?;
        self.embedded_value()
            .ok()
            .and_then(Embedded::as_bytes)
            .ok_or(BufferError::TypeMismatch {
                expected: "binary",
                found: kind,
            })
    }
}

impl EventSource for BufferReader<'_> {
    fn advance(&mut self) -> Option<TokenKind> {
        if matches!(self.state, ReaderState::Exhausted | ReaderState::Closed) {
            return None;
        }
        let (segment, slot) = self.next_position();
        let Some(kind) = self.kind_at((segment, slot)) else {
            self.state = ReaderState::Exhausted;
            self.current = None;
            return None;
        };
        self.state = ReaderState::InProgress;
        self.segment = segment;
        self.slot = slot;
        self.current = Some(kind);

        match kind {
            TokenKind::StartObject | TokenKind::StartArray => {
                if let Some(container) = kind.container_kind() {
                    self.context.push(container);
                }
            }
            TokenKind::EndObject | TokenKind::EndArray => {
                self.context.pop();
            }
            TokenKind::FieldName => {
                if let Some(Payload::Text(name)) = self.payload() {
                    self.context.set_name(name.clone());
                }
            }
            _ => self.context.update_for_value(),
        }
        Some(kind)
    }

    fn current_kind(&self) -> Option<TokenKind> {
        self.current
    }

    fn current_text(&self) -> Option<Cow<'_, str>> {
        let kind = self.current?;
        match self.payload()? {
            Payload::Text(text) => Some(Cow::Borrowed(&**text)),
            Payload::Number(n) => Some(Cow::Owned(n.to_string())),
            Payload::Embedded(_) => None,
            Payload::Absent => kind.as_literal().map(Cow::Borrowed),
        }
    }

    fn number_value(&self) -> Result<Number, BufferError> {
        self.stored_number().cloned()
    }

    fn as_i32(&self) -> Result<i32, BufferError> {
        self.stored_number()?.to_i32()
    }

    fn as_i64(&self) -> Result<i64, BufferError> {
        self.stored_number()?.to_i64()
    }

    fn as_bigint(&self) -> Result<BigInt, BufferError> {
        self.stored_number()?.to_bigint()
    }

    fn as_f32(&self) -> Result<f32, BufferError> {
        self.stored_number()?.to_f32()
    }

    fn as_f64(&self) -> Result<f64, BufferError> {
        self.stored_number()?.to_f64()
    }

    fn as_bigdecimal(&self) -> Result<BigDecimal, BufferError> {
        self.stored_number()?.to_bigdecimal()
    }

    fn current_embedded(&self) -> Option<&Embedded> {
        self.embedded_value().ok()
    }

    fn current_type_id(&self) -> Option<&NativeId> {
        self.current_segment()?.type_id_at(self.slot)
    }

    fn current_object_id(&self) -> Option<&NativeId> {
        self.current_segment()?.object_id_at(self.slot)
    }

    fn supports_type_ids(&self) -> bool {
        self.has_native_type_ids
    }

    fn supports_object_ids(&self) -> bool {
        self.has_native_object_ids
    }
}
