//! The writer role: an append-only, replayable buffer of events.
//!
//! ```rust
//! use tokenbuffer::{EventSink, EventSource, TokenBuffer, TokenKind};
//!
//! let mut buffer = TokenBuffer::default();
//! buffer.start_object()?;
//! buffer.write_name("id")?;
//! buffer.write_number(7)?;
//! buffer.end_object()?;
//!
//! let mut reader = buffer.reader();
//! assert_eq!(reader.advance(), Some(TokenKind::StartObject));
//! assert_eq!(reader.advance(), Some(TokenKind::FieldName));
//! assert_eq!(reader.advance(), Some(TokenKind::Int));
//! assert_eq!(reader.as_i64()?, 7);
//! # Ok::<(), tokenbuffer::BufferError>(())
//! ```
use alloc::{string::String, sync::Arc, vec::Vec};
use core::fmt;

use bstr::BString;

use crate::{
    BufferError, BufferOptions, BufferReader, ContainerKind, CopyOptions, Embedded, EventSink,
    EventSource, NativeId, Scalar, StreamContext, TokenKind, TreeBuilder, Value,
    context::ContextStack,
    copy,
    segment::{PendingIds, SegmentChain},
    token::Payload,
};

/// Tokens listed by `Display` before the rest are summarized.
const DISPLAY_LIMIT: usize = 100;

/// An in-memory, append-only sequence of events that can be replayed any
/// number of times.
///
/// Writing goes through the [`EventSink`] methods; reading through
/// [`reader`](Self::reader). Readers borrow the buffer, so appends cannot
/// interleave with an active read. Any number of readers may traverse the same
/// buffer at once, including from different threads.
#[derive(Debug, Clone)]
pub struct TokenBuffer {
    chain: SegmentChain,
    context: ContextStack,
    pending: PendingIds,
    has_native_type_ids: bool,
    has_native_object_ids: bool,
    may_have_native_ids: bool,
    force_wide_decimal: bool,
}

impl Default for TokenBuffer {
    fn default() -> Self {
        Self::new(BufferOptions::default())
    }
}

impl TokenBuffer {
    #[must_use]
    pub fn new(options: BufferOptions) -> Self {
        Self {
            chain: SegmentChain::new(),
            context: ContextStack::new(),
            pending: PendingIds::default(),
            has_native_type_ids: options.has_native_ids,
            has_native_object_ids: options.has_native_ids,
            may_have_native_ids: options.has_native_ids,
            force_wide_decimal: options.force_wide_decimal,
        }
    }

    /// A buffer for content generated in-process, without native ids.
    #[must_use]
    pub fn for_generation() -> Self {
        Self::new(BufferOptions::default())
    }

    /// A buffer that captures events from `source`, advertising whichever
    /// native ids the source supports.
    #[must_use]
    pub fn for_source<S: EventSource + ?Sized>(source: &S, force_wide_decimal: bool) -> Self {
        let has_native_type_ids = source.supports_type_ids();
        let has_native_object_ids = source.supports_object_ids();
        Self {
            has_native_type_ids,
            has_native_object_ids,
            may_have_native_ids: has_native_type_ids || has_native_object_ids,
            force_wide_decimal,
            ..Self::default()
        }
    }

    /// Captures the structure the source is positioned on into a new buffer.
    ///
    /// # Errors
    /// As [`copy_current_structure`](Self::copy_current_structure).
    pub fn capture<S: EventSource + ?Sized>(source: &mut S) -> Result<Self, BufferError> {
        let mut buffer = Self::for_source(&*source, false);
        buffer.copy_current_structure(source)?;
        Ok(buffer)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Number of events written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Kind of the first event, without creating a reader.
    #[must_use]
    pub fn first_token(&self) -> Option<TokenKind> {
        self.chain.first_kind()
    }

    #[must_use]
    pub fn can_write_type_id(&self) -> bool {
        self.has_native_type_ids
    }

    #[must_use]
    pub fn can_write_object_id(&self) -> bool {
        self.has_native_object_ids
    }

    /// Whether events may carry native ids that copies need to preserve.
    #[must_use]
    pub fn may_have_native_ids(&self) -> bool {
        self.may_have_native_ids
    }

    #[must_use]
    pub fn force_wide_decimal(&self) -> bool {
        self.force_wide_decimal
    }

    /// The writer's nesting context.
    #[must_use]
    pub fn write_context(&self) -> StreamContext<'_> {
        self.context.current()
    }

    /// A fresh reader positioned before the first event.
    #[must_use]
    pub fn reader(&self) -> BufferReader<'_> {
        BufferReader::new(
            &self.chain,
            self.has_native_type_ids,
            self.has_native_object_ids,
        )
    }

    /// A reader already advanced onto the first event.
    #[must_use]
    pub fn reader_on_first_token(&self) -> BufferReader<'_> {
        let mut reader = self.reader();
        reader.advance();
        reader
    }

    fn copy_options(&self) -> CopyOptions {
        CopyOptions {
            copy_native_ids: self.may_have_native_ids,
            force_wide_decimal: self.force_wide_decimal,
        }
    }

    /// Appends every event of `other`, leaving `other` untouched.
    ///
    /// Native id support is the union of both buffers. Unbalanced content in
    /// `other`, such as a leading field name or a stray end marker, is copied
    /// verbatim.
    ///
    /// # Errors
    /// Only if `other` holds a trailing field name with no value.
    pub fn append(&mut self, other: &TokenBuffer) -> Result<&mut Self, BufferError> {
        self.has_native_type_ids |= other.has_native_type_ids;
        self.has_native_object_ids |= other.has_native_object_ids;
        self.may_have_native_ids = self.has_native_type_ids || self.has_native_object_ids;

        let options = self.copy_options();
        let before = self.len();
        let mut reader = other.reader();
        while reader.advance().is_some() {
            copy::copy_current_structure(&mut reader, self, options)?;
        }
        tracing::debug!(appended = self.len() - before, total = self.len(), "appended token buffer");
        Ok(self)
    }

    /// Replays every event into `sink`, native ids included.
    ///
    /// # Errors
    /// Whatever `sink` reports.
    pub fn serialize<W: EventSink + ?Sized>(&self, sink: &mut W) -> Result<(), BufferError> {
        let options = CopyOptions {
            copy_native_ids: self.may_have_native_ids,
            force_wide_decimal: false,
        };
        let mut reader = self.reader();
        while reader.advance().is_some() {
            copy::copy_current_event(&reader, sink, options)?;
        }
        Ok(())
    }

    /// Materializes the buffered values as document trees, one per root.
    ///
    /// # Errors
    /// [`BufferError::Structural`] if the buffer is not a sequence of
    /// complete values.
    pub fn to_values(&self) -> Result<Vec<Value>, BufferError> {
        let mut builder = TreeBuilder::new();
        self.serialize(&mut builder)?;
        builder.finish()
    }

    /// Copies the source's current event.
    ///
    /// # Errors
    /// As [`copy::copy_current_event`].
    pub fn copy_current_event<S: EventSource + ?Sized>(
        &mut self,
        source: &S,
    ) -> Result<(), BufferError> {
        let options = self.copy_options();
        copy::copy_current_event(source, self, options)
    }

    /// Copies the source's current value with all its contents.
    ///
    /// # Errors
    /// As [`copy::copy_current_structure`].
    pub fn copy_current_structure<S: EventSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<(), BufferError> {
        let options = self.copy_options();
        copy::copy_current_structure(source, self, options)
    }

    /// Copies one structure, wrapping a dangling run of fields in an object.
    ///
    /// # Errors
    /// As [`copy::copy_structure`].
    pub fn copy_structure<S: EventSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<(), BufferError> {
        let options = self.copy_options();
        copy::copy_structure(source, self, options)
    }

    /// Stores pre-encoded text to be passed through verbatim on output.
    ///
    /// # Errors
    /// Never; the signature matches the other writes.
    pub fn write_raw_value(&mut self, text: impl Into<String>) -> Result<(), BufferError> {
        self.embedded(Embedded::Raw(text.into()))
    }

    /// # Errors
    /// Never; the signature matches the other writes.
    pub fn write_binary(&mut self, bytes: impl Into<BString>) -> Result<(), BufferError> {
        self.embedded(Embedded::Binary(bytes.into()))
    }

    /// Stores a whole document tree as one embedded value.
    ///
    /// # Errors
    /// Never; the signature matches the other writes.
    pub fn write_tree(&mut self, tree: Value) -> Result<(), BufferError> {
        self.embedded(Embedded::from(tree))
    }

    /// Raw UTF-8 string content cannot be held without escaping it.
    ///
    /// # Errors
    /// Always [`BufferError::Unsupported`].
    pub fn write_raw_utf8_string(&mut self, _text: &[u8]) -> Result<(), BufferError> {
        Err(BufferError::Unsupported("write_raw_utf8_string"))
    }

    /// Binary content of unknown length cannot be buffered.
    ///
    /// # Errors
    /// Always [`BufferError::Unsupported`].
    pub fn write_binary_stream(
        &mut self,
        _stream: &mut dyn Iterator<Item = u8>,
    ) -> Result<(), BufferError> {
        Err(BufferError::Unsupported("write_binary_stream"))
    }

    #[cfg(test)]
    pub(crate) fn segment_count(&self) -> usize {
        self.chain.segment_count()
    }

    fn append_token(&mut self, kind: TokenKind, payload: Payload) {
        let ids = self.pending.take();
        self.chain.append(kind, payload, ids);
    }
}

impl EventSink for TokenBuffer {
    fn start_container(&mut self, kind: ContainerKind) -> Result<(), BufferError> {
        self.append_token(TokenKind::start(kind), Payload::Absent);
        self.context.push(kind);
        Ok(())
    }

    fn end_container(&mut self, kind: ContainerKind) -> Result<(), BufferError> {
        self.append_token(TokenKind::end(kind), Payload::Absent);
        if !self.context.pop() {
            tracing::debug!(?kind, "end marker with no open container");
        }
        Ok(())
    }

    fn field_name(&mut self, name: Arc<str>) -> Result<(), BufferError> {
        if !self.context.set_name(name.clone()) {
            tracing::debug!(%name, "field name outside of an object");
        }
        self.append_token(TokenKind::FieldName, Payload::Text(name));
        Ok(())
    }

    fn scalar(&mut self, value: Scalar) -> Result<(), BufferError> {
        let (kind, payload) = value.into_parts();
        self.append_token(kind, payload);
        self.context.update_for_value();
        Ok(())
    }

    fn embedded(&mut self, value: Embedded) -> Result<(), BufferError> {
        self.append_token(TokenKind::Embedded, Payload::Embedded(value));
        self.context.update_for_value();
        Ok(())
    }

    fn write_type_id(&mut self, id: NativeId) -> Result<(), BufferError> {
        self.pending.type_id = Some(id);
        Ok(())
    }

    fn write_object_id(&mut self, id: NativeId) -> Result<(), BufferError> {
        self.pending.object_id = Some(id);
        Ok(())
    }
}

impl fmt::Display for TokenBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show_ids = self.has_native_type_ids || self.has_native_object_ids;
        f.write_str("[TokenBuffer: ")?;
        let mut reader = self.reader();
        let mut count = 0usize;
        while let Some(kind) = reader.advance() {
            if count < DISPLAY_LIMIT {
                if count > 0 {
                    f.write_str(", ")?;
                }
                if show_ids {
                    if let Some(id) = reader.current_object_id() {
                        write!(f, "[objectId={id}]")?;
                    }
                    if let Some(id) = reader.current_type_id() {
                        write!(f, "[typeId={id}]")?;
                    }
                }
                f.write_str(kind.name())?;
                if kind == TokenKind::FieldName {
                    if let Some(name) = reader.current_text() {
                        write!(f, "({name})")?;
                    }
                }
            }
            count += 1;
        }
        if count > DISPLAY_LIMIT {
            write!(f, " ... (truncated {} entries)", count - DISPLAY_LIMIT)?;
        }
        f.write_str("]")
    }
}
