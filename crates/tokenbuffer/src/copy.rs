//! Structural copy from any [`EventSource`] into any [`EventSink`].
//!
//! Three granularities:
//!
//! - [`copy_current_event`]: exactly the current event.
//! - [`copy_current_structure`]: the current value with everything nested in
//!   it. A field name is copied together with its value.
//! - [`copy_structure`]: as above, except that a source positioned on a field
//!   name is taken to have started inside an object whose start marker was
//!   never seen. The remaining fields are wrapped in a synthesized object.
use alloc::sync::Arc;

use crate::{BufferError, ContainerKind, EventSink, EventSource, Number, Scalar, TokenKind};

/// How values are carried across by the copy routines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOptions {
    /// Stage the source's native ids on the sink before each event.
    pub copy_native_ids: bool,
    /// Capture finite floating-point numbers as arbitrary-precision decimals.
    pub force_wide_decimal: bool,
}

/// Copies the source's current event into `sink`.
///
/// Container markers are copied on their own, without their contents.
///
/// # Errors
/// [`BufferError::EndOfStream`] when the source has no current event, or
/// whatever the source's accessors or the sink report.
pub fn copy_current_event<S, W>(
    source: &S,
    sink: &mut W,
    options: CopyOptions,
) -> Result<(), BufferError>
where
    S: EventSource + ?Sized,
    W: EventSink + ?Sized,
{
    let kind = source.current_kind().ok_or(BufferError::EndOfStream)?;
    if options.copy_native_ids {
        if let Some(id) = source.current_object_id() {
            sink.write_object_id(id.clone())?;
        }
        if let Some(id) = source.current_type_id() {
            sink.write_type_id(id.clone())?;
        }
    }
    match kind {
        TokenKind::StartObject => sink.start_container(ContainerKind::Object),
        TokenKind::StartArray => sink.start_container(ContainerKind::Array),
        TokenKind::EndObject => sink.end_container(ContainerKind::Object),
        TokenKind::EndArray => sink.end_container(ContainerKind::Array),
        TokenKind::FieldName => {
            let name = source.current_text().ok_or(BufferError::EndOfStream)?;
            sink.field_name(Arc::from(&*name))
        }
        _ => copy_value(source, sink, kind, options),
    }
}

fn copy_value<S, W>(
    source: &S,
    sink: &mut W,
    kind: TokenKind,
    options: CopyOptions,
) -> Result<(), BufferError>
where
    S: EventSource + ?Sized,
    W: EventSink + ?Sized,
{
    match kind {
        TokenKind::String => {
            let text = source.current_text().ok_or(BufferError::EndOfStream)?;
            sink.scalar(Scalar::String(Arc::from(&*text)))
        }
        TokenKind::Int => sink.scalar(Scalar::Number(source.number_value()?)),
        TokenKind::Float => {
            let number = source.number_value()?;
            let number = if options.force_wide_decimal && is_finite_float(&number) {
                Number::BigDecimal(number.to_bigdecimal()?)
            } else {
                number
            };
            sink.scalar(Scalar::Number(number))
        }
        TokenKind::True => sink.scalar(Scalar::Bool(true)),
        TokenKind::False => sink.scalar(Scalar::Bool(false)),
        TokenKind::Null => sink.scalar(Scalar::Null),
        TokenKind::Embedded => {
            let value = source
                .current_embedded()
                .cloned()
                .ok_or(BufferError::Structural("embedded token without a value"))?;
            sink.embedded(value)
        }
        TokenKind::StartObject
        | TokenKind::EndObject
        | TokenKind::StartArray
        | TokenKind::EndArray
        | TokenKind::FieldName => Err(BufferError::Structural("not a value token")),
    }
}

// Textual numbers stay textual; NaN and infinities have no decimal form.
fn is_finite_float(number: &Number) -> bool {
    match number {
        Number::Float(f) => f.is_finite(),
        Number::Double(d) => d.is_finite(),
        _ => false,
    }
}

/// Copies the current value and everything nested inside it.
///
/// On a start marker the whole container is copied through its matching end
/// marker, leaving the source positioned on that end marker. On a field name
/// the name and the value that follows are copied. Anything else, including
/// a stray end marker, is copied as a single event.
///
/// # Errors
/// [`BufferError::EndOfStream`] when the source has no current event,
/// [`BufferError::Structural`] for a field name with no value after it.
pub fn copy_current_structure<S, W>(
    source: &mut S,
    sink: &mut W,
    options: CopyOptions,
) -> Result<(), BufferError>
where
    S: EventSource + ?Sized,
    W: EventSink + ?Sized,
{
    let mut kind = source.current_kind().ok_or(BufferError::EndOfStream)?;
    if kind == TokenKind::FieldName {
        copy_current_event(source, sink, options)?;
        kind = source
            .advance()
            .ok_or(BufferError::Structural("field name without a value"))?;
    }
    copy_current_event(source, sink, options)?;
    if kind.is_start() {
        copy_contents(source, sink, options)?;
    }
    Ok(())
}

/// Copies events up to and including the end marker that closes the
/// container just copied. A source that runs out first ends the copy there.
fn copy_contents<S, W>(source: &mut S, sink: &mut W, options: CopyOptions) -> Result<(), BufferError>
where
    S: EventSource + ?Sized,
    W: EventSink + ?Sized,
{
    let mut depth = 1usize;
    while let Some(kind) = source.advance() {
        copy_current_event(source, sink, options)?;
        if kind.is_start() {
            depth += 1;
        } else if kind.is_end() {
            depth -= 1;
            if depth == 0 {
                break;
            }
        }
    }
    Ok(())
}

/// Copies one complete structure, tolerating a source that begins in the
/// middle of an object.
///
/// When the source is positioned on a field name, a start-object marker is
/// synthesized and every following `name: value` pair is copied until the
/// source reaches an end-object marker or runs out. The object is then
/// closed with a synthesized end marker; the source's own end marker, if
/// any, is consumed.
///
/// Otherwise behaves as [`copy_current_structure`].
///
/// # Errors
/// As [`copy_current_structure`], plus [`BufferError::Structural`] when the
/// fields are followed by anything but an end-object marker or the end of
/// the source.
pub fn copy_structure<S, W>(
    source: &mut S,
    sink: &mut W,
    options: CopyOptions,
) -> Result<(), BufferError>
where
    S: EventSource + ?Sized,
    W: EventSink + ?Sized,
{
    if source.current_kind() != Some(TokenKind::FieldName) {
        return copy_current_structure(source, sink, options);
    }
    tracing::debug!("wrapping dangling field names in a synthesized object");
    sink.start_object()?;
    loop {
        copy_current_structure(source, sink, options)?;
        match source.advance() {
            Some(TokenKind::FieldName) => {}
            Some(TokenKind::EndObject) | None => break,
            Some(_) => {
                return Err(BufferError::Structural(
                    "expected a field name or the end of the object",
                ));
            }
        }
    }
    sink.end_object()
}
