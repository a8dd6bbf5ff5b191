//! The writing side of an event stream.
use alloc::sync::Arc;

use crate::{BufferError, ContainerKind, Embedded, NativeId, Number, Scalar};

/// Something events can be written into: a live document writer, a
/// [`TokenBuffer`](crate::TokenBuffer), or a [`TreeBuilder`](crate::TreeBuilder).
///
/// Native ids are staged: [`write_type_id`](Self::write_type_id) and
/// [`write_object_id`](Self::write_object_id) apply to the next event written
/// after them.
pub trait EventSink {
    /// Opens a container.
    ///
    /// # Errors
    /// Implementation defined.
    fn start_container(&mut self, kind: ContainerKind) -> Result<(), BufferError>;

    /// Closes a container.
    ///
    /// # Errors
    /// Implementation defined.
    fn end_container(&mut self, kind: ContainerKind) -> Result<(), BufferError>;

    /// Writes a field name inside the current object.
    ///
    /// # Errors
    /// Implementation defined.
    fn field_name(&mut self, name: Arc<str>) -> Result<(), BufferError>;

    /// Writes a string, number, boolean or null.
    ///
    /// # Errors
    /// Implementation defined.
    fn scalar(&mut self, value: Scalar) -> Result<(), BufferError>;

    /// Writes an opaque value unchanged.
    ///
    /// # Errors
    /// Implementation defined.
    fn embedded(&mut self, value: Embedded) -> Result<(), BufferError>;

    /// Stages a native type id for the next event.
    ///
    /// # Errors
    /// Implementation defined.
    fn write_type_id(&mut self, id: NativeId) -> Result<(), BufferError>;

    /// Stages a native object id for the next event.
    ///
    /// # Errors
    /// Implementation defined.
    fn write_object_id(&mut self, id: NativeId) -> Result<(), BufferError>;

    /// Writes pre-encoded text straight into the output.
    ///
    /// # Errors
    /// [`BufferError::Unsupported`] unless the sink has an output to write into.
    fn write_raw(&mut self, _text: &str) -> Result<(), BufferError> {
        Err(BufferError::Unsupported("write_raw"))
    }

    /// # Errors
    /// Implementation defined.
    fn start_object(&mut self) -> Result<(), BufferError> {
        self.start_container(ContainerKind::Object)
    }

    /// # Errors
    /// Implementation defined.
    fn end_object(&mut self) -> Result<(), BufferError> {
        self.end_container(ContainerKind::Object)
    }

    /// # Errors
    /// Implementation defined.
    fn start_array(&mut self) -> Result<(), BufferError> {
        self.start_container(ContainerKind::Array)
    }

    /// # Errors
    /// Implementation defined.
    fn end_array(&mut self) -> Result<(), BufferError> {
        self.end_container(ContainerKind::Array)
    }

    /// # Errors
    /// Implementation defined.
    fn write_name(&mut self, name: &str) -> Result<(), BufferError> {
        self.field_name(name.into())
    }

    /// # Errors
    /// Implementation defined.
    fn write_string(&mut self, value: &str) -> Result<(), BufferError> {
        self.scalar(Scalar::String(value.into()))
    }

    /// # Errors
    /// Implementation defined.
    fn write_number(&mut self, value: impl Into<Number>) -> Result<(), BufferError>
    where
        Self: Sized,
    {
        self.scalar(Scalar::Number(value.into()))
    }

    /// # Errors
    /// Implementation defined.
    fn write_bool(&mut self, value: bool) -> Result<(), BufferError> {
        self.scalar(Scalar::Bool(value))
    }

    /// # Errors
    /// Implementation defined.
    fn write_null(&mut self) -> Result<(), BufferError> {
        self.scalar(Scalar::Null)
    }
}

impl<W: EventSink + ?Sized> EventSink for &mut W {
    fn start_container(&mut self, kind: ContainerKind) -> Result<(), BufferError> {
        (**self).start_container(kind)
    }

    fn end_container(&mut self, kind: ContainerKind) -> Result<(), BufferError> {
        (**self).end_container(kind)
    }

    fn field_name(&mut self, name: Arc<str>) -> Result<(), BufferError> {
        (**self).field_name(name)
    }

    fn scalar(&mut self, value: Scalar) -> Result<(), BufferError> {
        (**self).scalar(value)
    }

    fn embedded(&mut self, value: Embedded) -> Result<(), BufferError> {
        (**self).embedded(value)
    }

    fn write_type_id(&mut self, id: NativeId) -> Result<(), BufferError> {
        (**self).write_type_id(id)
    }

    fn write_object_id(&mut self, id: NativeId) -> Result<(), BufferError> {
        (**self).write_object_id(id)
    }

    fn write_raw(&mut self, text: &str) -> Result<(), BufferError> {
        (**self).write_raw(text)
    }
}
