//! Materializing events into [`Value`] trees.
use alloc::{string::String, sync::Arc, vec::Vec};

use crate::{
    BufferError, ContainerKind, CopyOptions, Embedded, EventSink, EventSource, Map, NativeId,
    Scalar, Value, copy,
};

#[derive(Debug)]
enum Frame {
    Array(Vec<Value>),
    Object { map: Map, key: Option<String> },
}

/// An [`EventSink`] that assembles complete values.
///
/// Unlike [`TokenBuffer`](crate::TokenBuffer) it is strict: every end marker
/// must close the matching open container and every object member needs a
/// name. Native ids are dropped; embedded trees are spliced in place.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    stack: Vec<Frame>,
    roots: Vec<Value>,
}

impl TreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed root values so far.
    #[must_use]
    pub fn roots(&self) -> &[Value] {
        &self.roots
    }

    /// Returns the completed roots.
    ///
    /// # Errors
    /// [`BufferError::Structural`] if a container is still open.
    pub fn finish(self) -> Result<Vec<Value>, BufferError> {
        if self.stack.is_empty() {
            Ok(self.roots)
        } else {
            Err(BufferError::Structural("unclosed container"))
        }
    }

    fn push_value(&mut self, value: Value) -> Result<(), BufferError> {
        match self.stack.last_mut() {
            None => self.roots.push(value),
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object { map, key }) => {
                let key = key
                    .take()
                    .ok_or(BufferError::Structural("object member without a field name"))?;
                map.insert(key, value);
            }
        }
        Ok(())
    }
}

impl EventSink for TreeBuilder {
    fn start_container(&mut self, kind: ContainerKind) -> Result<(), BufferError> {
        if let Some(Frame::Object { key: None, .. }) = self.stack.last() {
            return Err(BufferError::Structural("object member without a field name"));
        }
        self.stack.push(match kind {
            ContainerKind::Object => Frame::Object {
                map: Map::new(),
                key: None,
            },
            ContainerKind::Array => Frame::Array(Vec::new()),
        });
        Ok(())
    }

    fn end_container(&mut self, kind: ContainerKind) -> Result<(), BufferError> {
        match (self.stack.last(), kind) {
            (Some(Frame::Array(_)), ContainerKind::Array)
            | (Some(Frame::Object { key: None, .. }), ContainerKind::Object) => {}
            (Some(Frame::Object { key: Some(_), .. }), ContainerKind::Object) => {
                return Err(BufferError::Structural("field name without a value"));
            }
            (Some(_), _) => {
                return Err(BufferError::Structural(
                    "end marker does not match the open container",
                ));
            }
            (None, _) => return Err(BufferError::Structural("end marker with no open container")),
        }
        let value = match self.stack.pop() {
            Some(Frame::Array(items)) => Value::Array(items),
            Some(Frame::Object { map, .. }) => Value::Object(map),
            None => return Err(BufferError::Structural("end marker with no open container")),
        };
        self.push_value(value)
    }

    fn field_name(&mut self, name: Arc<str>) -> Result<(), BufferError> {
        match self.stack.last_mut() {
            Some(Frame::Object { key: key @ None, .. }) => {
                *key = Some(String::from(&*name));
                Ok(())
            }
            Some(Frame::Object { .. }) => Err(BufferError::Structural("field name without a value")),
            _ => Err(BufferError::Structural("field name outside of an object")),
        }
    }

    fn scalar(&mut self, value: Scalar) -> Result<(), BufferError> {
        self.push_value(value.into())
    }

    fn embedded(&mut self, value: Embedded) -> Result<(), BufferError> {
        let value = match value {
            Embedded::Tree(tree) => Arc::unwrap_or_clone(tree),
            other => Value::Embedded(other),
        };
        self.push_value(value)
    }

    fn write_type_id(&mut self, _id: NativeId) -> Result<(), BufferError> {
        Ok(())
    }

    fn write_object_id(&mut self, _id: NativeId) -> Result<(), BufferError> {
        Ok(())
    }
}

/// Reads one complete value from `source`, which must be positioned on its
/// first event. A dangling run of fields is read as an object.
///
/// # Errors
/// [`BufferError::EndOfStream`] without a current event, or
/// [`BufferError::Structural`] when the events do not form a value.
pub fn read_value<S: EventSource + ?Sized>(source: &mut S) -> Result<Value, BufferError> {
    let mut builder = TreeBuilder::new();
    copy::copy_structure(source, &mut builder, CopyOptions::default())?;
    builder
        .finish()?
        .pop()
        .ok_or(BufferError::Structural("no complete value"))
}
