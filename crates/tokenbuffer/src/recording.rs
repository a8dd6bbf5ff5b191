//! A sink that records events verbatim, for comparing streams in tests and
//! fuzzing.
use alloc::{sync::Arc, vec::Vec};

use crate::{BufferError, ContainerKind, Embedded, EventSink, NativeId, Scalar};

/// One call made on an [`EventSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Start(ContainerKind),
    End(ContainerKind),
    Name(Arc<str>),
    Scalar(Scalar),
    Embedded(Embedded),
    TypeId(NativeId),
    ObjectId(NativeId),
}

/// Records every call in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recorder {
    pub events: Vec<Recorded>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for Recorder {
    fn start_container(&mut self, kind: ContainerKind) -> Result<(), BufferError> {
        self.events.push(Recorded::Start(kind));
        Ok(())
    }

    fn end_container(&mut self, kind: ContainerKind) -> Result<(), BufferError> {
        self.events.push(Recorded::End(kind));
        Ok(())
    }

    fn field_name(&mut self, name: Arc<str>) -> Result<(), BufferError> {
        self.events.push(Recorded::Name(name));
        Ok(())
    }

    fn scalar(&mut self, value: Scalar) -> Result<(), BufferError> {
        self.events.push(Recorded::Scalar(value));
        Ok(())
    }

    fn embedded(&mut self, value: Embedded) -> Result<(), BufferError> {
        self.events.push(Recorded::Embedded(value));
        Ok(())
    }

    fn write_type_id(&mut self, id: NativeId) -> Result<(), BufferError> {
        self.events.push(Recorded::TypeId(id));
        Ok(())
    }

    fn write_object_id(&mut self, id: NativeId) -> Result<(), BufferError> {
        self.events.push(Recorded::ObjectId(id));
        Ok(())
    }
}
