//! Nesting context: the structural position of a writer or reader.
//!
//! Frames live in an arena owned by whichever role is tracking them; each
//! frame names its parent by index. Writers and readers own separate stacks,
//! so no frame is ever shared between two holders. [`StreamContext`] is the
//! read-only view handed out to callers.
use alloc::{string::String, sync::Arc, vec, vec::Vec};
use core::fmt::{self, Write};

use crate::ContainerKind;

/// Kind of a nesting context.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Root,
    Object,
    Array,
}

impl From<ContainerKind> for ContextKind {
    fn from(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Object => Self::Object,
            ContainerKind::Array => Self::Array,
        }
    }
}

#[derive(Debug, Clone)]
struct Frame {
    kind: ContextKind,
    parent: Option<usize>,
    /// Most recent field name; objects only, except for dangling names at the
    /// root.
    name: Option<Arc<str>>,
    /// Values (including nested containers) seen directly in this context.
    entries: usize,
}

impl Frame {
    fn root() -> Self {
        Self {
            kind: ContextKind::Root,
            parent: None,
            name: None,
            entries: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ContextStack {
    frames: Vec<Frame>,
}

impl ContextStack {
    pub(crate) fn new() -> Self {
        Self {
            frames: vec![Frame::root()],
        }
    }

    fn top_mut(&mut self) -> &mut Frame {
        let top = self.frames.len() - 1;
        &mut self.frames[top]
    }

    /// Opens a container inside the current context.
    pub(crate) fn push(&mut self, kind: ContainerKind) {
        let parent = self.frames.len() - 1;
        self.frames[parent].entries += 1;
        self.frames.push(Frame {
            kind: kind.into(),
            parent: Some(parent),
            name: None,
            entries: 0,
        });
    }

    /// Closes the current container. Returns `false`, leaving the root in
    /// place, when nothing is open.
    pub(crate) fn pop(&mut self) -> bool {
        if self.frames.len() > 1 {
            self.frames.pop();
            true
        } else {
            false
        }
    }

    /// Records a field name on the current context. Returns whether the
    /// context is an object.
    pub(crate) fn set_name(&mut self, name: Arc<str>) -> bool {
        let top = self.top_mut();
        top.name = Some(name);
        top.kind == ContextKind::Object
    }

    /// Marks one scalar value as consumed in the current context.
    pub(crate) fn update_for_value(&mut self) {
        self.top_mut().entries += 1;
    }

    pub(crate) fn current(&self) -> StreamContext<'_> {
        StreamContext {
            frames: &self.frames,
            at: self.frames.len() - 1,
        }
    }
}

/// A step in the path from the root to the current position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathItem {
    Key(Arc<str>),
    Index(usize),
}

impl PathItem {
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        if let Self::Key(k) = self {
            Some(k)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        if let Self::Index(i) = self {
            Some(*i)
        } else {
            None
        }
    }
}

impl From<&str> for PathItem {
    fn from(s: &str) -> Self {
        Self::Key(s.into())
    }
}

impl From<usize> for PathItem {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

#[doc(hidden)]
pub trait PathItemFrom<T> {
    fn from_path_item(value: T) -> PathItem;
}

macro_rules! impl_integer_as_path_item {
    ($($t:ty),+) => {
        $(
            impl PathItemFrom<$t> for PathItem {
                fn from_path_item(value: $t) -> Self {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let index = value as usize;
                    PathItem::Index(index)
                }
            }
        )+
    };
}
impl_integer_as_path_item!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl PathItemFrom<&str> for PathItem {
    fn from_path_item(value: &str) -> Self {
        PathItem::Key(value.into())
    }
}

/// Read-only view of one nesting context and, through [`parent`], its
/// ancestors.
///
/// [`parent`]: StreamContext::parent
#[derive(Clone, Copy)]
pub struct StreamContext<'a> {
    frames: &'a [Frame],
    at: usize,
}

impl<'a> StreamContext<'a> {
    fn frame(&self) -> &'a Frame {
        &self.frames[self.at]
    }

    #[must_use]
    pub fn kind(&self) -> ContextKind {
        self.frame().kind
    }

    #[must_use]
    pub fn in_root(&self) -> bool {
        self.kind() == ContextKind::Root
    }

    #[must_use]
    pub fn in_object(&self) -> bool {
        self.kind() == ContextKind::Object
    }

    #[must_use]
    pub fn in_array(&self) -> bool {
        self.kind() == ContextKind::Array
    }

    /// Number of open containers above the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.at
    }

    /// The most recent field name recorded in this context.
    #[must_use]
    pub fn current_name(&self) -> Option<&'a str> {
        self.frame().name.as_deref()
    }

    /// Values seen so far directly in this context.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.frame().entries
    }

    /// Zero-based index of the latest value in this context, if any.
    #[must_use]
    pub fn entry_index(&self) -> Option<usize> {
        self.frame().entries.checked_sub(1)
    }

    #[must_use]
    pub fn parent(&self) -> Option<StreamContext<'a>> {
        self.frame().parent.map(|at| StreamContext {
            frames: self.frames,
            at,
        })
    }

    /// Keys and indices leading from the root to the current position.
    #[must_use]
    pub fn path(&self) -> Vec<PathItem> {
        self.frames[..=self.at]
            .iter()
            .filter_map(|frame| match frame.kind {
                ContextKind::Root => None,
                ContextKind::Object => frame.name.clone().map(PathItem::Key),
                ContextKind::Array => frame.entries.checked_sub(1).map(PathItem::Index),
            })
            .collect()
    }

    /// The path as a JSON Pointer (RFC 6901), e.g. `/items/0/name`.
    #[must_use]
    pub fn pointer(&self) -> String {
        let mut out = String::new();
        for item in self.path() {
            out.push('/');
            match item {
                PathItem::Key(k) => {
                    for c in k.chars() {
                        match c {
                            '~' => out.push_str("~0"),
                            '/' => out.push_str("~1"),
                            c => out.push(c),
                        }
                    }
                }
                PathItem::Index(i) => {
                    let _ = write!(out, "{i}");
                }
            }
        }
        out
    }
}

impl fmt::Debug for StreamContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamContext")
            .field("kind", &self.kind())
            .field("depth", &self.depth())
            .field("current_name", &self.current_name())
            .field("entry_index", &self.entry_index())
            .finish()
    }
}
