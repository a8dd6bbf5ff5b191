//! A segmented, replayable buffer of document token events.
//!
//! [`TokenBuffer`] records a stream of structural and content events (object
//! and array boundaries, field names, scalars, embedded host values) in
//! fixed-size segments and replays them through any number of independent
//! [`BufferReader`]s. It sits between a format reader and whatever consumes
//! the events when the consumer needs to look ahead, restart, or hand the same
//! fragment to several places.
//!
//! Events go in through [`EventSink`] and come out through [`EventSource`].
//! Both traits are meant to be implemented by live document writers and
//! readers too, so the [`copy`] routines move content between any of them.
//!
//! ```rust
//! use tokenbuffer::{EventSink, EventSource, TokenBuffer, TokenKind};
//!
//! let mut a = TokenBuffer::default();
//! a.write_number(1)?;
//! a.write_number(2)?;
//! let mut b = TokenBuffer::default();
//! b.write_number(3)?;
//!
//! a.append(&b)?;
//! let mut reader = a.reader();
//! let mut seen = Vec::new();
//! while reader.advance() == Some(TokenKind::Int) {
//!     seen.push(reader.as_i32()?);
//! }
//! assert_eq!(seen, [1, 2, 3]);
//! # Ok::<(), tokenbuffer::BufferError>(())
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod context;
pub mod copy;
mod error;
mod number;
mod options;
mod reader;
#[cfg(any(test, feature = "fuzzing"))]
#[doc(hidden)]
pub mod recording;
mod segment;
mod sink;
mod source;
mod token;
mod tree;
mod value;

#[cfg(test)]
mod tests;

pub use bigdecimal::BigDecimal;
pub use bstr::BString;
pub use buffer::TokenBuffer;
pub use context::{ContextKind, PathItem, PathItemFrom, StreamContext};
pub use copy::{CopyOptions, copy_current_event, copy_current_structure, copy_structure};
pub use error::BufferError;
pub use num_bigint::BigInt;
pub use number::{Number, NumberType};
pub use options::BufferOptions;
pub use reader::{BufferReader, ReaderState};
pub use sink::EventSink;
pub use source::EventSource;
pub use token::{ContainerKind, Embedded, NativeId, Scalar, TokenKind};
pub use tree::{TreeBuilder, read_value};
pub use value::{Array, Map, Value};

#[doc(hidden)]
pub use alloc::vec;

/// Builds a `Vec<PathItem>` from a heterogeneous list of keys and indices.
///
/// ```rust
/// extern crate alloc;
/// # use tokenbuffer::{path, PathItem};
/// let p = path![0, "foo", 2];
/// assert_eq!(
///     p,
///     vec![
///         PathItem::Index(0),
///         PathItem::Key("foo".into()),
///         PathItem::Index(2)
///     ]
/// );
/// ```
#[macro_export]
macro_rules! path {
    ( $( $elem:expr ),* $(,)? ) => {{
        use $crate::PathItemFrom;
        $crate::vec![$($crate::PathItem::from_path_item($elem)),*]
    }};
}
