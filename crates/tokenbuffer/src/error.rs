use alloc::string::String;

use thiserror::Error;

use crate::{NumberType, TokenKind};

/// Errors reported by the token buffer, its readers and the structural copy
/// routines.
///
/// Nothing in this crate retries or recovers from these; they are returned to
/// the immediate caller, which decides whether to wrap, rethrow, or substitute
/// a default.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BufferError {
    /// The event sequence handed to an operation violates its contract, e.g. a
    /// dangling field name with no value to copy.
    #[error("structural error: {0}")]
    Structural(&'static str),
    /// A stored number does not fit the requested representation.
    #[error("numeric value ({value}) out of range of {target}")]
    NumericOverflow {
        /// Canonical text of the stored value.
        value: String,
        /// The representation that was requested.
        target: NumberType,
    },
    /// A typed accessor was called on a token of the wrong kind.
    #[error("current token ({found}) is not {expected}")]
    TypeMismatch {
        /// What the accessor requires.
        expected: &'static str,
        /// The current token.
        found: TokenKind,
    },
    /// The buffer cannot hold streaming or raw unescaped output.
    #[error("operation not supported by token buffer: {0}")]
    Unsupported(&'static str),
    /// No current token: the reader has not been advanced, is exhausted, or
    /// was closed.
    #[error("no current token")]
    EndOfStream,
    /// A not-yet-decoded textual number failed to parse, or a value has no
    /// finite decimal representation.
    #[error("invalid number: {0}")]
    InvalidNumber(String),
}
