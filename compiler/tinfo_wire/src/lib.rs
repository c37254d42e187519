//! Octet cursors for the type-info wire format.
//!
//! The wire format is built from three primitives: a single octet, a run of
//! raw octets, and a length-prefixed run (one length octet followed by that
//! many octets). [`Reader`] consumes them from a borrowed buffer; any
//! [`Writer`] produces them.
//!
//! Every read and write is bounds checked. A failed operation leaves the
//! cursor where it was, so callers can report the exact offset.
//!
//! Two writers are provided:
//! - [`SliceWriter`] fills a caller-owned, fixed-size buffer and fails with
//!   [`WriteError::BufferFull`] once it runs out of room.
//! - `Vec<u8>` grows as needed and never fails.

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::{SliceWriter, Writer};

use std::fmt;

/// Largest run a length prefix can describe.
pub const MAX_COUNTED_LEN: usize = u8::MAX as usize;

/// A read ran past the end of the buffer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReadError {
    /// Fewer octets remain than the read asked for.
    UnexpectedEnd {
        /// Offset at which the read started.
        pos: usize,
        /// Octets the read needed.
        needed: usize,
        /// Octets that were left.
        available: usize,
    },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEnd {
                pos,
                needed,
                available,
            } => write!(
                f,
                "unexpected end of input at offset {pos}: \
                 needed {needed} octet(s), {available} left"
            ),
        }
    }
}

impl std::error::Error for ReadError {}

/// A write did not fit, or could not be expressed in the format.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WriteError {
    /// The target buffer has no room for the write.
    BufferFull {
        /// Offset at which the write started.
        pos: usize,
        /// Octets the write needed.
        needed: usize,
        /// Total size of the target buffer.
        capacity: usize,
    },
    /// A length-prefixed run is longer than one length octet can express.
    CountedTooLong {
        /// Length of the rejected run.
        len: usize,
    },
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferFull {
                pos,
                needed,
                capacity,
            } => write!(
                f,
                "output buffer full at offset {pos}: needed {needed} octet(s) of {capacity}"
            ),
            Self::CountedTooLong { len } => write!(
                f,
                "length-prefixed run of {len} octets exceeds {MAX_COUNTED_LEN}"
            ),
        }
    }
}

impl std::error::Error for WriteError {}
