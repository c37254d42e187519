//! Reference handles.
//!
//! Two handle types keep resolved and unresolved references apart:
//! [`Placeholder`] is a raw index read off the wire and only lives inside a
//! [`RawChunk`](crate::RawChunk); [`TypeRef`] is a validated index into a
//! fixed-up [`Chunk`](crate::Chunk).

use std::fmt;

/// Handle to a node of a [`Chunk`](crate::Chunk).
///
/// Only meaningful for the chunk that produced it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeRef(u16);

impl TypeRef {
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Handle for a position, if it fits.
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        u16::try_from(index).ok().map(Self)
    }

    /// Position in the owning chunk.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.0)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unresolved one-octet reference, as stored on the wire.
///
/// [`fixup`](crate::fixup) checks each placeholder against the node count and
/// turns it into a [`TypeRef`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Placeholder(u8);

impl Placeholder {
    #[inline]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl fmt::Debug for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Placeholder({})", self.0)
    }
}
