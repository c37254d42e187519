//! Error types, one per pipeline stage.
//!
//! Each stage fails fast with its own enum; [`Error`] gathers them for
//! callers that drive several stages.

use thiserror::Error;
use tinfo_wire::{ReadError, WriteError};

use crate::{FormatVersion, TypeKind};

/// The octet stream is not a well-formed chunk.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum FormatError {
    #[error("format version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        expected: FormatVersion,
        found: FormatVersion,
    },
    #[error("unknown kind tag {tag} for node {node} at offset {offset}")]
    UnknownKind { tag: u8, node: u8, offset: usize },
    #[error("{kind} cannot be a top-level node (node {node} at offset {offset})")]
    MisplacedKind {
        kind: TypeKind,
        node: u8,
        offset: usize,
    },
    #[error("name at offset {offset} is not valid UTF-8")]
    InvalidName { offset: usize },
    #[error(transparent)]
    Truncated(#[from] ReadError),
}

/// A placeholder does not resolve to a consistent node.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ReferenceError {
    #[error("node {node} references index {index}, but the chunk has {count} nodes")]
    OutOfBounds { node: usize, index: u8, count: usize },
    #[error("node {node} references index {index}, but the node there has index {found}")]
    IndexMismatch { node: usize, index: u8, found: u16 },
    #[error("variant `{variant}` of node {node} names node {owner} as its owner")]
    VariantOwner {
        node: usize,
        variant: String,
        owner: u16,
    },
    #[error("node {node} is on a reference cycle that does not pass through a TypeRefId")]
    Cycle { node: usize },
}

/// A bounded destination has no room left.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CapacityError {
    #[error("chunk is full ({capacity} nodes)")]
    ChunkFull { capacity: usize },
    #[error("output buffer too small: needed at least {needed} octets, have {capacity}")]
    BufferFull { needed: usize, capacity: usize },
}

/// A node's stored index disagrees with its position.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("node at position {position} carries index {index}")]
pub struct EncodingInvariantError {
    pub position: usize,
    pub index: u16,
}

/// A name does not fit behind a one-octet length prefix.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("name `{name}` of node {node} is {len} octets long; the limit is 255")]
pub struct NameLengthError {
    pub node: usize,
    pub name: String,
    pub len: usize,
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum EncodeError {
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error(transparent)]
    EncodingInvariant(#[from] EncodingInvariantError),
    #[error(transparent)]
    NameLength(#[from] NameLengthError),
    #[error("{what} {count} does not fit in one octet")]
    CountOverflow { what: &'static str, count: usize },
}

impl From<WriteError> for EncodeError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::BufferFull {
                pos,
                needed,
                capacity,
            } => Self::Capacity(CapacityError::BufferFull {
                needed: pos + needed,
                capacity,
            }),
            WriteError::CountedTooLong { len } => Self::CountOverflow {
                what: "run length",
                count: len,
            },
        }
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DecodeError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

/// [`Chunk::push`](crate::Chunk::push) refused a node.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum PushError {
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error("node {node} references {target}, which is not an earlier node")]
    Dangling { node: usize, target: crate::TypeRef },
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ImportError {
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error(transparent)]
    Push(PushError),
}

impl From<PushError> for ImportError {
    fn from(err: PushError) -> Self {
        match err {
            PushError::Capacity(err) => Self::Capacity(err),
            err @ PushError::Dangling { .. } => Self::Push(err),
        }
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("no type named `{name}`")]
pub struct LookupError {
    pub name: String,
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum LayoutError {
    #[error("{kind} has no fixed memory layout")]
    Unsized { kind: TypeKind },
    #[error("memory info out of range: size {size}, align {align}")]
    InvalidMemoryInfo { size: u16, align: u8 },
    #[error("memory offset {offset} out of range")]
    InvalidOffset { offset: u16 },
    #[error("tuple has {count} fields; expected 1 to 16")]
    TupleArity { count: usize },
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("invalid format version `{input}`, expected MAJOR.MINOR.PATCH")]
pub struct ParseVersionError {
    pub input: String,
}

/// Any failure from this crate.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Reference(#[from] ReferenceError),
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error(transparent)]
    EncodingInvariant(#[from] EncodingInvariantError),
    #[error(transparent)]
    NameLength(#[from] NameLengthError),
    #[error("{what} {count} does not fit in one octet")]
    CountOverflow { what: &'static str, count: usize },
    #[error(transparent)]
    Push(PushError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Format(err) => Self::Format(err),
            DecodeError::Reference(err) => Self::Reference(err),
        }
    }
}

impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::Capacity(err) => Self::Capacity(err),
            EncodeError::EncodingInvariant(err) => Self::EncodingInvariant(err),
            EncodeError::NameLength(err) => Self::NameLength(err),
            EncodeError::CountOverflow { what, count } => Self::CountOverflow { what, count },
        }
    }
}

impl From<ImportError> for Error {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Capacity(err) => Self::Capacity(err),
            ImportError::Push(err) => Self::Push(err),
        }
    }
}

impl From<PushError> for Error {
    fn from(err: PushError) -> Self {
        ImportError::from(err).into()
    }
}

/// Coarse category of an [`Error`], for callers that branch on the kind of
/// failure rather than its details.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorClass {
    Format,
    Reference,
    Capacity,
    EncodingInvariant,
    NameLength,
    CountOverflow,
    Lookup,
    Layout,
}

impl Error {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Format(_) => ErrorClass::Format,
            Self::Reference(_) | Self::Push(PushError::Dangling { .. }) => ErrorClass::Reference,
            Self::Capacity(_) | Self::Push(PushError::Capacity(_)) => ErrorClass::Capacity,
            Self::EncodingInvariant(_) => ErrorClass::EncodingInvariant,
            Self::NameLength(_) => ErrorClass::NameLength,
            Self::CountOverflow { .. } => ErrorClass::CountOverflow,
            Self::Lookup(_) => ErrorClass::Lookup,
            Self::Layout(_) => ErrorClass::Layout,
        }
    }
}

#[cfg(test)]
mod tests;
