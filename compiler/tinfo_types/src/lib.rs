//! Type information for compiled modules.
//!
//! A [`Chunk`] is an append-only table of [`TypeInfo`] nodes describing the
//! public types of a module: records, custom (tagged union) types, aliases,
//! functions, tuples, arrays, lists and scalars. Nodes reference each other
//! by [`TypeRef`], an index into the same chunk.
//!
//! # Pipeline
//!
//! ```text
//! bytes ──decode_raw──▶ RawChunk ──fixup──▶ Chunk ──encode──▶ bytes
//!                     (Placeholder refs)   (TypeRef refs)
//! ```
//!
//! [`decode`] runs both stages. A [`RawChunk`] cannot be traversed; only a
//! fixed-up [`Chunk`] exposes graph queries, equality, import and formatting.
//!
//! # Graph invariants
//!
//! - Every node's index equals its position in its chunk.
//! - Ignoring `TypeRefId` edges, the graph is acyclic. Self-referential
//!   types go through a `TypeRefId` node.
//! - Nodes appended with [`Chunk::push`] (and everything the importer
//!   creates) only reference earlier nodes, except `TypeRefId` edges.

mod chunk;
mod construct;
mod decode;
mod encode;
mod equal;
mod error;
mod fixup;
pub mod fnv;
mod format;
mod import;
mod kind;
mod layout;
mod node;
mod shared;
mod stack;
mod type_ref;
mod version;

pub use chunk::{Chunk, RawChunk, DEFAULT_CAPACITY, MAX_CAPACITY, MAX_RAW_CAPACITY};
pub use decode::{decode, decode_from_reader, decode_raw, DecodeOptions, Decoded};
pub use encode::{encode, encode_into, encode_to, EncodeOptions};
pub use equal::{deep_equal, value_equal, Equality};
pub use error::{
    CapacityError, DecodeError, EncodeError, EncodingInvariantError, Error, ErrorClass,
    FormatError, ImportError, LayoutError, LookupError, NameLengthError, ParseVersionError,
    PushError, ReferenceError,
};
pub use fixup::fixup;
pub use format::{FormatFlags, TypeDisplay};
pub use import::{import_into, ImportOptions, Importer};
pub use kind::TypeKind;
pub use layout::{
    verify_memory_info, verify_memory_offset_info, verify_tuple, MemoryInfo, MemoryOffsetInfo,
    MAX_MEMORY_ALIGN, MAX_MEMORY_OFFSET, MAX_MEMORY_SIZE, MAX_TUPLE_FIELDS,
};
pub use node::{
    AliasType, CustomType, EdgeKind, ElementType, FunctionType, RecordField, RecordType,
    TupleField, TupleType, TypeData, TypeInfo, UnmanagedType, Variant, VariantField,
};
pub use shared::SharedChunk;
pub use stack::ensure_sufficient_stack;
pub use type_ref::{Placeholder, TypeRef};
pub use version::FormatVersion;
