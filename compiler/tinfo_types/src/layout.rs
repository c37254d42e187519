//! Memory layout metadata.
//!
//! Records, tuples, customs, variants, arrays and lists carry the size and
//! alignment the producing compiler computed for them, and every field
//! carries its offset. None of this travels on the wire: decoded nodes have
//! [`MemoryInfo::UNKNOWN`] layout.
//!
//! [`Chunk::memory_size`] and [`Chunk::memory_align`] answer layout queries
//! for any node, using fixed sizes for scalars and handles and the stored
//! metadata for aggregates.

use crate::{Chunk, LayoutError, TupleType, TypeData, TypeKind, TypeRef, Variant};

/// Largest valid alignment.
pub const MAX_MEMORY_ALIGN: u8 = 8;

/// Largest valid size.
pub const MAX_MEMORY_SIZE: u16 = 256;

/// Largest valid field offset.
pub const MAX_MEMORY_OFFSET: u16 = 256;

/// Largest tuple arity.
pub const MAX_TUPLE_FIELDS: usize = 16;

/// Size of heap handles (lists, arrays, blobs, foreign pointers).
const HANDLE_SIZE: u16 = 8;

/// Alignment of heap handles.
const HANDLE_ALIGN: u8 = 8;

#[expect(
    clippy::cast_possible_truncation,
    reason = "pointer alignment is at most 16 on every supported target"
)]
const POINTER_ALIGN: u8 = std::mem::align_of::<usize>() as u8;

/// Size and alignment of a value.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryInfo {
    pub size: u16,
    pub align: u8,
}

impl MemoryInfo {
    /// Layout not computed (both fields zero).
    pub const UNKNOWN: Self = Self::new(0, 0);

    pub const fn new(size: u16, align: u8) -> Self {
        Self { size, align }
    }

    pub const fn is_known(self) -> bool {
        self.size != 0 || self.align != 0
    }
}

/// Position and layout of a field inside its parent.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryOffsetInfo {
    pub offset: u16,
    pub info: MemoryInfo,
}

impl MemoryOffsetInfo {
    pub const fn new(offset: u16, info: MemoryInfo) -> Self {
        Self { offset, info }
    }
}

/// Check that `1 <= align <= 8` and `1 <= size <= 256`.
pub fn verify_memory_info(info: MemoryInfo) -> Result<(), LayoutError> {
    let align_ok = (1..=MAX_MEMORY_ALIGN).contains(&info.align);
    let size_ok = (1..=MAX_MEMORY_SIZE).contains(&info.size);
    if align_ok && size_ok {
        Ok(())
    } else {
        Err(LayoutError::InvalidMemoryInfo {
            size: info.size,
            align: info.align,
        })
    }
}

/// Check the offset bound and the embedded memory info.
pub fn verify_memory_offset_info(info: MemoryOffsetInfo) -> Result<(), LayoutError> {
    if info.offset > MAX_MEMORY_OFFSET {
        return Err(LayoutError::InvalidOffset {
            offset: info.offset,
        });
    }
    verify_memory_info(info.info)
}

/// Check tuple arity (1 to 16) and every field's offset info.
pub fn verify_tuple<R>(tuple: &TupleType<R>) -> Result<(), LayoutError> {
    let count = tuple.fields.len();
    if !(1..=MAX_TUPLE_FIELDS).contains(&count) {
        return Err(LayoutError::TupleArity { count });
    }
    tuple
        .fields
        .iter()
        .try_for_each(|field| verify_memory_offset_info(field.offset))
}

impl Chunk {
    /// Size of a value of type `id`. Aliases report their target's size.
    pub fn memory_size(&self, id: TypeRef) -> Result<u16, LayoutError> {
        let info = self.get(self.unalias(id));
        match info.data() {
            TypeData::Record(record) => Ok(record.layout.size),
            TypeData::Tuple(tuple) => Ok(tuple.layout.size),
            TypeData::Custom(custom) => Ok(custom.layout.size),
            TypeData::Int | TypeData::Char | TypeData::TypeRefId(_) => Ok(4),
            TypeData::Boolean => Ok(1),
            TypeData::List(_) | TypeData::Array(_) | TypeData::Blob | TypeData::Unmanaged(_) => {
                Ok(HANDLE_SIZE)
            }
            _ => Err(LayoutError::Unsized { kind: info.kind() }),
        }
    }

    /// Alignment of a value of type `id`. Aliases report their target's
    /// alignment.
    pub fn memory_align(&self, id: TypeRef) -> Result<u8, LayoutError> {
        let info = self.get(self.unalias(id));
        match info.data() {
            TypeData::Record(record) => Ok(record.layout.align),
            TypeData::Tuple(tuple) => Ok(tuple.layout.align),
            TypeData::Custom(custom) => Ok(custom.layout.align),
            TypeData::Int | TypeData::Char => Ok(4),
            TypeData::Boolean => Ok(1),
            TypeData::List(_) | TypeData::Array(_) | TypeData::Blob => Ok(HANDLE_ALIGN),
            TypeData::Unmanaged(_) => Ok(POINTER_ALIGN),
            _ => Err(LayoutError::Unsized { kind: info.kind() }),
        }
    }
}

impl<R> Variant<R> {
    pub fn memory_size(&self) -> u16 {
        self.layout.size
    }

    pub fn memory_align(&self) -> u8 {
        self.layout.align
    }
}

/// Kinds whose nodes carry their own [`MemoryInfo`].
pub(crate) const fn has_own_layout(kind: TypeKind) -> bool {
    matches!(
        kind,
        TypeKind::Record | TypeKind::Tuple | TypeKind::Custom | TypeKind::Array | TypeKind::List
    )
}
