//! Node tables.
//!
//! [`Chunk`] is the finalized, traversable table. [`RawChunk`] is the
//! builder-phase table whose references are unresolved [`Placeholder`]s;
//! [`fixup`](crate::fixup) converts one into the other.
//!
//! Both are append-only. A node's index is assigned exactly once, when it is
//! appended, and equals its position.

use std::slice;

use crate::{
    AliasType, CapacityError, CustomType, EdgeKind, ElementType, FunctionType, LookupError,
    Placeholder, PushError, RecordType, TupleType, TypeData, TypeInfo, TypeRef,
};

/// Capacity used by [`Chunk::default`] and [`Chunk::from_root`](Chunk::from_root).
pub const DEFAULT_CAPACITY: usize = 8 * 1024;

/// Largest chunk a [`TypeRef`] can address.
pub const MAX_CAPACITY: usize = u16::MAX as usize + 1;

/// Largest raw chunk a [`Placeholder`] can address.
pub const MAX_RAW_CAPACITY: usize = u8::MAX as usize + 1;

/// Finalized type table.
///
/// # Invariants
///
/// - `types[i].index() == i` for every node.
/// - `types.len() <= capacity`.
/// - Ignoring `TypeRefId` edges, references form a DAG.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Chunk {
    types: Vec<TypeInfo>,
    capacity: usize,
}

impl Chunk {
    /// Empty chunk holding at most `capacity` nodes (clamped to
    /// [`MAX_CAPACITY`]).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_CAPACITY);
        Self {
            types: Vec::new(),
            capacity,
        }
    }

    pub(crate) fn from_fixed_up(types: Vec<TypeInfo>, capacity: usize) -> Self {
        debug_assert!(types
            .iter()
            .enumerate()
            .all(|(i, info)| usize::from(info.index) == i));
        Self { types, capacity }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.types.len() >= self.capacity
    }

    /// Node for a handle produced by this chunk.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this chunk.
    #[inline]
    pub fn get(&self, id: TypeRef) -> &TypeInfo {
        &self.types[id.index()]
    }

    /// Node at `index`, if there is one.
    pub fn type_from_index(&self, index: usize) -> Option<&TypeInfo> {
        self.types.get(index)
    }

    pub fn types(&self) -> &[TypeInfo] {
        &self.types
    }

    pub fn iter(&self) -> slice::Iter<'_, TypeInfo> {
        self.types.iter()
    }

    /// Handles of all nodes, in index order.
    pub fn refs(&self) -> impl Iterator<Item = TypeRef> + '_ {
        self.types.iter().map(TypeInfo::type_ref)
    }

    /// Handle the next appended node will get, if the chunk has room.
    pub fn next_ref(&self) -> Option<TypeRef> {
        if self.is_full() {
            None
        } else {
            TypeRef::from_index(self.types.len())
        }
    }

    /// Append a node and return its handle.
    ///
    /// Every reference must point at an earlier node. A `TypeRefId` may also
    /// point at the node being appended; the importer uses that while it
    /// closes a cycle.
    pub fn push(&mut self, mut info: TypeInfo) -> Result<TypeRef, PushError> {
        let Some(id) = self.next_ref() else {
            return Err(CapacityError::ChunkFull {
                capacity: self.capacity,
            }
            .into());
        };
        let node = id.index();
        let mut dangling = None;
        info.data.for_each_ref(|edge, &target| {
            let ok = match edge {
                EdgeKind::Child | EdgeKind::Generic => target.index() < node,
                EdgeKind::TypeRefId => target.index() <= node,
            };
            if !ok && dangling.is_none() {
                dangling = Some(target);
            }
        });
        if let Some(target) = dangling {
            return Err(PushError::Dangling { node, target });
        }
        info.assign_index(id.raw());
        self.types.push(info);
        Ok(id)
    }

    /// Drop every node from `len` on.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.types.truncate(len);
    }

    /// Point the `TypeRefId` node `id` at `target`.
    pub(crate) fn retarget_type_ref_id(&mut self, id: TypeRef, target: TypeRef) {
        if let Some(TypeData::TypeRefId(slot)) =
            self.types.get_mut(id.index()).map(|info| &mut info.data)
        {
            *slot = target;
        }
    }

    #[cfg(test)]
    pub(crate) fn types_mut(&mut self) -> &mut [TypeInfo] {
        &mut self.types
    }

    // === Lookup ===

    /// First node called `name`.
    pub fn find_by_name(&self, name: &str) -> Option<TypeRef> {
        self.types
            .iter()
            .find(|info| info.name() == name)
            .map(TypeInfo::type_ref)
    }

    pub fn get_by_name(&self, name: &str) -> Result<TypeRef, LookupError> {
        self.find_by_name(name).ok_or_else(|| LookupError {
            name: name.to_string(),
        })
    }

    /// Follow alias targets until a non-alias node.
    pub fn unalias(&self, mut id: TypeRef) -> TypeRef {
        while let TypeData::Alias(alias) = self.get(id).data() {
            id = alias.target;
        }
        id
    }

    // === Typed Accessors ===

    pub fn as_list(&self, id: TypeRef) -> Option<&ElementType<TypeRef>> {
        match self.get(id).data() {
            TypeData::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_array(&self, id: TypeRef) -> Option<&ElementType<TypeRef>> {
        match self.get(id).data() {
            TypeData::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_record(&self, id: TypeRef) -> Option<&RecordType<TypeRef>> {
        match self.get(id).data() {
            TypeData::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_custom(&self, id: TypeRef) -> Option<&CustomType<TypeRef>> {
        match self.get(id).data() {
            TypeData::Custom(custom) => Some(custom),
            _ => None,
        }
    }

    pub fn as_function(&self, id: TypeRef) -> Option<&FunctionType<TypeRef>> {
        match self.get(id).data() {
            TypeData::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_tuple(&self, id: TypeRef) -> Option<&TupleType<TypeRef>> {
        match self.get(id).data() {
            TypeData::Tuple(tuple) => Some(tuple),
            _ => None,
        }
    }

    pub fn as_alias(&self, id: TypeRef) -> Option<&AliasType<TypeRef>> {
        match self.get(id).data() {
            TypeData::Alias(alias) => Some(alias),
            _ => None,
        }
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<'a> IntoIterator for &'a Chunk {
    type Item = &'a TypeInfo;
    type IntoIter = slice::Iter<'a, TypeInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builder-phase table with unresolved references.
///
/// Forward references are allowed; [`fixup`](crate::fixup) validates them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawChunk {
    types: Vec<TypeInfo<Placeholder>>,
    capacity: usize,
}

impl RawChunk {
    /// Empty raw chunk holding at most `capacity` nodes (clamped to
    /// [`MAX_RAW_CAPACITY`]).
    pub fn new(capacity: usize) -> Self {
        Self {
            types: Vec::new(),
            capacity: capacity.min(MAX_RAW_CAPACITY),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a node and return the placeholder that refers to it.
    pub fn push(&mut self, mut info: TypeInfo<Placeholder>) -> Result<Placeholder, CapacityError> {
        let slot = self.types.len();
        let index = match u8::try_from(slot) {
            Ok(index) if slot < self.capacity => index,
            _ => {
                return Err(CapacityError::ChunkFull {
                    capacity: self.capacity,
                })
            }
        };
        info.assign_index(u16::from(index));
        self.types.push(info);
        Ok(Placeholder::new(index))
    }

    /// Raw chunk sized exactly to `types`, stamping each node's index.
    ///
    /// The caller guarantees `types.len() <= MAX_RAW_CAPACITY`.
    pub(crate) fn from_decoded(mut types: Vec<TypeInfo<Placeholder>>) -> Self {
        debug_assert!(types.len() <= MAX_RAW_CAPACITY);
        for (slot, info) in (0..=u8::MAX).zip(types.iter_mut()) {
            info.assign_index(u16::from(slot));
        }
        let capacity = types.len();
        Self { types, capacity }
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&TypeInfo<Placeholder>> {
        self.types.get(placeholder.index())
    }

    pub(crate) fn into_parts(self) -> (Vec<TypeInfo<Placeholder>>, usize) {
        (self.types, self.capacity)
    }

    #[cfg(test)]
    pub(crate) fn types_mut(&mut self) -> &mut [TypeInfo<Placeholder>] {
        &mut self.types
    }
}
