//! Structural equality.
//!
//! Two nodes are compared by shape, each viewed in its own chunk, so the
//! comparison works across chunks. [`Equality::Deep`] ignores memory layout
//! and generic parameter lists; [`Equality::Value`] additionally requires
//! identical memory info on aggregates and identical field offsets.
//!
//! Per kind:
//!
//! | kind | compared |
//! |------|----------|
//! | Custom | name, variants (name, field count, field types) |
//! | Record | name, fields (name, type) |
//! | Alias | name, target |
//! | Function | parameters, positionally |
//! | Tuple | field types, positionally (names ignored) |
//! | Array, List | element |
//! | Unmanaged | id, name |
//! | TypeRefId | kind and name of the referenced nodes, not their shape |
//! | scalars | kind only |
//!
//! `TypeRefId` is compared nominally so cyclic types compare in finite time.

use std::cell::RefCell;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::stack::ensure_sufficient_stack;
use crate::{Chunk, MemoryInfo, MemoryOffsetInfo, TypeData, TypeRef, Variant};

/// Which notion of equality to apply.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Equality {
    /// Shape only.
    #[default]
    Deep,
    /// Shape plus memory layout.
    Value,
}

/// Whether `a` in `a_chunk` and `b` in `b_chunk` have the same shape.
pub fn deep_equal(a_chunk: &Chunk, a: TypeRef, b_chunk: &Chunk, b: TypeRef) -> bool {
    Comparer::new(a_chunk, b_chunk, Equality::Deep).types(a, b)
}

/// Whether `a` and `b` have the same shape and the same memory layout.
pub fn value_equal(a_chunk: &Chunk, a: TypeRef, b_chunk: &Chunk, b: TypeRef) -> bool {
    Comparer::new(a_chunk, b_chunk, Equality::Value).types(a, b)
}

impl Equality {
    /// Compare `a` in `a_chunk` with `b` in `b_chunk`.
    pub fn compare(self, a_chunk: &Chunk, a: TypeRef, b_chunk: &Chunk, b: TypeRef) -> bool {
        Comparer::new(a_chunk, b_chunk, self).types(a, b)
    }
}

impl Chunk {
    /// First node of this chunk deep-equal to `id` in `source`.
    pub fn find_deep(&self, source: &Chunk, id: TypeRef) -> Option<TypeRef> {
        self.find_equal(source, id, Equality::Deep)
    }

    /// First node of this chunk equal to `id` in `source` under `equality`.
    pub fn find_equal(&self, source: &Chunk, id: TypeRef, equality: Equality) -> Option<TypeRef> {
        Comparer::new(self, source, equality).find(id)
    }

    /// Like [`find_equal`](Chunk::find_equal), but `TypeRefId` nodes are
    /// compared by where their targets land in this chunk during `import`.
    pub(crate) fn find_for_import(
        &self,
        source: &Chunk,
        id: TypeRef,
        equality: Equality,
        import: &ImportState<'_>,
    ) -> Option<TypeRef> {
        let mut comparer = Comparer::new(self, source, equality);
        comparer.import = Some(import);
        comparer.find(id)
    }
}

/// What an import session knows about source nodes, seen from the
/// destination chunk.
pub(crate) struct ImportState<'s> {
    /// Source handle to destination handle.
    pub(crate) mapped: &'s FxHashMap<TypeRef, TypeRef>,
    /// Source nodes whose import is in progress.
    pub(crate) active: &'s FxHashSet<TypeRef>,
    /// Source target to the destination `TypeRefId` nodes waiting for it.
    pub(crate) waiting: &'s FxHashMap<TypeRef, SmallVec<[TypeRef; 2]>>,
}

struct Comparer<'a> {
    left: &'a Chunk,
    right: &'a Chunk,
    equality: Equality,
    import: Option<&'a ImportState<'a>>,
    /// `TypeRefId` target pairs assumed equal while their shapes are compared.
    assumed: RefCell<FxHashSet<(TypeRef, TypeRef)>>,
}

impl<'a> Comparer<'a> {
    fn new(left: &'a Chunk, right: &'a Chunk, equality: Equality) -> Self {
        Self {
            left,
            right,
            equality,
            import: None,
            assumed: RefCell::default(),
        }
    }

    /// First node of `left` equal to `id` in `right`.
    fn find(&self, id: TypeRef) -> Option<TypeRef> {
        let wanted = self.right.get(id).kind();
        self.left
            .iter()
            .filter(|candidate| candidate.kind() == wanted)
            .map(|candidate| candidate.type_ref())
            .find(|&candidate| {
                self.assumed.borrow_mut().clear();
                self.types(candidate, id)
            })
    }

    fn types(&self, a: TypeRef, b: TypeRef) -> bool {
        if std::ptr::eq(self.left, self.right) && a == b {
            return true;
        }
        ensure_sufficient_stack(|| self.types_uncached(a, b))
    }

    fn types_uncached(&self, a: TypeRef, b: TypeRef) -> bool {
        let (x, y) = (self.left.get(a), self.right.get(b));
        if x.kind() != y.kind() {
            return false;
        }

        match (x.data(), y.data()) {
            (TypeData::Custom(p), TypeData::Custom(q)) => {
                x.name() == y.name()
                    && self.layout(p.layout, q.layout)
                    && p.variants.len() == q.variants.len()
                    && p.variants
                        .iter()
                        .zip(&q.variants)
                        .all(|(v, w)| self.variants(v, w))
            }
            (TypeData::Function(p), TypeData::Function(q)) => {
                p.params.len() == q.params.len()
                    && p.params
                        .iter()
                        .zip(&q.params)
                        .all(|(&s, &t)| self.types(s, t))
            }
            (TypeData::Alias(p), TypeData::Alias(q)) => {
                x.name() == y.name() && self.types(p.target, q.target)
            }
            (TypeData::Record(p), TypeData::Record(q)) => {
                x.name() == y.name()
                    && self.layout(p.layout, q.layout)
                    && p.fields.len() == q.fields.len()
                    && p.fields.iter().zip(&q.fields).all(|(s, t)| {
                        s.name == t.name
                            && self.offset(s.offset, t.offset)
                            && self.types(s.ty, t.ty)
                    })
            }
            (TypeData::Tuple(p), TypeData::Tuple(q)) => {
                self.layout(p.layout, q.layout)
                    && p.fields.len() == q.fields.len()
                    && p.fields
                        .iter()
                        .zip(&q.fields)
                        .all(|(s, t)| self.offset(s.offset, t.offset) && self.types(s.ty, t.ty))
            }
            (TypeData::Array(p), TypeData::Array(q)) | (TypeData::List(p), TypeData::List(q)) => {
                self.layout(p.layout, q.layout) && self.types(p.element, q.element)
            }
            (TypeData::TypeRefId(p), TypeData::TypeRefId(q)) => match self.import {
                Some(import) => self.landed(import, a, *p, *q),
                None => {
                    let (s, t) = (self.left.get(*p), self.right.get(*q));
                    s.kind() == t.kind() && s.name() == t.name()
                }
            },
            (TypeData::Unmanaged(p), TypeData::Unmanaged(q)) => {
                p.id == q.id && x.name() == y.name()
            }
            // Same kind, no payload.
            _ => true,
        }
    }

    /// Whether the destination `TypeRefId` node `node`, which points at
    /// `target`, stands for a source `TypeRefId` pointing at `source`.
    fn landed(
        &self,
        import: &ImportState<'_>,
        node: TypeRef,
        target: TypeRef,
        source: TypeRef,
    ) -> bool {
        if let Some(&id) = import.mapped.get(&source) {
            return id == target;
        }
        if import.active.contains(&source) {
            // Only the placeholders of this session will be re-targeted there.
            return import
                .waiting
                .get(&source)
                .is_some_and(|ids| ids.contains(&node));
        }
        if !self.assumed.borrow_mut().insert((target, source)) {
            return true;
        }
        self.types(target, source)
    }

    fn variants(&self, v: &Variant<TypeRef>, w: &Variant<TypeRef>) -> bool {
        v.name == w.name
            && self.layout(v.layout, w.layout)
            && v.fields.len() == w.fields.len()
            && v.fields
                .iter()
                .zip(&w.fields)
                .all(|(s, t)| self.offset(s.offset, t.offset) && self.types(s.ty, t.ty))
    }

    fn layout(&self, a: MemoryInfo, b: MemoryInfo) -> bool {
        self.equality == Equality::Deep || a == b
    }

    fn offset(&self, a: MemoryOffsetInfo, b: MemoryOffsetInfo) -> bool {
        self.equality == Equality::Deep || a == b
    }
}
