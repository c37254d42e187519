//! Deduplicating import of a sub-graph into another chunk.
//!
//! For each node reachable from the root, the importer first looks for an
//! equal node already in the destination and reuses it. Only genuinely new
//! nodes are appended, children before parents, so every structural edge in
//! the destination points at a lower index.
//!
//! A `TypeRefId` whose target is still being imported (a self-referential
//! type) is appended pointing at itself, then re-targeted once the target
//! has been appended.
//!
//! Dedup compares a `TypeRefId` by where its target lands in the
//! destination, not by the target's name: a `List<$Tree>` is only reused if
//! its `$Tree` is the `Tree` this import maps to.
//!
//! An import either completes or leaves the destination as it found it.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::equal::ImportState;
use crate::stack::ensure_sufficient_stack;
use crate::{
    CapacityError, Chunk, Equality, ImportError, TypeData, TypeInfo, TypeRef, DEFAULT_CAPACITY,
};

/// Importer settings.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ImportOptions {
    /// Equality used to find a reusable destination node.
    pub dedup: Equality,
}

/// Import `root` of `source` into `dest` with default options.
pub fn import_into(
    dest: &mut Chunk,
    source: &Chunk,
    root: TypeRef,
) -> Result<TypeRef, ImportError> {
    Importer::new(dest, source, ImportOptions::default()).import(root)
}

impl Chunk {
    /// Import `root` of `source` into this chunk.
    pub fn import(&mut self, source: &Chunk, root: TypeRef) -> Result<TypeRef, ImportError> {
        import_into(self, source, root)
    }

    /// Fresh chunk of [`DEFAULT_CAPACITY`] holding exactly what `root`
    /// reaches, and the handle of `root` in it.
    pub fn from_root(source: &Chunk, root: TypeRef) -> Result<(Chunk, TypeRef), ImportError> {
        let mut chunk = Chunk::new(DEFAULT_CAPACITY);
        let id = chunk.import(source, root)?;
        Ok((chunk, id))
    }
}

/// An import session from one source chunk into one destination.
///
/// Handles already mapped during the session are reused without another
/// scan, so importing several roots that share sub-graphs visits each shared
/// node once.
pub struct Importer<'a> {
    dest: &'a mut Chunk,
    source: &'a Chunk,
    options: ImportOptions,
    /// Source handle to destination handle.
    mapped: FxHashMap<TypeRef, TypeRef>,
    /// Source nodes whose import is in progress.
    active: FxHashSet<TypeRef>,
    /// Source target to the destination `TypeRefId` nodes waiting for it.
    waiting: FxHashMap<TypeRef, SmallVec<[TypeRef; 2]>>,
}

impl<'a> Importer<'a> {
    pub fn new(dest: &'a mut Chunk, source: &'a Chunk, options: ImportOptions) -> Self {
        Self {
            dest,
            source,
            options,
            mapped: FxHashMap::default(),
            active: FxHashSet::default(),
            waiting: FxHashMap::default(),
        }
    }

    /// Import `root` and everything it reaches. On failure every node this
    /// call appended is removed again.
    #[tracing::instrument(level = "debug", skip(self), fields(dest_len = self.dest.len()))]
    pub fn import(&mut self, root: TypeRef) -> Result<TypeRef, ImportError> {
        let mark = self.dest.len();
        match self.import_node(root) {
            Ok(id) => {
                debug_assert!(self.waiting.is_empty());
                tracing::debug!(%id, added = self.dest.len() - mark, "imported");
                Ok(id)
            }
            Err(err) => {
                tracing::debug!(%err, "import failed; rolling back");
                self.dest.truncate(mark);
                self.mapped.retain(|_, id| id.index() < mark);
                self.active.clear();
                self.waiting.clear();
                Err(err)
            }
        }
    }

    fn import_node(&mut self, src: TypeRef) -> Result<TypeRef, ImportError> {
        if let Some(&id) = self.mapped.get(&src) {
            return Ok(id);
        }
        ensure_sufficient_stack(|| self.import_unmapped(src))
    }

    fn import_unmapped(&mut self, src: TypeRef) -> Result<TypeRef, ImportError> {
        let source = self.source;
        let info = source.get(src);

        if let TypeData::TypeRefId(target) = info.data() {
            return self.import_type_ref_id(src, *target);
        }

        if let Some(existing) = self.find_existing(src) {
            tracing::trace!(%src, %existing, "reused");
            self.mapped.insert(src, existing);
            return Ok(existing);
        }
        self.ensure_room()?;

        self.active.insert(src);
        let data = info
            .data()
            .clone()
            .try_map_refs(&mut |child| self.import_node(child));
        self.active.remove(&src);

        let id = self.append(TypeInfo {
            name: info.name.clone(),
            hash: 0,
            index: 0,
            data: data?,
        })?;
        self.mapped.insert(src, id);

        for waiting in self.waiting.remove(&src).unwrap_or_default() {
            self.dest.retarget_type_ref_id(waiting, id);
        }
        Ok(id)
    }

    fn import_type_ref_id(
        &mut self,
        src: TypeRef,
        target: TypeRef,
    ) -> Result<TypeRef, ImportError> {
        if self.active.contains(&target) {
            if let Some(&existing) = self.waiting.get(&target).and_then(|ids| ids.first()) {
                self.mapped.insert(src, existing);
                return Ok(existing);
            }
            // Point at itself until the target lands.
            let Some(slot) = self.dest.next_ref() else {
                return Err(self.full());
            };
            let id = self.append(TypeInfo::type_ref_id(slot))?;
            self.waiting.entry(target).or_default().push(id);
            self.mapped.insert(src, id);
            return Ok(id);
        }

        let resolved = self.import_node(target)?;
        if let Some(existing) = self.find_existing(src) {
            self.mapped.insert(src, existing);
            return Ok(existing);
        }
        let id = self.append(TypeInfo::type_ref_id(resolved))?;
        self.mapped.insert(src, id);
        Ok(id)
    }

    /// A destination node equal to `src`, judging `TypeRefId` nodes by
    /// where their targets land in this session.
    fn find_existing(&self, src: TypeRef) -> Option<TypeRef> {
        let state = ImportState {
            mapped: &self.mapped,
            active: &self.active,
            waiting: &self.waiting,
        };
        self.dest.find_for_import(self.source, src, self.options.dedup, &state)
    }

    fn append(&mut self, info: TypeInfo) -> Result<TypeRef, ImportError> {
        Ok(self.dest.push(info)?)
    }

    fn ensure_room(&self) -> Result<(), ImportError> {
        if self.dest.is_full() {
            Err(self.full())
        } else {
            Ok(())
        }
    }

    fn full(&self) -> ImportError {
        CapacityError::ChunkFull {
            capacity: self.dest.capacity(),
        }
        .into()
    }
}

#[cfg(test)]
mod tests;
