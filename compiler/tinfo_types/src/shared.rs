//! Chunk shared between threads.
//!
//! A [`Chunk`] has a single writer. When several threads import into the
//! same destination, they go through [`SharedChunk`], which holds the lock
//! for a whole import so dedup scans and index assignment never interleave.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Chunk, ImportError, ImportOptions, Importer, TypeRef};

/// Clonable handle to a mutex-guarded chunk.
#[derive(Clone, Debug, Default)]
pub struct SharedChunk(Arc<Mutex<Chunk>>);

impl SharedChunk {
    pub fn new(chunk: Chunk) -> Self {
        Self(Arc::new(Mutex::new(chunk)))
    }

    /// Import `root` of `source` while holding the lock.
    pub fn import(&self, source: &Chunk, root: TypeRef) -> Result<TypeRef, ImportError> {
        self.import_with(source, root, ImportOptions::default())
    }

    pub fn import_with(
        &self,
        source: &Chunk,
        root: TypeRef,
        options: ImportOptions,
    ) -> Result<TypeRef, ImportError> {
        let mut dest = self.0.lock();
        Importer::new(&mut dest, source, options).import(root)
    }

    /// Run `f` with read access to the chunk.
    pub fn with<R>(&self, f: impl FnOnce(&Chunk) -> R) -> R {
        f(&self.0.lock())
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    /// Snapshot of the current contents.
    pub fn snapshot(&self) -> Chunk {
        self.0.lock().clone()
    }

    /// The chunk, if this is the last handle.
    pub fn try_into_inner(self) -> Result<Chunk, Self> {
        Arc::try_unwrap(self.0)
            .map(Mutex::into_inner)
            .map_err(Self)
    }
}

#[cfg(test)]
mod tests;
