//! Reference fixup.
//!
//! Turns a [`RawChunk`] into a [`Chunk`] by resolving every placeholder. For
//! each reference it checks:
//!
//! 1. the placeholder is below the node count;
//! 2. the node at that position reports the same index;
//!
//! and for each custom node, that every variant names that node as its
//! owner. Finally, the structural edges (everything except `TypeRefId`) must
//! form a DAG.
//!
//! The first violation aborts the whole pass. The raw chunk is consumed
//! either way, so a failed fixup leaves nothing half-resolved behind.

use smallvec::SmallVec;

use crate::{Chunk, EdgeKind, Placeholder, RawChunk, ReferenceError, TypeData, TypeInfo, TypeRef};

/// Resolve every placeholder of `raw`.
#[tracing::instrument(level = "debug", skip_all, fields(count = raw.len()))]
pub fn fixup(raw: RawChunk) -> Result<Chunk, ReferenceError> {
    let (types, capacity) = raw.into_parts();
    let count = types.len();
    let indices: Vec<u16> = types.iter().map(TypeInfo::index).collect();

    let mut resolved = Vec::with_capacity(count);
    for (node, info) in types.into_iter().enumerate() {
        check_owners(node, &info)?;
        let mut resolve = |placeholder: Placeholder| -> Result<TypeRef, ReferenceError> {
            let index = placeholder.raw();
            let Some(&found) = indices.get(placeholder.index()) else {
                return Err(ReferenceError::OutOfBounds { node, index, count });
            };
            if usize::from(found) != placeholder.index() {
                return Err(ReferenceError::IndexMismatch { node, index, found });
            }
            Ok(TypeRef::new(found))
        };
        let info = info.try_map_refs(&mut resolve).inspect_err(|err| {
            tracing::debug!(%err, "fixup failed");
        })?;
        resolved.push(info);
    }

    reject_cycles(&resolved)?;
    Ok(Chunk::from_fixed_up(resolved, capacity))
}

fn check_owners(node: usize, info: &TypeInfo<Placeholder>) -> Result<(), ReferenceError> {
    let TypeData::Custom(custom) = info.data() else {
        return Ok(());
    };
    match custom
        .variants
        .iter()
        .find(|variant| variant.owner != info.index())
    {
        Some(variant) => Err(ReferenceError::VariantOwner {
            node,
            variant: variant.name.to_string(),
            owner: variant.owner,
        }),
        None => Ok(()),
    }
}

/// Peel leaves off the structural graph until nothing is left. Whatever
/// remains sits on a cycle.
fn reject_cycles(types: &[TypeInfo]) -> Result<(), ReferenceError> {
    let mut unresolved = vec![0usize; types.len()];
    let mut parents: Vec<SmallVec<[usize; 2]>> = vec![SmallVec::new(); types.len()];
    for (node, info) in types.iter().enumerate() {
        info.data().for_each_ref(|edge, target| {
            if edge != EdgeKind::TypeRefId {
                unresolved[node] += 1;
                parents[target.index()].push(node);
            }
        });
    }

    let mut ready: Vec<usize> = (0..types.len()).filter(|&n| unresolved[n] == 0).collect();
    let mut peeled = 0;
    while let Some(node) = ready.pop() {
        peeled += 1;
        for &parent in &parents[node] {
            unresolved[parent] -= 1;
            if unresolved[parent] == 0 {
                ready.push(parent);
            }
        }
    }

    match unresolved.iter().position(|&n| n > 0) {
        Some(node) if peeled < types.len() => {
            tracing::debug!(node, "structural reference cycle");
            Err(ReferenceError::Cycle { node })
        }
        _ => Ok(()),
    }
}
