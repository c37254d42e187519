use std::thread;

use super::*;
use crate::{deep_equal, TypeInfo};
use pretty_assertions::assert_eq;

fn source(padding: usize) -> (Chunk, TypeRef) {
    let mut chunk = Chunk::new(16);
    let mut push = |info| match chunk.push(info) {
        Ok(id) => id,
        Err(err) => panic!("push failed: {err}"),
    };
    for _ in 0..padding {
        push(TypeInfo::char());
    }
    let int = push(TypeInfo::int());
    let list = push(TypeInfo::list(int));
    let root = push(TypeInfo::function(vec![int, list]));
    (chunk, root)
}

#[test]
fn concurrent_imports_share_nodes() {
    let shared = SharedChunk::new(Chunk::new(64));

    let ids: Vec<TypeRef> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|padding| {
                let shared = shared.clone();
                scope.spawn(move || {
                    let (chunk, root) = source(padding);
                    match shared.import(&chunk, root) {
                        Ok(id) => id,
                        Err(err) => panic!("import failed: {err}"),
                    }
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(id) => id,
                Err(_) => panic!("import thread panicked"),
            })
            .collect()
    });

    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(shared.len(), 3);
    let (chunk, root) = source(0);
    shared.with(|dest| assert!(deep_equal(&chunk, root, dest, ids[0])));
}

#[test]
fn snapshot_is_detached() {
    let shared = SharedChunk::default();
    assert!(shared.is_empty());

    let before = shared.snapshot();
    let (chunk, root) = source(0);
    assert!(shared.import(&chunk, root).is_ok());

    assert!(before.is_empty());
    assert_eq!(shared.snapshot().len(), 3);
}

#[test]
fn inner_chunk_is_released_by_last_handle() {
    let shared = SharedChunk::new(Chunk::new(4));
    let other = shared.clone();

    let Err(shared) = shared.try_into_inner() else {
        panic!("a second handle is still alive");
    };
    drop(other);
    let chunk = shared.try_into_inner();
    assert_eq!(chunk.map(|c| c.capacity()).ok(), Some(4));
}

#[test]
fn import_with_value_dedup() {
    let shared = SharedChunk::new(Chunk::new(8));
    let (chunk, root) = source(2);
    let options = ImportOptions {
        dedup: crate::Equality::Value,
    };
    assert_eq!(shared.import_with(&chunk, root, options), Ok(TypeRef::new(2)));
}
