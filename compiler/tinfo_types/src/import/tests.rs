use super::*;
use crate::{
    deep_equal, fixup, EdgeKind, MemoryInfo, Placeholder, PushError, RawChunk, RecordField,
    Variant,
};
use pretty_assertions::{assert_eq, assert_ne};

fn push(chunk: &mut Chunk, info: TypeInfo) -> TypeRef {
    match chunk.push(info) {
        Ok(id) => id,
        Err(err) => panic!("push failed: {err}"),
    }
}

fn import(dest: &mut Chunk, source: &Chunk, root: TypeRef) -> TypeRef {
    match dest.import(source, root) {
        Ok(id) => id,
        Err(err) => panic!("import failed: {err}"),
    }
}

/// `(Int -> Bool)`, optionally preceded by unrelated nodes.
fn int_to_bool(padding: usize) -> (Chunk, TypeRef) {
    let mut chunk = Chunk::new(16);
    for _ in 0..padding {
        push(&mut chunk, TypeInfo::string());
    }
    let int = push(&mut chunk, TypeInfo::int());
    let boolean = push(&mut chunk, TypeInfo::boolean());
    let function = push(&mut chunk, TypeInfo::function(vec![int, boolean]));
    (chunk, function)
}

/// `Tree(Node(Int, List<$Tree>) | Leaf)`, whose list element closes the
/// cycle through a `TypeRefId`.
fn tree() -> Chunk {
    let p = Placeholder::new;
    let mut raw = RawChunk::new(4);
    for node in [
        TypeInfo::custom(
            "Tree",
            vec![
                Variant::with_types("Node", [p(1), p(2)]),
                Variant::with_types("Leaf", []),
            ],
        ),
        TypeInfo::int(),
        TypeInfo::list(p(3)),
        TypeInfo::type_ref_id(p(0)),
    ] {
        if let Err(err) = raw.push(node) {
            panic!("push failed: {err}");
        }
    }
    match fixup(raw) {
        Ok(chunk) => chunk,
        Err(err) => panic!("fixup failed: {err}"),
    }
}

/// `Tree(Node(List<$Tree>) | Empty)`: same name as [`tree`], other shape.
fn other_tree() -> Chunk {
    let p = Placeholder::new;
    let mut raw = RawChunk::new(3);
    for node in [
        TypeInfo::custom(
            "Tree",
            vec![
                Variant::with_types("Node", [p(1)]),
                Variant::with_types("Empty", []),
            ],
        ),
        TypeInfo::list(p(2)),
        TypeInfo::type_ref_id(p(0)),
    ] {
        if let Err(err) = raw.push(node) {
            panic!("push failed: {err}");
        }
    }
    match fixup(raw) {
        Ok(chunk) => chunk,
        Err(err) => panic!("fixup failed: {err}"),
    }
}

/// Target of the `TypeRefId` inside the first list field of custom `tree`.
fn self_reference(chunk: &Chunk, tree: TypeRef) -> Option<TypeRef> {
    let custom = chunk.as_custom(tree)?;
    custom
        .variants
        .iter()
        .flat_map(|variant| &variant.fields)
        .find_map(|field| {
            let list = chunk.as_list(field.ty)?;
            match chunk.get(list.element).data() {
                TypeData::TypeRefId(target) => Some(*target),
                _ => None,
            }
        })
}

fn assert_topological(chunk: &Chunk) {
    for info in chunk {
        for (edge, target) in info.children() {
            if edge != EdgeKind::TypeRefId {
                assert!(
                    target < info.type_ref(),
                    "{} references {target}",
                    info.type_ref()
                );
            }
        }
    }
}

#[test]
fn shared_nodes_are_deduplicated() {
    let (first, first_root) = int_to_bool(0);
    let (second, second_root) = int_to_bool(3);

    let mut dest = Chunk::new(16);
    let a = import(&mut dest, &first, first_root);
    let b = import(&mut dest, &second, second_root);

    assert_eq!(a, b);
    assert_eq!(dest.len(), 3);
    assert_eq!(dest.format_type(a), "(Int -> Bool)");
    assert_topological(&dest);
}

#[test]
fn existing_equal_nodes_are_reused() {
    let mut dest = Chunk::new(16);
    let bool_first = push(&mut dest, TypeInfo::boolean());
    let (source, root) = int_to_bool(1);

    let id = import(&mut dest, &source, root);
    let Some(function) = dest.as_function(id) else {
        panic!("not a function");
    };
    assert_eq!(function.params[1], bool_first);
    assert_eq!(dest.len(), 3);
}

#[test]
fn only_reachable_nodes_are_imported() {
    let (source, root) = int_to_bool(4);
    let (chunk, id) = match Chunk::from_root(&source, root) {
        Ok(found) => found,
        Err(err) => panic!("import failed: {err}"),
    };
    assert_eq!(chunk.len(), 3);
    assert_eq!(chunk.capacity(), DEFAULT_CAPACITY);
    assert_eq!(id, TypeRef::new(2));
    assert!(deep_equal(&source, root, &chunk, id));
}

#[test]
fn children_land_before_parents() {
    let mut source = Chunk::new(16);
    let int = push(&mut source, TypeInfo::int());
    let string = push(&mut source, TypeInfo::string());
    let list = push(&mut source, TypeInfo::list(string));
    let record = push(
        &mut source,
        TypeInfo::record(vec![RecordField::new("id", int), RecordField::new("tags", list)]),
    );
    let alias = push(&mut source, TypeInfo::alias("Item", record));

    let mut dest = Chunk::new(16);
    push(&mut dest, TypeInfo::char());
    let id = import(&mut dest, &source, alias);

    assert_topological(&dest);
    assert_eq!(dest.len(), 6);
    assert_eq!(
        dest.format_type_with(id, crate::FormatFlags::EXPAND_ALIASES),
        "Item => {id : Int, tags : List<String>}"
    );
}

#[test]
fn full_destination_rejects_new_nodes() {
    let (source, root) = int_to_bool(0);
    let mut dest = Chunk::new(2);

    assert_eq!(
        dest.import(&source, root),
        Err(ImportError::Capacity(CapacityError::ChunkFull { capacity: 2 }))
    );
    assert!(dest.is_empty());
}

#[test]
fn full_destination_accepts_fully_shared_import() {
    let (source, root) = int_to_bool(0);
    let mut dest = Chunk::new(3);
    let first = import(&mut dest, &source, root);
    assert!(dest.is_full());

    assert_eq!(dest.import(&source, root), Ok(first));
}

#[test]
fn failed_import_rolls_back() {
    let mut dest = Chunk::new(3);
    push(&mut dest, TypeInfo::char());

    let (source, root) = int_to_bool(0);
    let before = dest.clone();
    let result = dest.import(&source, root);

    assert!(matches!(result, Err(ImportError::Capacity(_))));
    assert_eq!(dest, before);

    // The session forgets what the failed import appended.
    let mut dest = Chunk::new(2);
    let mut importer = Importer::new(&mut dest, &source, ImportOptions::default());
    assert!(importer.import(root).is_err());
    assert_eq!(importer.import(TypeRef::new(1)), Ok(TypeRef::new(0)));
    assert_eq!(importer.import(TypeRef::new(0)), Ok(TypeRef::new(1)));
}

#[test]
fn self_referential_type() {
    let source = tree();
    let root = TypeRef::new(0);

    let mut dest = Chunk::new(16);
    let id = import(&mut dest, &source, root);

    assert_eq!(dest.len(), 4);
    assert!(deep_equal(&source, root, &dest, id));
    let closing = dest
        .iter()
        .find_map(|info| match info.data() {
            TypeData::TypeRefId(target) => Some(*target),
            _ => None,
        });
    assert_eq!(closing, Some(id));
    assert_topological(&dest);

    // A second import finds the finished tree.
    assert_eq!(import(&mut dest, &source, root), id);
    assert_eq!(dest.len(), 4);
}

#[test]
fn self_referential_type_survives_round_trip() {
    let source = tree();
    let (chunk, id) = match Chunk::from_root(&source, TypeRef::new(0)) {
        Ok(found) => found,
        Err(err) => panic!("import failed: {err}"),
    };
    let bytes = match crate::encode(&chunk, &crate::EncodeOptions::default()) {
        Ok(bytes) => bytes,
        Err(err) => panic!("encode failed: {err}"),
    };
    let decoded = match crate::decode(&bytes, &crate::DecodeOptions::default()) {
        Ok(decoded) => decoded.chunk,
        Err(err) => panic!("decode failed: {err}"),
    };
    assert!(deep_equal(&chunk, id, &decoded, id));
}

#[test]
fn same_named_recursive_types_stay_apart() {
    let first = tree();
    let second = other_tree();

    let mut dest = Chunk::new(16);
    let a = import(&mut dest, &first, TypeRef::new(0));
    let b = import(&mut dest, &second, TypeRef::new(0));

    assert_ne!(a, b);
    assert_eq!(self_reference(&dest, a), Some(a));
    assert_eq!(self_reference(&dest, b), Some(b));
    // Int, $Tree, List<$Tree>, Tree, then the second tree's own three nodes.
    assert_eq!(dest.len(), 7);
    assert_topological(&dest);

    // Each tree is found again by a fresh import.
    assert_eq!(import(&mut dest, &second, TypeRef::new(0)), b);
    assert_eq!(import(&mut dest, &first, TypeRef::new(0)), a);
    assert_eq!(dest.len(), 7);
}

#[test]
fn recursive_list_is_reused_only_for_its_own_tree() {
    let source = tree();
    let mut dest = Chunk::new(16);
    let root = import(&mut dest, &source, TypeRef::new(0));

    // The list alone maps to the list already closing over `root`.
    let list = import(&mut dest, &source, TypeRef::new(2));
    let element = dest.as_list(list).map(|l| dest.get(l.element).data());
    assert_eq!(element, Some(&TypeData::TypeRefId(root)));
    assert_eq!(dest.len(), 4);
}

#[test]
fn value_dedup_keeps_layout_variants_apart() {
    let mut source = Chunk::new(8);
    let int = push(&mut source, TypeInfo::int());
    let wide = push(
        &mut source,
        TypeInfo::tuple_of([int, int]).with_layout(MemoryInfo::new(16, 8)),
    );

    let mut dest = Chunk::new(8);
    let int = push(&mut dest, TypeInfo::int());
    let packed = push(
        &mut dest,
        TypeInfo::tuple_of([int, int]).with_layout(MemoryInfo::new(8, 4)),
    );

    let mut deep = dest.clone();
    assert_eq!(deep.import(&source, wide), Ok(packed));

    let options = ImportOptions {
        dedup: Equality::Value,
    };
    let id = Importer::new(&mut dest, &source, options).import(wide);
    assert_eq!(id, Ok(TypeRef::new(2)));
    assert_eq!(dest.get(TypeRef::new(2)).layout(), Some(MemoryInfo::new(16, 8)));
}

#[test]
fn push_error_maps_to_import_error() {
    let err = ImportError::from(PushError::Capacity(CapacityError::ChunkFull { capacity: 1 }));
    assert_eq!(err, ImportError::Capacity(CapacityError::ChunkFull { capacity: 1 }));
}
