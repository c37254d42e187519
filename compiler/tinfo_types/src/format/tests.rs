use super::*;
use crate::{RecordField, TypeInfo, Variant};
use pretty_assertions::assert_eq;

fn push(chunk: &mut Chunk, info: TypeInfo) -> TypeRef {
    match chunk.push(info) {
        Ok(id) => id,
        Err(err) => panic!("push failed: {err}"),
    }
}

#[test]
fn scalars_print_their_names() {
    let mut chunk = Chunk::new(16);
    let cases = [
        (TypeInfo::int(), "Int"),
        (TypeInfo::boolean(), "Bool"),
        (TypeInfo::string(), "String"),
        (TypeInfo::any_matching_types(), "*"),
        (TypeInfo::resource_name(), "ResourceName"),
    ];
    for (info, expected) in cases {
        let id = push(&mut chunk, info);
        assert_eq!(chunk.format_type(id), expected);
    }
}

#[test]
fn containers_and_composites() {
    let mut chunk = Chunk::new(16);
    let int = push(&mut chunk, TypeInfo::int());
    let boolean = push(&mut chunk, TypeInfo::boolean());
    let string = push(&mut chunk, TypeInfo::string());
    let list = push(&mut chunk, TypeInfo::list(int));
    let array = push(&mut chunk, TypeInfo::array(list));
    let function = push(&mut chunk, TypeInfo::function(vec![int, boolean]));
    let unit = push(&mut chunk, TypeInfo::function(vec![]));
    let tuple = push(&mut chunk, TypeInfo::tuple_of([int, boolean]));
    let record = push(
        &mut chunk,
        TypeInfo::record(vec![RecordField::new("a", int), RecordField::new("b", string)]),
    );

    assert_eq!(chunk.format_type(list), "List<Int>");
    assert_eq!(chunk.format_type(array), "Array<List<Int>>");
    assert_eq!(chunk.format_type(function), "(Int -> Bool)");
    assert_eq!(chunk.format_type(unit), "()");
    assert_eq!(chunk.format_type(tuple), "(Int, Bool)");
    assert_eq!(chunk.format_type(record), "{a : Int, b : String}");
}

#[test]
fn custom_with_generics() {
    let mut chunk = Chunk::new(8);
    let int = push(&mut chunk, TypeInfo::int());
    let maybe = push(
        &mut chunk,
        TypeInfo::custom(
            "Maybe",
            vec![
                Variant::with_types("Just", [int]),
                Variant::with_types("Nothing", []),
            ],
        )
        .with_generics(vec![int]),
    );
    assert_eq!(chunk.format_type(maybe), "Maybe<Int>(Just(Int) | Nothing)");
}

#[test]
fn aliases_collapse_unless_expanded() {
    let mut chunk = Chunk::new(8);
    let int = push(&mut chunk, TypeInfo::int());
    let cool = push(&mut chunk, TypeInfo::alias("Cool", int));
    let list = push(&mut chunk, TypeInfo::list(cool));

    assert_eq!(chunk.format_type(list), "List<Cool>");
    assert_eq!(
        chunk.format_type_with(list, FormatFlags::EXPAND_ALIASES),
        "List<Cool => Int>"
    );
}

#[test]
fn named_references() {
    let mut chunk = Chunk::new(8);
    let node = push(&mut chunk, TypeInfo::custom("Node", vec![]));
    let id = push(&mut chunk, TypeInfo::type_ref_id(node));
    let file = push(&mut chunk, TypeInfo::unmanaged(9, "FILE"));

    assert_eq!(chunk.format_type(id), "$Node");
    assert_eq!(chunk.format_type(file), "Unmanaged<FILE>");
}

#[test]
fn display_matches_format() {
    let mut chunk = Chunk::new(4);
    let int = push(&mut chunk, TypeInfo::int());
    let list = push(&mut chunk, TypeInfo::list(int));
    assert_eq!(
        format!("value: {}", chunk.display(list, FormatFlags::empty())),
        "value: List<Int>"
    );
}

#[test]
fn dump_lists_every_node() {
    let mut chunk = Chunk::new(4);
    let int = push(&mut chunk, TypeInfo::int());
    let alias = push(&mut chunk, TypeInfo::alias("Id", int));
    push(&mut chunk, TypeInfo::list(alias));

    assert_eq!(
        chunk.dump(FormatFlags::EXPAND_ALIASES),
        "type count: 3\n0: Int\n1: Id => Int\n2: List<Id => Int>\n"
    );
    assert_eq!(Chunk::new(1).dump(FormatFlags::empty()), "type count: 0\n");
}
