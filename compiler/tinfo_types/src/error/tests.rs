use super::*;
use crate::TypeRef;
use pretty_assertions::assert_eq;
use tinfo_wire::ReadError;

#[test]
fn stage_errors_keep_their_class() {
    let truncated = FormatError::Truncated(ReadError::UnexpectedEnd {
        pos: 3,
        needed: 1,
        available: 0,
    });
    let cases = [
        (Error::from(DecodeError::Format(truncated)), ErrorClass::Format),
        (
            Error::from(DecodeError::Reference(ReferenceError::Cycle { node: 0 })),
            ErrorClass::Reference,
        ),
        (
            Error::from(EncodeError::NameLength(NameLengthError {
                node: 1,
                name: "x".repeat(256),
                len: 256,
            })),
            ErrorClass::NameLength,
        ),
        (
            Error::from(EncodeError::CountOverflow {
                what: "node count",
                count: 256,
            }),
            ErrorClass::CountOverflow,
        ),
        (
            Error::from(ImportError::Capacity(CapacityError::ChunkFull { capacity: 1 })),
            ErrorClass::Capacity,
        ),
        (
            Error::from(PushError::Dangling {
                node: 0,
                target: TypeRef::new(4),
            }),
            ErrorClass::Reference,
        ),
        (
            Error::from(LayoutError::TupleArity { count: 0 }),
            ErrorClass::Layout,
        ),
    ];
    for (err, class) in cases {
        assert_eq!(err.class(), class, "{err}");
    }
}

#[test]
fn push_capacity_flattens_into_capacity() {
    let err = Error::from(PushError::Capacity(CapacityError::ChunkFull { capacity: 2 }));
    assert_eq!(err, Error::Capacity(CapacityError::ChunkFull { capacity: 2 }));
}

#[test]
fn write_errors_convert() {
    let full = tinfo_wire::WriteError::BufferFull {
        pos: 4,
        needed: 2,
        capacity: 5,
    };
    assert_eq!(
        EncodeError::from(full),
        EncodeError::Capacity(CapacityError::BufferFull {
            needed: 6,
            capacity: 5,
        })
    );
}

#[test]
fn messages() {
    assert_eq!(
        ReferenceError::OutOfBounds {
            node: 2,
            index: 99,
            count: 5,
        }
        .to_string(),
        "node 2 references index 99, but the chunk has 5 nodes"
    );
    assert_eq!(
        FormatError::VersionMismatch {
            expected: crate::FormatVersion::CURRENT,
            found: crate::FormatVersion::new(0, 1, 2),
        }
        .to_string(),
        "format version mismatch: expected 0.1.4, found 0.1.2"
    );
}
