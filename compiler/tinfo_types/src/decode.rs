//! Wire decoder.
//!
//! ```text
//! chunk      := major:u8 minor:u8 patch:u8 count:u8 node{count}
//! node       := tag:u8 payload
//! name       := len:u8 octet{len}
//! ref        := u8
//! refs       := count:u8 ref{count}
//!
//! Custom     := name variants:u8 (name refs){variants}
//! Function   := refs
//! Alias      := name ref
//! Record     := fields:u8 (name ref){fields}
//! Array      := ref
//! List       := ref
//! Tuple      := refs
//! TypeRefId  := ref
//! Unmanaged  := id:u16be name
//! scalars    := (empty)
//! ```
//!
//! [`decode_raw`] stops at the first malformed octet; nothing partial is
//! returned. [`decode`] additionally runs [`fixup`].

use tinfo_wire::Reader;

use crate::{
    fixup, Chunk, DecodeError, FormatError, FormatVersion, Placeholder, RawChunk, RecordField,
    TupleField, TypeInfo, TypeKind, Variant, VariantField,
};

/// Decoder settings.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DecodeOptions {
    /// Version the header must match exactly.
    pub version: FormatVersion,
}

/// A decoded, fixed-up chunk and the number of octets it occupied.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Decoded {
    pub chunk: Chunk,
    pub octets_read: usize,
}

/// Decode and fix up the chunk at the start of `bytes`.
///
/// Trailing octets are left alone; `octets_read` says where the chunk ended.
#[tracing::instrument(level = "debug", skip_all, fields(len = bytes.len()))]
pub fn decode(bytes: &[u8], options: &DecodeOptions) -> Result<Decoded, DecodeError> {
    let mut reader = Reader::new(bytes);
    let chunk = decode_from_reader(&mut reader, options)?;
    Ok(Decoded {
        chunk,
        octets_read: reader.pos(),
    })
}

/// Decode and fix up a chunk embedded in a larger stream.
///
/// On success the reader is positioned just past the chunk.
pub fn decode_from_reader(
    reader: &mut Reader<'_>,
    options: &DecodeOptions,
) -> Result<Chunk, DecodeError> {
    let raw = decode_raw(reader, options)?;
    Ok(fixup(raw)?)
}

/// Decode a chunk without resolving its references.
pub fn decode_raw(
    reader: &mut Reader<'_>,
    options: &DecodeOptions,
) -> Result<RawChunk, FormatError> {
    let found = FormatVersion::read(reader)?;
    if found != options.version {
        tracing::debug!(%found, expected = %options.version, "version mismatch");
        return Err(FormatError::VersionMismatch {
            expected: options.version,
            found,
        });
    }

    let count = reader.read_u8()?;
    let mut types = Vec::with_capacity(usize::from(count));
    for slot in 0..count {
        let info = read_node(reader, slot).inspect_err(|err| {
            tracing::debug!(slot, %err, "malformed node");
        })?;
        tracing::trace!(slot, kind = %info.kind(), name = info.name(), "decoded node");
        types.push(info);
    }
    Ok(RawChunk::from_decoded(types))
}

fn read_node(reader: &mut Reader<'_>, slot: u8) -> Result<TypeInfo<Placeholder>, FormatError> {
    let offset = reader.pos();
    let tag = reader.read_u8()?;
    let Some(kind) = TypeKind::from_tag(tag) else {
        return Err(FormatError::UnknownKind {
            tag,
            node: slot,
            offset,
        });
    };

    let info = match kind {
        TypeKind::Custom => {
            let name = read_name(reader)?;
            let count = reader.read_u8()?;
            let variants = (0..count)
                .map(|_| {
                    let name = read_name(reader)?;
                    let fields = read_refs(reader)?
                        .into_iter()
                        .map(VariantField::new)
                        .collect();
                    Ok(Variant::new(name, fields))
                })
                .collect::<Result<_, FormatError>>()?;
            TypeInfo::custom(name, variants)
        }
        TypeKind::Function => TypeInfo::function(read_refs(reader)?),
        TypeKind::Alias => {
            let name = read_name(reader)?;
            TypeInfo::alias(name, read_ref(reader)?)
        }
        TypeKind::Record => {
            let count = reader.read_u8()?;
            let fields = (0..count)
                .map(|_| {
                    let name = read_name(reader)?;
                    Ok(RecordField::new(name, read_ref(reader)?))
                })
                .collect::<Result<_, FormatError>>()?;
            TypeInfo::record(fields)
        }
        TypeKind::Array => TypeInfo::array(read_ref(reader)?),
        TypeKind::List => TypeInfo::list(read_ref(reader)?),
        TypeKind::Tuple => TypeInfo::tuple(
            read_refs(reader)?
                .into_iter()
                .map(TupleField::new)
                .collect(),
        ),
        TypeKind::TypeRefId => TypeInfo::type_ref_id(read_ref(reader)?),
        TypeKind::Unmanaged => {
            let id = reader.read_u16_be()?;
            TypeInfo::unmanaged(id, read_name(reader)?)
        }
        TypeKind::CustomVariant => {
            return Err(FormatError::MisplacedKind {
                kind,
                node: slot,
                offset,
            })
        }
        TypeKind::String
        | TypeKind::Int
        | TypeKind::Fixed
        | TypeKind::Boolean
        | TypeKind::Blob
        | TypeKind::ResourceName
        | TypeKind::Char
        | TypeKind::Any
        | TypeKind::AnyMatchingTypes => match TypeInfo::scalar(kind) {
            Some(info) => info,
            None => return Err(FormatError::UnknownKind { tag, node: slot, offset }),
        },
    };
    Ok(info)
}

fn read_name(reader: &mut Reader<'_>) -> Result<Box<str>, FormatError> {
    let offset = reader.pos();
    let octets = reader.read_counted()?;
    std::str::from_utf8(octets)
        .map(Box::from)
        .map_err(|_| FormatError::InvalidName { offset })
}

fn read_ref(reader: &mut Reader<'_>) -> Result<Placeholder, FormatError> {
    Ok(Placeholder::new(reader.read_u8()?))
}

fn read_refs(reader: &mut Reader<'_>) -> Result<Vec<Placeholder>, FormatError> {
    let count = reader.read_u8()?;
    (0..count).map(|_| read_ref(reader)).collect()
}
