//! Wire encoder, the inverse of [`decode`](crate::decode).
//!
//! Generic parameter lists and memory info have no wire representation and
//! are not written.

use tinfo_wire::{SliceWriter, Writer, MAX_COUNTED_LEN};

use crate::{
    Chunk, EncodeError, EncodingInvariantError, FormatVersion, NameLengthError, TypeData,
    TypeInfo, TypeRef,
};

/// Encoder settings.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct EncodeOptions {
    /// Version written into the header.
    pub version: FormatVersion,
}

/// Encode `chunk` into a fresh buffer.
#[tracing::instrument(level = "debug", skip_all, fields(count = chunk.len()))]
pub fn encode(chunk: &Chunk, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    encode_to(chunk, &mut out, options)?;
    Ok(out)
}

/// Encode `chunk` into `buf`, returning the number of octets written.
///
/// Fails with [`CapacityError::BufferFull`](crate::CapacityError::BufferFull)
/// if `buf` is too small.
pub fn encode_into(
    chunk: &Chunk,
    buf: &mut [u8],
    options: &EncodeOptions,
) -> Result<usize, EncodeError> {
    let mut writer = SliceWriter::new(buf);
    encode_to(chunk, &mut writer, options)?;
    Ok(writer.written())
}

/// Encode `chunk` into any [`Writer`].
pub fn encode_to<W: Writer + ?Sized>(
    chunk: &Chunk,
    writer: &mut W,
    options: &EncodeOptions,
) -> Result<(), EncodeError> {
    options.version.write(writer)?;
    write_count(writer, "node count", chunk.len())?;
    for (position, info) in chunk.iter().enumerate() {
        write_node(writer, position, info).inspect_err(|err| {
            tracing::debug!(position, %err, "encode failed");
        })?;
    }
    Ok(())
}

fn write_node<W: Writer + ?Sized>(
    writer: &mut W,
    position: usize,
    info: &TypeInfo,
) -> Result<(), EncodeError> {
    if usize::from(info.index()) != position {
        return Err(EncodingInvariantError {
            position,
            index: info.index(),
        }
        .into());
    }

    writer.write_u8(info.kind().tag())?;
    match info.data() {
        TypeData::Custom(custom) => {
            if !custom.generics.is_empty() {
                tracing::debug!(position, "generic parameters are not written");
            }
            write_name(writer, position, info.name())?;
            write_count(writer, "variant count", custom.variants.len())?;
            for variant in &custom.variants {
                write_name(writer, position, &variant.name)?;
                let fields = variant.fields.iter().map(|field| field.ty);
                write_refs(writer, fields, variant.fields.len())?;
            }
        }
        TypeData::Function(function) => {
            write_refs(writer, function.params.iter().copied(), function.params.len())?;
        }
        TypeData::Alias(alias) => {
            write_name(writer, position, info.name())?;
            write_ref(writer, alias.target)?;
        }
        TypeData::Record(record) => {
            if !record.generics.is_empty() {
                tracing::debug!(position, "generic parameters are not written");
            }
            write_count(writer, "field count", record.fields.len())?;
            for field in &record.fields {
                write_name(writer, position, &field.name)?;
                write_ref(writer, field.ty)?;
            }
        }
        TypeData::Array(element) | TypeData::List(element) => write_ref(writer, element.element)?,
        TypeData::Tuple(tuple) => {
            let fields = tuple.fields.iter().map(|field| field.ty);
            write_refs(writer, fields, tuple.fields.len())?;
        }
        TypeData::TypeRefId(target) => write_ref(writer, *target)?,
        TypeData::Unmanaged(unmanaged) => {
            writer.write_u16_be(unmanaged.id)?;
            write_name(writer, position, info.name())?;
        }
        TypeData::String
        | TypeData::Int
        | TypeData::Fixed
        | TypeData::Boolean
        | TypeData::Blob
        | TypeData::ResourceName
        | TypeData::Char
        | TypeData::Any
        | TypeData::AnyMatchingTypes => {}
    }
    Ok(())
}

fn write_name<W: Writer + ?Sized>(
    writer: &mut W,
    node: usize,
    name: &str,
) -> Result<(), EncodeError> {
    if name.len() > MAX_COUNTED_LEN {
        return Err(NameLengthError {
            node,
            name: name.to_string(),
            len: name.len(),
        }
        .into());
    }
    Ok(writer.write_counted(name.as_bytes())?)
}

fn write_count<W: Writer + ?Sized>(
    writer: &mut W,
    what: &'static str,
    count: usize,
) -> Result<(), EncodeError> {
    let Ok(octet) = u8::try_from(count) else {
        return Err(EncodeError::CountOverflow { what, count });
    };
    Ok(writer.write_u8(octet)?)
}

fn write_ref<W: Writer + ?Sized>(writer: &mut W, target: TypeRef) -> Result<(), EncodeError> {
    write_count(writer, "reference index", target.index())
}

fn write_refs<W: Writer + ?Sized>(
    writer: &mut W,
    mut refs: impl Iterator<Item = TypeRef>,
    len: usize,
) -> Result<(), EncodeError> {
    write_count(writer, "reference count", len)?;
    refs.try_for_each(|target| write_ref(writer, target))
}
