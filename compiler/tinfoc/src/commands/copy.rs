//! The `copy` command: extract selected nodes, and everything they reach,
//! into a new chunk.

use std::path::Path;

use tinfo_types::{
    encode, Chunk, EncodeOptions, ImportOptions, Importer, TypeRef, MAX_RAW_CAPACITY,
};

use super::{decode_file, CliError, CliOptions};

/// What a copy produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopyReport {
    /// The new chunk.
    pub chunk: Chunk,
    /// Position in the new chunk of each requested node, in request order.
    pub roots: Vec<TypeRef>,
    /// Encoded size, when an output file was written.
    pub written: Option<usize>,
}

/// Import the nodes at `indices` of the chunk in `path` into a fresh chunk,
/// sharing common sub-graphs. Writes the encoding to `options.output` when
/// set.
pub fn copy_types(
    path: &Path,
    indices: &[String],
    options: &CliOptions,
) -> Result<CopyReport, CliError> {
    let (source, _, _) = decode_file(path, &options.decode_options())?;
    let roots = indices
        .iter()
        .map(|index| parse_index(index, &source))
        .collect::<Result<Vec<_>, _>>()?;

    // One octet of node count on the wire.
    let mut chunk = Chunk::new(MAX_RAW_CAPACITY - 1);
    let roots = {
        let mut importer = Importer::new(&mut chunk, &source, ImportOptions::default());
        roots
            .into_iter()
            .map(|root| importer.import(root))
            .collect::<Result<Vec<_>, _>>()?
    };

    let written = match &options.output {
        Some(out) => {
            let bytes = encode(
                &chunk,
                &EncodeOptions {
                    version: options.version,
                },
            )?;
            std::fs::write(out, &bytes).map_err(|source| CliError::Write {
                path: out.clone(),
                source,
            })?;
            Some(bytes.len())
        }
        None => None,
    };

    Ok(CopyReport {
        chunk,
        roots,
        written,
    })
}

fn parse_index(index: &str, source: &Chunk) -> Result<TypeRef, CliError> {
    let Ok(position) = index.parse::<usize>() else {
        return Err(CliError::BadIndex {
            index: index.to_string(),
        });
    };
    source
        .type_from_index(position)
        .map(|info| info.type_ref())
        .ok_or(CliError::NoSuchNode {
            index: position,
            count: source.len(),
        })
}
