//! The `roundtrip` command: decode a chunk and encode it again.

use std::path::Path;

use tinfo_types::{encode, EncodeOptions};

use super::{decode_file, CliError, CliOptions};

/// Outcome of re-encoding a decoded chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundtripReport {
    pub nodes: usize,
    /// Octets the chunk occupied in the input.
    pub octets: usize,
    /// Whether the re-encoding matches the input octet for octet.
    pub identical: bool,
    /// Offset of the first differing octet, if any.
    pub first_difference: Option<usize>,
}

/// Decode `path`, encode the result with the same version, and compare.
pub fn roundtrip_file(path: &Path, options: &CliOptions) -> Result<RoundtripReport, CliError> {
    let (chunk, bytes, octets_read) = decode_file(path, &options.decode_options())?;
    let encoded = encode(
        &chunk,
        &EncodeOptions {
            version: options.version,
        },
    )?;

    let original = &bytes[..octets_read];
    let common = original.len().min(encoded.len());
    let first_difference = original
        .iter()
        .zip(&encoded)
        .position(|(a, b)| a != b)
        .or((original.len() != encoded.len()).then_some(common));
    if let Some(offset) = first_difference {
        tracing::debug!(offset, "re-encoding differs");
    }

    Ok(RoundtripReport {
        nodes: chunk.len(),
        octets: octets_read,
        identical: first_difference.is_none(),
        first_difference,
    })
}
