//! The `dump` command: print every node of a chunk file.

use std::path::Path;

use super::{decode_file, CliError, CliOptions};

/// Render the chunk at the start of `path`, one node per line.
///
/// Octets after the chunk are reported but not interpreted.
pub fn dump_file(path: &Path, options: &CliOptions) -> Result<String, CliError> {
    let (chunk, bytes, octets_read) = decode_file(path, &options.decode_options())?;
    let mut out = chunk.dump(options.flags);
    let trailing = bytes.len() - octets_read;
    if trailing > 0 {
        out.push_str(&format!("({trailing} trailing octets)\n"));
    }
    Ok(out)
}
