//! The `check` command: validate many chunk files in parallel.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tinfo_types::{encode, fnv, EncodeOptions};

use super::{decode_file, CliError, CliOptions};

/// Result of checking one file.
#[derive(Debug)]
pub struct CheckReport {
    pub path: PathBuf,
    pub outcome: Result<Checked, CliError>,
}

/// A file that decoded and re-encoded cleanly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checked {
    pub nodes: usize,
    /// FNV-1a of the canonical encoding. Equal chunks have equal
    /// fingerprints regardless of trailing data in the file.
    pub fingerprint: u32,
}

/// Check every file in `paths`. Reports come back in input order.
pub fn check_files(paths: &[PathBuf], options: &CliOptions) -> Vec<CheckReport> {
    paths
        .par_iter()
        .map(|path| CheckReport {
            path: path.clone(),
            outcome: check_one(path, options),
        })
        .collect()
}

fn check_one(path: &Path, options: &CliOptions) -> Result<Checked, CliError> {
    let (chunk, _, _) = decode_file(path, &options.decode_options())?;
    let canonical = encode(
        &chunk,
        &EncodeOptions {
            version: options.version,
        },
    )?;
    Ok(Checked {
        nodes: chunk.len(),
        fingerprint: fnv::fnv1a(&canonical),
    })
}
