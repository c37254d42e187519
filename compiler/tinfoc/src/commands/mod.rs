//! Command handlers for the `tinfoc` CLI.
//!
//! Each submodule implements one command. Option parsing, file reading and
//! the shared error type live here in the module root.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tinfo_types::{
    decode, Chunk, DecodeError, DecodeOptions, EncodeError, FormatFlags, FormatVersion,
    ImportError, ParseVersionError,
};

mod check;
mod copy;
mod dump;
mod roundtrip;

pub use check::{check_files, CheckReport, Checked};
pub use copy::{copy_types, CopyReport};
pub use dump::dump_file;
pub use roundtrip::{roundtrip_file, RoundtripReport};

/// Everything a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("'{}': {source}", path.display())]
    Decode { path: PathBuf, source: DecodeError },
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Version(#[from] ParseVersionError),
    #[error("'{index}' is not a node index")]
    BadIndex { index: String },
    #[error("node {index} does not exist; the chunk has {count} nodes")]
    NoSuchNode { index: usize, count: usize },
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("option '{0}' needs a value")]
    MissingValue(String),
}

/// Options shared by every command, plus the positional arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// Wire version for reading and writing (`--version=M.m.p`).
    pub version: FormatVersion,
    /// `--expand-aliases`.
    pub flags: FormatFlags,
    /// `-o <path>`.
    pub output: Option<PathBuf>,
    /// Everything that is not an option.
    pub positional: Vec<String>,
}

impl CliOptions {
    /// Parse the arguments that follow the command name.
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let mut options = Self::default();
        let mut args = args.iter();
        while let Some(arg) = args.next() {
            if let Some(version) = arg.strip_prefix("--version=") {
                options.version = version.parse()?;
            } else if arg == "--expand-aliases" {
                options.flags |= FormatFlags::EXPAND_ALIASES;
            } else if arg == "-o" {
                let Some(path) = args.next() else {
                    return Err(CliError::MissingValue(arg.clone()));
                };
                options.output = Some(PathBuf::from(path));
            } else if arg.starts_with('-') && arg.len() > 1 {
                return Err(CliError::UnknownOption(arg.clone()));
            } else {
                options.positional.push(arg.clone());
            }
        }
        Ok(options)
    }

    pub(crate) fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            version: self.version,
        }
    }
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and decode the chunk at the start of `path`. Also returns the whole
/// file and the number of octets the chunk occupied.
pub(crate) fn decode_file(
    path: &Path,
    options: &DecodeOptions,
) -> Result<(Chunk, Vec<u8>, usize), CliError> {
    let bytes = read_file(path)?;
    let decoded = decode(&bytes, options).map_err(|source| CliError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), nodes = decoded.chunk.len(), "decoded");
    Ok((decoded.chunk, bytes, decoded.octets_read))
}
