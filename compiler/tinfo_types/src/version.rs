//! Wire format version triple.

use std::fmt;
use std::str::FromStr;

use tinfo_wire::{ReadError, Reader, WriteError, Writer};

use crate::ParseVersionError;

/// `major.minor.patch`, written as three octets at the start of every chunk.
///
/// Readers require an exact match; there is no compatibility range.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl FormatVersion {
    /// Version read and written by default.
    pub const CURRENT: Self = Self::new(0, 1, 4);

    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> Result<Self, ReadError> {
        let octets = reader.read_octets(3)?;
        Ok(Self::new(octets[0], octets[1], octets[2]))
    }

    pub(crate) fn write<W: Writer + ?Sized>(self, writer: &mut W) -> Result<(), WriteError> {
        writer.write_octets(&[self.major, self.minor, self.patch])
    }
}

impl Default for FormatVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for FormatVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseVersionError {
            input: s.to_string(),
        };
        let mut parts = s.split('.').map(str::parse::<u8>);
        let (Some(Ok(major)), Some(Ok(minor)), Some(Ok(patch)), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        Ok(Self::new(major, minor, patch))
    }
}
