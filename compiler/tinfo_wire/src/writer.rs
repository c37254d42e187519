//! Octet sinks.

use crate::{WriteError, MAX_COUNTED_LEN};

/// Destination for wire octets.
///
/// Implementors only provide [`write_octets`](Writer::write_octets) and
/// [`written`](Writer::written); the remaining primitives are built on top.
pub trait Writer {
    /// Append raw octets. On failure nothing is written.
    fn write_octets(&mut self, octets: &[u8]) -> Result<(), WriteError>;

    /// Octets written so far.
    fn written(&self) -> usize;

    /// Append one octet.
    fn write_u8(&mut self, value: u8) -> Result<(), WriteError> {
        self.write_octets(&[value])
    }

    /// Append a big-endian `u16`.
    fn write_u16_be(&mut self, value: u16) -> Result<(), WriteError> {
        self.write_octets(&value.to_be_bytes())
    }

    /// Append a length-prefixed run.
    fn write_counted(&mut self, octets: &[u8]) -> Result<(), WriteError> {
        let Ok(len) = u8::try_from(octets.len()) else {
            return Err(WriteError::CountedTooLong { len: octets.len() });
        };
        debug_assert!(usize::from(len) <= MAX_COUNTED_LEN);
        self.write_u8(len)?;
        self.write_octets(octets)
    }
}

impl Writer for Vec<u8> {
    fn write_octets(&mut self, octets: &[u8]) -> Result<(), WriteError> {
        self.extend_from_slice(octets);
        Ok(())
    }

    fn written(&self) -> usize {
        self.len()
    }
}

/// Writer over a caller-owned, fixed-size buffer.
#[derive(Debug)]
pub struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Room left in the buffer.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The written prefix of the buffer.
    pub fn as_written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}

impl Writer for SliceWriter<'_> {
    fn write_octets(&mut self, octets: &[u8]) -> Result<(), WriteError> {
        if octets.len() > self.remaining() {
            return Err(WriteError::BufferFull {
                pos: self.pos,
                needed: octets.len(),
                capacity: self.buf.len(),
            });
        }
        let end = self.pos + octets.len();
        self.buf[self.pos..end].copy_from_slice(octets);
        self.pos = end;
        Ok(())
    }

    fn written(&self) -> usize {
        self.pos
    }
}
