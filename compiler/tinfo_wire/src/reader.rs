//! Forward-only cursor over a borrowed octet buffer.

use crate::ReadError;

/// Forward-only reader over a byte slice.
///
/// # Invariants
///
/// - `pos <= buf.len()` at all times.
/// - A failed read does not move `pos`.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader positioned at the start of `buf`.
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Octets consumed so far.
    #[inline]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Octets left to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Whether every octet has been consumed.
    #[inline]
    pub const fn is_at_end(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// The unread tail of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Read one octet.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        match self.buf.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                Ok(byte)
            }
            None => Err(self.short(1)),
        }
    }

    /// Read a big-endian `u16` (two octets, high first).
    pub fn read_u16_be(&mut self) -> Result<u16, ReadError> {
        let octets = self.read_octets(2)?;
        Ok(u16::from_be_bytes([octets[0], octets[1]]))
    }

    /// Read exactly `len` raw octets.
    pub fn read_octets(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        if len > self.remaining() {
            return Err(self.short(len));
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.buf[start..self.pos])
    }

    /// Read a length-prefixed run: one length octet, then that many octets.
    ///
    /// If the run itself is truncated, the cursor is restored to the length
    /// octet.
    pub fn read_counted(&mut self) -> Result<&'a [u8], ReadError> {
        let start = self.pos;
        let len = self.read_u8()?;
        self.read_octets(usize::from(len)).inspect_err(|_| {
            self.pos = start;
        })
    }

    fn short(&self, needed: usize) -> ReadError {
        ReadError::UnexpectedEnd {
            pos: self.pos,
            needed,
            available: self.remaining(),
        }
    }
}
