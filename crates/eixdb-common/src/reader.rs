//! Binary reader for zero-copy parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! binary data from a byte slice without copying. It is the [`ByteSource`]
//! used for in-memory buffers and memory-mapped cache files.

use crate::{ByteSource, Error, Result};

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// # Example
///
/// ```
/// use eixdb_common::{BinaryReader, ByteSource};
///
/// let data = [0x65, 0x69, 0x78, 0x0A, 0x01];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_bytes(4).unwrap(), b"eix\n");
/// assert_eq!(reader.read_u8().unwrap(), 0x01);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }
}

impl ByteSource for BinaryReader<'_> {
    #[inline]
    fn position(&self) -> u64 {
        self.position as u64
    }

    #[inline]
    fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        let bytes = self.read_bytes(buf.len())?;
        buf.copy_from_slice(bytes);
        Ok(())
    }

    fn seek_relative(&mut self, delta: i64) -> Result<()> {
        let target = i64::try_from(self.position)
            .ok()
            .and_then(|p| p.checked_add(delta))
            .filter(|&p| p >= 0 && p as u64 <= self.data.len() as u64)
            .ok_or(Error::SeekOutOfBounds {
                position: self.position as u64,
                delta,
            })?;
        self.position = target as usize;
        Ok(())
    }

    #[inline]
    fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Checks the remaining length before allocating, so a corrupt length
    /// prefix cannot trigger a huge allocation.
    #[inline]
    fn read_vec(&mut self, count: usize) -> Result<Vec<u8>> {
        self.read_bytes(count).map(<[u8]>::to_vec)
    }
}
