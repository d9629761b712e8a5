//! The [`ByteSource`] abstraction every decoder reads through.

use crate::Result;

/// A sequential, seekable cursor over the bytes of one cache file.
///
/// A source is owned exclusively by a single decode session. Reads never
/// return short: running out of input is always an error, since every field
/// in the cache format is either fixed-width or length-prefixed.
pub trait ByteSource {
    /// Current offset from the start of the source, in bytes.
    fn position(&self) -> u64;

    /// Fill `buf` completely or fail with [`Error::UnexpectedEof`](crate::Error::UnexpectedEof).
    fn read_into(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Move the cursor forward (positive) or backward (negative).
    fn seek_relative(&mut self, delta: i64) -> Result<()>;

    /// Read a single byte.
    #[inline]
    fn read_u8(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.read_into(&mut byte)?;
        Ok(byte[0])
    }

    /// Read `count` bytes into a freshly allocated buffer.
    fn read_vec(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; count];
        self.read_into(&mut bytes)?;
        Ok(bytes)
    }
}
