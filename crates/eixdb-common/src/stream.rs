//! [`ByteSource`] adapter over `Read + Seek` streams.

use std::io::{self, Read, Seek, SeekFrom};

use crate::{ByteSource, Error, Result};

/// Reads a cache file from any seekable stream.
///
/// The position is tracked locally so [`ByteSource::position`] never has to
/// query the underlying stream. The last byte read is retained, which makes
/// a one-byte backward seek (the varint push-back) free: it never reaches the
/// stream, so a wrapping [`std::io::BufReader`] keeps its buffer.
#[derive(Debug)]
pub struct StreamReader<R> {
    inner: R,
    position: u64,
    /// Last byte handed out, if the stream has not moved since.
    last: Option<u8>,
    /// `last` has been pushed back and is the next byte to read.
    unread: bool,
}

impl<R: Read + Seek> StreamReader<R> {
    /// Wrap a stream, treating its current offset as position zero.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            position: 0,
            last: None,
            unread: false,
        }
    }

    /// Unwrap the underlying stream.
    ///
    /// A pending push-back is lost; the stream is left one byte ahead of
    /// [`position`](ByteSource::position) in that case.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Hand out the pushed-back byte, if any. Returns the number of bytes written.
    fn take_unread(&mut self, buf: &mut [u8]) -> usize {
        match (self.unread, self.last, buf.first_mut()) {
            (true, Some(byte), Some(slot)) => {
                *slot = byte;
                self.unread = false;
                self.position += 1;
                1
            }
            _ => 0,
        }
    }
}

impl<R: Read + Seek> ByteSource for StreamReader<R> {
    #[inline]
    fn position(&self) -> u64 {
        self.position
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = self.take_unread(buf);
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.position += filled as u64;
                    self.last = None;
                    return Err(Error::UnexpectedEof {
                        needed: buf.len(),
                        available: filled,
                    });
                }
                Ok(n) => {
                    filled += n;
                    self.position += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        if let Some(&byte) = buf.last() {
            self.last = Some(byte);
        }
        Ok(())
    }

    fn seek_relative(&mut self, delta: i64) -> Result<()> {
        if self.position.checked_add_signed(delta).is_none() {
            return Err(Error::SeekOutOfBounds {
                position: self.position,
                delta,
            });
        }

        if delta == -1 && self.last.is_some() && !self.unread {
            self.unread = true;
            self.position -= 1;
            return Ok(());
        }

        // The stream sits one byte past the logical position while a byte is pushed back.
        let stream_delta = if self.unread { delta - 1 } else { delta };
        self.inner.seek(SeekFrom::Current(stream_delta))?;
        self.position = self.position.wrapping_add_signed(delta);
        self.last = None;
        self.unread = false;
        Ok(())
    }

    /// Reads through `take` so the buffer only grows as bytes arrive.
    fn read_vec(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        if count == 0 {
            return Ok(bytes);
        }
        if let (true, Some(byte)) = (self.unread, self.last) {
            bytes.push(byte);
            self.unread = false;
            self.position += 1;
        }
        let wanted = (count - bytes.len()) as u64;
        let read = (&mut self.inner).take(wanted).read_to_end(&mut bytes)?;
        self.position += read as u64;
        self.last = bytes.last().copied();
        if bytes.len() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: bytes.len(),
            });
        }
        Ok(bytes)
    }
}
