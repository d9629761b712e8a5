//! Variable-length number decoding.
//!
//! Every integer in an eix cache is non-negative and stored with its width
//! encoded into the value itself. Let `n` be the number of `0xFF` bytes at the
//! start of a number; then `n + 1` bytes follow holding the value in
//! big-endian order. A value whose first byte is itself `0xFF` cannot be
//! written that way, so that byte is stored as `0x00` directly after the
//! prefix:
//!
//! | Number     | Bytes                    |
//! |------------|--------------------------|
//! | `0x00`     | `00`                     |
//! | `0xFE`     | `FE`                     |
//! | `0xFF`     | `FF 00`                  |
//! | `0x0100`   | `FF 01 00`               |
//! | `0xFF00`   | `FF FF 00 00`            |
//! | `0xABCDEF` | `FF FF AB CD EF`         |
//! | `0xFFABCD` | `FF FF FF 00 AB CD`      |

use byteorder::{BigEndian, ByteOrder};
use eixdb_common::ByteSource;

use crate::{Error, Result};

/// Widest value representable in a `u64`.
const MAX_WIDTH: usize = 8;

/// Read one variable-length number.
pub fn read_number<S: ByteSource + ?Sized>(source: &mut S) -> Result<u64> {
    let mut prefix = 0usize;
    let mut byte = source.read_u8()?;
    while byte == 0xFF {
        prefix += 1;
        byte = source.read_u8()?;
    }

    let mut value = [0u8; MAX_WIDTH];
    let width = if prefix > 0 && byte == 0x00 {
        // Escaped leading 0xFF: the prefix counts the value's first byte.
        check_width(prefix)?;
        value[0] = 0xFF;
        source.read_into(&mut value[1..prefix])?;
        prefix
    } else {
        let width = prefix + 1;
        check_width(width)?;
        source.seek_relative(-1)?;
        source.read_into(&mut value[..width])?;
        width
    };

    Ok(BigEndian::read_uint(&value, width))
}

/// Read a number used as a length or count.
pub(crate) fn read_len<S: ByteSource + ?Sized>(source: &mut S) -> Result<usize> {
    let value = read_number(source)?;
    usize::try_from(value).map_err(|_| Error::NumberOverflow {
        bytes: MAX_WIDTH,
    })
}

fn check_width(width: usize) -> Result<()> {
    if width > MAX_WIDTH {
        return Err(Error::NumberOverflow { bytes: width });
    }
    Ok(())
}
