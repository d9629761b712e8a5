//! Packed version components.

use std::fmt;

use eixdb_common::ByteSource;
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::strings::read_text;
use crate::varint::read_number;
use crate::{Error, Result};

/// Bits of the packed field holding the part type.
const KIND_BITS: u32 = 5;
const KIND_MASK: u64 = (1 << KIND_BITS) - 1;

/// One component of a version string.
///
/// The type tag distinguishes components such as numeric parts or release
/// suffixes; it is carried as stored and not interpreted here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct VersionPart {
    /// Part type, `0..=31`.
    pub kind: u8,
    /// Part text.
    pub text: String,
}

impl VersionPart {
    /// Read a part: one number packing `(len << 5) | kind`, then `len` bytes of text.
    pub fn read<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self> {
        let packed = read_number(source)?;
        let kind = (packed & KIND_MASK) as u8;
        let len = usize::try_from(packed >> KIND_BITS)
            .map_err(|_| Error::NumberOverflow { bytes: 8 })?;

        Ok(Self {
            kind,
            text: read_text(source, len)?,
        })
    }
}

impl fmt::Display for VersionPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.text)
    }
}
