//! Error types for cache decoding.

use thiserror::Error;

/// Errors that can occur while decoding an eix cache.
///
/// Every variant is fatal to the decode session: the format carries no
/// resynchronization points, so nothing is retried or skipped.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(eixdb_common::Error),

    /// The file does not start with `eix\n`.
    #[error("invalid eix magic: expected \"eix\\n\", got {actual:?}")]
    BadMagic { actual: Vec<u8> },

    /// The source ended before a field was complete.
    #[error("truncated input: needed {needed} bytes but only {available} available")]
    TruncatedInput { needed: usize, available: usize },

    /// String bytes were not valid UTF-8.
    #[error("invalid UTF-8 in string: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    /// A table index points past the end of its table.
    #[error("{table} index {index} out of range (table size: {len})")]
    IndexOutOfRange {
        table: &'static str,
        index: u64,
        len: usize,
    },

    /// A package record did not end where its stored offset said it would.
    #[error("package {package} is corrupt: record should end at byte {expected}, decoding ended at {actual}")]
    StructuralCorruption {
        package: String,
        expected: u64,
        actual: u64,
    },

    /// A number is wider than 64 bits.
    #[error("number of {bytes} bytes does not fit in 64 bits")]
    NumberOverflow { bytes: usize },

    /// Decoding was cancelled through [`DecodeOptions`](crate::DecodeOptions).
    #[error("decoding cancelled")]
    Cancelled,
}

impl From<eixdb_common::Error> for Error {
    fn from(err: eixdb_common::Error) -> Self {
        match err {
            eixdb_common::Error::UnexpectedEof { needed, available } => {
                Self::TruncatedInput { needed, available }
            }
            other => Self::Common(other),
        }
    }
}

/// Result type for cache decoding.
pub type Result<T> = std::result::Result<T, Error>;
