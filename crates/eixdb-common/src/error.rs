//! Error types for eixdb-common.

use thiserror::Error;

/// Common error type for byte source operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of input reached while reading.
    #[error("unexpected end of input: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// A relative seek would move outside the source.
    #[error("seek by {delta} from position {position} is out of bounds")]
    SeekOutOfBounds { position: u64, delta: i64 },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
