//! Common utilities for eixdb.
//!
//! This crate provides the byte-level plumbing the cache decoder reads through:
//!
//! - [`ByteSource`] - Sequential, seekable cursor trait used by every decoder
//! - [`BinaryReader`] - Zero-copy reading from byte slices (buffers and mmaps)
//! - [`StreamReader`] - Adapter over any `Read + Seek` stream

mod error;
mod reader;
mod source;
mod stream;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use source::ByteSource;
pub use stream::StreamReader;

/// Re-export memchr for SIMD-accelerated byte searching
pub use memchr;
