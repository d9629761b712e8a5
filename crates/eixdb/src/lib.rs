//! eixdb - eix package-index cache reading library.
//!
//! This crate provides a unified interface to the eixdb crates.
//!
//! # Crates
//!
//! - [`eixdb_common`] - Byte sources (slice and stream readers)
//! - [`eixdb_format`] - Cache decoder and the decoded record types
//!
//! # Example
//!
//! ```no_run
//! use eixdb::prelude::*;
//!
//! let db = EixDatabase::open("/var/cache/eix/portage.eix")?;
//! println!(
//!     "{} categories, {} packages",
//!     db.categories().len(),
//!     db.package_count()
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use eixdb_common as common;
pub use eixdb_format as format;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use eixdb_common::{BinaryReader, ByteSource, StreamReader};
    pub use eixdb_format::{
        Category, DecodeOptions, Dependencies, EixDatabase, HashKind, HashRef, Header, Overlay,
        Package, Version, VersionPart,
    };
}

pub use eixdb_format::{EixDatabase, Error, Result};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
