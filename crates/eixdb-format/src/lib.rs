//! Decoder for the eix package-index cache format.
//!
//! eix keeps a binary snapshot of a package tree (usually
//! `/var/cache/eix/portage.eix`) so that searches never have to touch the
//! ebuild repositories. This crate reads that snapshot into an immutable
//! tree of categories, packages, and versions.
//!
//! # File Format
//!
//! All integers use a self-describing variable-length encoding (see
//! [`varint`]). Strings are length-prefixed UTF-8, and vectors are
//! count-prefixed.
//! - 4 bytes: Magic (`eix\n`)
//! - Header: format version, category count, overlays, six string tables
//!   (EAPI, licenses, keywords, USE flags, slots, world sets), a flags
//!   number, and the dependency string table
//! - Categories: name followed by a vector of packages
//! - Packages: byte length of the record, name, description, homepage,
//!   license index, vector of versions
//!
//! Records refer to header table entries by index. Decoded records keep
//! those indices ([`HashRef`], [`OverlayRef`]) and resolve them through the
//! [`Header`], so every string has exactly one owner.
//!
//! # Example
//!
//! ```no_run
//! use eixdb_format::EixDatabase;
//!
//! let db = EixDatabase::open("/var/cache/eix/portage.eix")?;
//! let header = db.header();
//!
//! if let Some(package) = db.find("sys-libs/zlib") {
//!     for version in &package.versions {
//!         println!(
//!             "slot {} from {}",
//!             version.slot_name(header).unwrap_or_default(),
//!             version.overlay(header).map(|o| o.path.as_str()).unwrap_or_default(),
//!         );
//!     }
//! }
//! # Ok::<(), eixdb_format::Error>(())
//! ```

mod database;
mod error;
mod hash;
mod header;
mod query;
mod record;
mod strings;
mod version_part;

pub mod varint;

#[cfg(test)]
mod test_util;

pub use database::{DecodeOptions, EixDatabase};
pub use error::{Error, Result};
pub use hash::{HashKind, HashRef, HashTable};
pub use header::{Header, Overlay, OverlayRef};
pub use record::{read_categories, Category, CategoryId, Dependencies, Package, Version};
pub use strings::{read_hash, read_hashed_words, read_string, read_vector};
pub use version_part::VersionPart;
