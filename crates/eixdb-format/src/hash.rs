//! Header string tables and references into them.
//!
//! Strings that repeat across the cache (licenses, keywords, USE flags, ...)
//! are stored once in the header. Records refer to them by position, so a
//! table's order is its identity: the same text may legally appear at two
//! indices and the two are distinct entries.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{Error, Result};

/// Names one of the hash tables stored in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HashKind {
    Eapi,
    Licenses,
    Keywords,
    UseFlags,
    Slots,
    WorldSets,
    Depend,
}

impl HashKind {
    /// Human-readable table name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eapi => "EAPI",
            Self::Licenses => "license",
            Self::Keywords => "keyword",
            Self::UseFlags => "USE flag",
            Self::Slots => "slot",
            Self::WorldSets => "world set",
            Self::Depend => "dependency",
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered table of strings from the header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct HashTable {
    #[cfg_attr(feature = "serde", serde(skip))]
    kind: HashKind,
    entries: Vec<String>,
}

impl HashTable {
    /// Create a table from entries in file order.
    pub fn new(kind: HashKind, entries: Vec<String>) -> Self {
        Self { kind, entries }
    }

    /// Which header table this is.
    #[inline]
    pub fn kind(&self) -> HashKind {
        self.kind
    }

    /// Get an entry by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(String::as_str)
    }

    /// Dereference an index read from the file.
    pub fn lookup(&self, index: u64) -> Result<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.get(i))
            .ok_or(Error::IndexOutOfRange {
                table: self.kind.name(),
                index,
                len: self.len(),
            })
    }

    /// Validate an index read from the file and turn it into a reference.
    pub fn reference(&self, index: u64) -> Result<HashRef> {
        self.lookup(index)?;
        Ok(HashRef {
            kind: self.kind,
            index: index as usize,
        })
    }
}

/// A reference to one entry of a header hash table.
///
/// References are checked against the table bounds when decoded, so
/// resolving one against the header it was decoded with always succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HashRef {
    kind: HashKind,
    index: usize,
}

impl HashRef {
    /// The table this reference points into.
    #[inline]
    pub fn kind(&self) -> HashKind {
        self.kind
    }

    /// Position within the table.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}
