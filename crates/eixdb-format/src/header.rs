//! Cache header: magic, counts, overlays, and the global hash tables.

use eixdb_common::ByteSource;
#[cfg(feature = "serde")]
use serde::Serialize;
use tracing::instrument;

use crate::hash::{HashKind, HashRef, HashTable};
use crate::strings::{read_hash, read_string, read_vector};
use crate::varint::read_number;
use crate::{Error, Result};

/// Flag bit: dependency strings are stored with every version.
const FLAG_DEPENDENCIES: u64 = 0x01;
/// Flag bit: REQUIRED_USE is stored with every version.
const FLAG_REQUIRED_USE: u64 = 0x02;

/// A package repository known to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Overlay {
    /// Filesystem path of the repository.
    pub path: String,
    /// Repository name.
    pub label: String,
}

impl Overlay {
    /// Read an overlay as a `(path, label)` string pair.
    pub fn read<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self> {
        Ok(Self {
            path: read_string(source)?,
            label: read_string(source)?,
        })
    }
}

/// Validated index into [`Header::overlays`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct OverlayRef(usize);

impl OverlayRef {
    /// Position within the overlay list.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Decoded cache header.
///
/// The tables are fixed once the header is read; every later index in the
/// file refers into exactly one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Header {
    /// Cache file format version.
    pub file_format_version: u64,
    /// Number of category records following the header.
    pub no_categories: u64,
    /// Repositories, in file order.
    pub overlays: Vec<Overlay>,
    pub eapi: HashTable,
    pub licenses: HashTable,
    pub keywords: HashTable,
    pub use_flags: HashTable,
    pub slots: HashTable,
    pub world_sets: HashTable,
    /// Versions carry DEPEND/RDEPEND/PDEPEND/HDEPEND strings.
    pub dependencies_stored: bool,
    /// Versions carry REQUIRED_USE.
    pub required_use_stored: bool,
    /// Byte length of the depend table as stored in the file.
    pub depend_hash_len: u64,
    pub depend: HashTable,
}

impl Header {
    /// Magic bytes at the start of every cache file.
    pub const MAGIC: &'static [u8; 4] = b"eix\n";

    /// Size of the magic bytes.
    pub const MAGIC_LEN: usize = 4;

    /// Read the header from the start of a cache.
    #[instrument(level = "debug", skip_all, fields(format_version, categories))]
    pub fn read<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self> {
        let mut magic = [0u8; Self::MAGIC_LEN];
        source.read_into(&mut magic)?;
        if &magic != Self::MAGIC {
            return Err(Error::BadMagic {
                actual: magic.to_vec(),
            });
        }

        let file_format_version = read_number(source)?;
        let no_categories = read_number(source)?;
        let span = tracing::Span::current();
        span.record("format_version", file_format_version);
        span.record("categories", no_categories);

        let overlays = read_vector(source, Overlay::read)?;
        let eapi = read_hash(source, HashKind::Eapi)?;
        let licenses = read_hash(source, HashKind::Licenses)?;
        let keywords = read_hash(source, HashKind::Keywords)?;
        let use_flags = read_hash(source, HashKind::UseFlags)?;
        let slots = read_hash(source, HashKind::Slots)?;
        let world_sets = read_hash(source, HashKind::WorldSets)?;

        let flags = read_number(source)?;

        // The stored length would allow skipping the table, but versions
        // dereference into it whenever dependencies are stored.
        let depend_hash_len = read_number(source)?;
        let depend_start = source.position();
        let depend = read_hash(source, HashKind::Depend)?;
        let depend_actual = source.position() - depend_start;
        if depend_actual != depend_hash_len {
            tracing::debug!(
                stored = depend_hash_len,
                actual = depend_actual,
                "depend table length differs from stored length"
            );
        }

        tracing::debug!(
            overlays = overlays.len(),
            licenses = licenses.len(),
            keywords = keywords.len(),
            use_flags = use_flags.len(),
            depend = depend.len(),
            flags,
            "Decoded header tables"
        );

        Ok(Self {
            file_format_version,
            no_categories,
            overlays,
            eapi,
            licenses,
            keywords,
            use_flags,
            slots,
            world_sets,
            dependencies_stored: flags & FLAG_DEPENDENCIES != 0,
            required_use_stored: flags & FLAG_REQUIRED_USE != 0,
            depend_hash_len,
            depend,
        })
    }

    /// Get a hash table by kind.
    pub fn table(&self, kind: HashKind) -> &HashTable {
        match kind {
            HashKind::Eapi => &self.eapi,
            HashKind::Licenses => &self.licenses,
            HashKind::Keywords => &self.keywords,
            HashKind::UseFlags => &self.use_flags,
            HashKind::Slots => &self.slots,
            HashKind::WorldSets => &self.world_sets,
            HashKind::Depend => &self.depend,
        }
    }

    /// Resolve a reference to its text.
    ///
    /// Returns `None` only for a reference decoded against a different header.
    pub fn resolve(&self, reference: HashRef) -> Option<&str> {
        self.table(reference.kind()).get(reference.index())
    }

    /// Resolve a slot reference, reporting the empty slot as `"0"`.
    pub fn slot_name(&self, reference: HashRef) -> Option<&str> {
        self.resolve(reference)
            .map(|slot| if slot.is_empty() { "0" } else { slot })
    }

    /// Validate an overlay index read from the file.
    pub fn overlay_ref(&self, index: u64) -> Result<OverlayRef> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.overlays.len())
            .map(OverlayRef)
            .ok_or(Error::IndexOutOfRange {
                table: "overlay",
                index,
                len: self.overlays.len(),
            })
    }

    /// Get an overlay by reference.
    pub fn overlay(&self, reference: OverlayRef) -> Option<&Overlay> {
        self.overlays.get(reference.0)
    }
}
