//! Decode sessions: turning a cache file into an [`EixDatabase`].

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use eixdb_common::{BinaryReader, ByteSource, StreamReader};
use memmap2::Mmap;
#[cfg(feature = "serde")]
use serde::Serialize;
use tracing::instrument;

use crate::header::Header;
use crate::record::{read_categories, Category};
use crate::{Error, Result};

/// Knobs for a decode session.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    cancel: Option<Arc<AtomicBool>>,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort with [`Error::Cancelled`] once `flag` is set.
    ///
    /// The flag is polled before each category and each package.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub(crate) fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}

/// A fully decoded eix cache.
///
/// # Example
///
/// ```no_run
/// use eixdb_format::EixDatabase;
///
/// let db = EixDatabase::open("/var/cache/eix/portage.eix")?;
/// for (category, package) in db.packages() {
///     println!("{}/{}: {}", category.name, package.name, package.description);
/// }
/// # Ok::<(), eixdb_format::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EixDatabase {
    pub(crate) header: Header,
    pub(crate) categories: Vec<Category>,
}

impl EixDatabase {
    /// Check if data starts with the cache magic.
    pub fn is_eix(data: &[u8]) -> bool {
        data.starts_with(Header::MAGIC)
    }

    /// Decode a cache held in memory.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::decode(&mut BinaryReader::new(data), &DecodeOptions::default())
    }

    /// Memory-map and decode a cache file.
    ///
    /// The mapping and file handle are released before returning, whether
    /// decoding succeeds or not.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &DecodeOptions::default())
    }

    /// [`open`](Self::open) with explicit options.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open_with<P: AsRef<Path>>(path: P, options: &DecodeOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        // SAFETY: the cache is treated as an immutable snapshot for the
        // duration of the session; the map does not outlive this call.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::decode(&mut BinaryReader::new(&mmap), options)
    }

    /// Decode from a seekable stream, such as a file that cannot be mapped.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::decode(
            &mut StreamReader::new(BufReader::new(reader)),
            &DecodeOptions::default(),
        )
    }

    /// Read only the header of a cache file.
    pub fn read_header<P: AsRef<Path>>(path: P) -> Result<Header> {
        let file = File::open(path.as_ref())?;
        Header::read(&mut StreamReader::new(BufReader::new(file)))
    }

    /// Run a decode session over `source`.
    #[instrument(level = "debug", skip_all, fields(packages))]
    pub fn decode<S: ByteSource + ?Sized>(source: &mut S, options: &DecodeOptions) -> Result<Self> {
        let header = Header::read(source)?;
        let categories = read_categories(source, &header, options)?;

        let db = Self { header, categories };
        tracing::Span::current().record("packages", db.package_count());
        tracing::debug!(
            categories = db.categories.len(),
            versions = db.version_count(),
            "Decoded cache"
        );
        Ok(db)
    }

    /// The decoded header and its tables.
    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// All categories in file order.
    #[inline]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Serialize the database to pretty-printed JSON.
    #[cfg(feature = "json")]
    pub fn to_json_string(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the database as JSON.
    #[cfg(feature = "json")]
    pub fn write_json<W: std::io::Write>(&self, writer: W) -> std::result::Result<(), serde_json::Error> {
        serde_json::to_writer_pretty(writer, self)
    }
}
