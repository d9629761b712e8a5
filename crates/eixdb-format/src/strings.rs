//! Strings, vectors, and hash tables.

use eixdb_common::ByteSource;

use crate::hash::{HashKind, HashTable};
use crate::varint::{read_len, read_number};
use crate::{Error, Result};

/// Upper bound on capacity reserved from a stored count, so a corrupt count
/// fails on truncation instead of on allocation.
pub(crate) const MAX_PREALLOC: usize = 4096;

/// Read a length-prefixed UTF-8 string.
pub fn read_string<S: ByteSource + ?Sized>(source: &mut S) -> Result<String> {
    let len = read_len(source)?;
    read_text(source, len)
}

/// Read exactly `len` bytes of UTF-8 text.
pub(crate) fn read_text<S: ByteSource + ?Sized>(source: &mut S, len: usize) -> Result<String> {
    let bytes = source.read_vec(len)?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidEncoding(e.utf8_error()))
}

/// Read a count-prefixed vector, calling `element` once per entry in file order.
pub fn read_vector<S, T, F>(source: &mut S, mut element: F) -> Result<Vec<T>>
where
    S: ByteSource + ?Sized,
    F: FnMut(&mut S) -> Result<T>,
{
    let count = read_len(source)?;
    let mut items = Vec::with_capacity(count.min(MAX_PREALLOC));
    for _ in 0..count {
        items.push(element(source)?);
    }
    Ok(items)
}

/// Read a hash table: a vector of strings.
pub fn read_hash<S: ByteSource + ?Sized>(source: &mut S, kind: HashKind) -> Result<HashTable> {
    let entries = read_vector(source, read_string)?;
    Ok(HashTable::new(kind, entries))
}

/// Read a vector of indices into `table` and join the entries with spaces.
pub fn read_hashed_words<S: ByteSource + ?Sized>(source: &mut S, table: &HashTable) -> Result<String> {
    let words = read_vector(source, |s| table.lookup(read_number(s)?))?;
    Ok(words.join(" "))
}
