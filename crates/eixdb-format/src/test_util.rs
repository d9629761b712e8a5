//! Fixture builders for decoder tests.
//!
//! The library never writes caches; this minimal encoder exists only so tests
//! can describe inputs field by field instead of as opaque byte strings.

/// Encode a number the way the cache format stores it.
pub fn encode_number(value: u64) -> Vec<u8> {
    let be = value.to_be_bytes();
    let first = be.iter().position(|&b| b != 0).unwrap_or(be.len() - 1);
    let significant = &be[first..];

    let mut out = Vec::with_capacity(significant.len() * 2);
    if significant[0] == 0xFF {
        out.resize(significant.len(), 0xFF);
        out.push(0x00);
        out.extend_from_slice(&significant[1..]);
    } else {
        out.resize(significant.len() - 1, 0xFF);
        out.extend_from_slice(significant);
    }
    out
}

/// Appends cache fields to a byte buffer.
#[derive(Debug, Default, Clone)]
pub struct CacheBuilder {
    buf: Vec<u8>,
}

impl CacheBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn number(self, value: u64) -> Self {
        self.raw(&encode_number(value))
    }

    pub fn string(self, text: &str) -> Self {
        self.number(text.len() as u64).raw(text.as_bytes())
    }

    pub fn hash(self, entries: &[&str]) -> Self {
        entries
            .iter()
            .fold(self.number(entries.len() as u64), |b, e| b.string(e))
    }

    pub fn words(self, indices: &[u64]) -> Self {
        indices
            .iter()
            .fold(self.number(indices.len() as u64), |b, &i| b.number(i))
    }

    pub fn part(self, kind: u8, text: &str) -> Self {
        self.number(((text.len() as u64) << 5) | u64::from(kind))
            .raw(text.as_bytes())
    }

    /// Append `body` preceded by its byte length.
    pub fn sized(self, body: CacheBuilder) -> Self {
        self.number(body.len() as u64).raw(&body.buf)
    }

    pub fn append(self, other: CacheBuilder) -> Self {
        self.raw(&other.buf)
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

pub const OVERLAYS: &[(&str, &str)] = &[("/var/db/repos/gentoo", "gentoo"), ("/var/db/repos/guru", "guru")];
pub const EAPI: &[&str] = &["8", "7"];
pub const LICENSES: &[&str] = &["GPL-2", "MIT", "Apache-2.0"];
pub const KEYWORDS: &[&str] = &["amd64", "~amd64", "x86"];
pub const USE_FLAGS: &[&str] = &["ssl", "doc", "test"];
pub const SLOTS: &[&str] = &["", "0", "3.12"];
pub const WORLD_SETS: &[&str] = &["system"];
pub const DEPEND: &[&str] = &["dev-libs/openssl", "sys-libs/zlib", ">=dev-lang/perl-5"];

/// Flag bit for stored dependencies.
pub const DEPS: u64 = 0x01;
/// Flag bit for stored REQUIRED_USE.
pub const REQUIRED_USE: u64 = 0x02;

/// A header using the fixture tables above.
pub fn header(no_categories: u64, flags: u64) -> CacheBuilder {
    let overlays = OVERLAYS
        .iter()
        .fold(CacheBuilder::new().number(OVERLAYS.len() as u64), |b, (path, label)| {
            b.string(path).string(label)
        });

    CacheBuilder::new()
        .raw(b"eix\n")
        .number(39)
        .number(no_categories)
        .append(overlays)
        .hash(EAPI)
        .hash(LICENSES)
        .hash(KEYWORDS)
        .hash(USE_FLAGS)
        .hash(SLOTS)
        .hash(WORLD_SETS)
        .number(flags)
        .sized(CacheBuilder::new().hash(DEPEND))
}

/// A version record: EAPI 8, keywords `amd64 x86`, USE `ssl`.
pub fn version(slot: u64, overlay: u64, parts: &[(u8, &str)], deps: bool) -> CacheBuilder {
    let parts = parts
        .iter()
        .fold(CacheBuilder::new().number(parts.len() as u64), |b, (kind, text)| b.part(*kind, text));

    let version = CacheBuilder::new()
        .number(0)
        .number(0x02)
        .number(0)
        .number(0x10)
        .words(&[0, 2])
        .append(parts)
        .number(slot)
        .number(overlay)
        .words(&[0])
        .words(&[1, 2]);

    if deps {
        version.sized(
            CacheBuilder::new()
                .words(&[0, 1])
                .words(&[0])
                .words(&[])
                .words(&[2]),
        )
    } else {
        version
    }
}

/// A package record with its leading offset.
pub fn package(name: &str, license: u64, versions: Vec<CacheBuilder>) -> CacheBuilder {
    let count = versions.len() as u64;
    let body = versions.into_iter().fold(
        CacheBuilder::new()
            .string(name)
            .string(&format!("The {name} package"))
            .string(&format!("https://example.org/{name}"))
            .number(license)
            .number(count),
        CacheBuilder::append,
    );
    CacheBuilder::new().sized(body)
}
