//! Category, package, and version records.

use eixdb_common::ByteSource;
#[cfg(feature = "serde")]
use serde::Serialize;
use tracing::instrument;

use crate::hash::HashRef;
use crate::header::{Header, Overlay, OverlayRef};
use crate::strings::{read_hashed_words, read_string, read_vector, MAX_PREALLOC};
use crate::varint::read_number;
use crate::version_part::VersionPart;
use crate::{DecodeOptions, Error, Result};

/// Position of a category in the decoded category list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CategoryId(usize);

impl CategoryId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A category and the packages filed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Category {
    pub name: String,
    pub packages: Vec<Package>,
}

/// A package with all of its versions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Package {
    /// The category this package is filed under.
    pub category: CategoryId,
    pub name: String,
    pub description: String,
    pub homepage: String,
    pub license: HashRef,
    pub versions: Vec<Version>,
}

impl Package {
    /// Read one package record.
    ///
    /// Each record starts with the byte length of the rest of the record.
    /// Decoding must end exactly there; anything else means the file is
    /// corrupt or was written with a different schema.
    pub fn read<S: ByteSource + ?Sized>(
        source: &mut S,
        category: CategoryId,
        category_name: &str,
        header: &Header,
    ) -> Result<Self> {
        let offset_to_next = read_number(source)?;
        let start = source.position();

        let name = read_string(source)?;
        let description = read_string(source)?;
        let homepage = read_string(source)?;
        let license = header.licenses.reference(read_number(source)?)?;
        let versions = read_vector(source, |s| Version::read(s, header))?;

        let expected = start.saturating_add(offset_to_next);
        let actual = source.position();
        if actual != expected {
            return Err(Error::StructuralCorruption {
                package: format!("{category_name}/{name}"),
                expected,
                actual,
            });
        }

        tracing::trace!(
            category = category_name,
            package = %name,
            versions = versions.len(),
            "Decoded package"
        );

        Ok(Self {
            category,
            name,
            description,
            homepage,
            license,
            versions,
        })
    }

    /// License text, resolved against `header`.
    pub fn license<'h>(&self, header: &'h Header) -> Option<&'h str> {
        header.resolve(self.license)
    }
}

/// Dependency strings of a version, present when the cache stores them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Dependencies {
    pub depend: String,
    pub rdepend: String,
    pub pdepend: String,
    pub hdepend: String,
}

/// One available version of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Version {
    pub eapi: HashRef,
    /// Keyword/mask flags.
    pub mask: u64,
    /// PROPERTIES flags.
    pub properties: u64,
    /// RESTRICT flags.
    pub restrict: u64,
    /// Space-separated keywords.
    pub keywords: String,
    pub parts: Vec<VersionPart>,
    pub slot: HashRef,
    pub overlay: OverlayRef,
    /// Space-separated USE flags.
    pub use_flags: String,
    pub required_use: String,
    /// `None` when the header says dependencies are not stored.
    pub dependencies: Option<Dependencies>,
}

impl Version {
    /// Read one version record.
    pub fn read<S: ByteSource + ?Sized>(source: &mut S, header: &Header) -> Result<Self> {
        let eapi = header.eapi.reference(read_number(source)?)?;
        let mask = read_number(source)?;
        let properties = read_number(source)?;
        let restrict = read_number(source)?;
        let keywords = read_hashed_words(source, &header.keywords)?;
        let parts = read_vector(source, VersionPart::read)?;
        let slot = header.slots.reference(read_number(source)?)?;
        let overlay = header.overlay_ref(read_number(source)?)?;
        let use_flags = read_hashed_words(source, &header.use_flags)?;
        let required_use = read_hashed_words(source, &header.use_flags)?;

        let dependencies = if header.dependencies_stored {
            // Combined length of the four strings; only needed to skip them.
            let _stored_len = read_number(source)?;
            Some(Dependencies {
                depend: read_hashed_words(source, &header.depend)?,
                rdepend: read_hashed_words(source, &header.depend)?,
                pdepend: read_hashed_words(source, &header.depend)?,
                hdepend: read_hashed_words(source, &header.depend)?,
            })
        } else {
            None
        };

        Ok(Self {
            eapi,
            mask,
            properties,
            restrict,
            keywords,
            parts,
            slot,
            overlay,
            use_flags,
            required_use,
            dependencies,
        })
    }

    /// EAPI text, resolved against `header`.
    pub fn eapi<'h>(&self, header: &'h Header) -> Option<&'h str> {
        header.resolve(self.eapi)
    }

    /// Slot name, with the empty slot reported as `"0"`.
    pub fn slot_name<'h>(&self, header: &'h Header) -> Option<&'h str> {
        header.slot_name(self.slot)
    }

    /// The overlay this version comes from.
    pub fn overlay<'h>(&self, header: &'h Header) -> Option<&'h Overlay> {
        header.overlay(self.overlay)
    }
}

/// Read every category record that follows the header.
#[instrument(level = "debug", skip_all, fields(categories = header.no_categories))]
pub fn read_categories<S: ByteSource + ?Sized>(
    source: &mut S,
    header: &Header,
    options: &DecodeOptions,
) -> Result<Vec<Category>> {
    let count = usize::try_from(header.no_categories).unwrap_or(usize::MAX);
    let mut categories = Vec::with_capacity(count.min(MAX_PREALLOC));

    for index in 0..count {
        options.check_cancelled()?;

        let id = CategoryId(index);
        let name = read_string(source)?;
        let packages = read_vector(source, |s| {
            options.check_cancelled()?;
            Package::read(s, id, &name, header)
        })?;

        tracing::trace!(category = %name, packages = packages.len(), "Decoded category");
        categories.push(Category { name, packages });
    }

    Ok(categories)
}

#[cfg(test)]
mod tests {
    use eixdb_common::BinaryReader;

    use super::*;
    use crate::test_util::{self, CacheBuilder, DEPS};

    fn header(flags: u64) -> Header {
        let data = test_util::header(1, flags).build();
        Header::read(&mut BinaryReader::new(&data)).unwrap()
    }

    #[test]
    fn test_read_version_with_dependencies() {
        let header = header(DEPS);
        let data = test_util::version(2, 1, &[(10, "3"), (9, "12")], true).build();
        let mut reader = BinaryReader::new(&data);
        let version = Version::read(&mut reader, &header).unwrap();

        assert!(reader.is_empty());
        assert_eq!(version.eapi(&header), Some("8"));
        assert_eq!(version.mask, 0x02);
        assert_eq!(version.properties, 0);
        assert_eq!(version.restrict, 0x10);
        assert_eq!(version.keywords, "amd64 x86");
        assert_eq!(version.parts.len(), 2);
        assert_eq!(version.parts[1].kind, 9);
        assert_eq!(version.parts[1].text, "12");
        assert_eq!(version.slot_name(&header), Some("3.12"));
        assert_eq!(version.overlay(&header).unwrap().path, "/var/db/repos/guru");
        assert_eq!(version.use_flags, "ssl");
        assert_eq!(version.required_use, "doc test");

        let deps = version.dependencies.unwrap();
        assert_eq!(deps.depend, "dev-libs/openssl sys-libs/zlib");
        assert_eq!(deps.rdepend, "dev-libs/openssl");
        assert_eq!(deps.pdepend, "");
        assert_eq!(deps.hdepend, ">=dev-lang/perl-5");
    }

    #[test]
    fn test_read_version_without_dependencies() {
        let header = header(0);
        // Trailing byte must be left unread.
        let data = test_util::version(0, 0, &[(10, "1")], false).raw(&[0xEE]).build();
        let mut reader = BinaryReader::new(&data);
        let version = Version::read(&mut reader, &header).unwrap();

        assert_eq!(version.dependencies, None);
        assert_eq!(version.slot_name(&header), Some("0"));
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn test_read_version_bad_slot() {
        let header = header(0);
        let data = test_util::version(3, 0, &[], false).build();

        assert!(matches!(
            Version::read(&mut BinaryReader::new(&data), &header),
            Err(Error::IndexOutOfRange { table: "slot", index: 3, .. })
        ));
    }

    #[test]
    fn test_read_version_bad_overlay() {
        let header = header(0);
        let data = test_util::version(0, 7, &[], false).build();

        assert!(matches!(
            Version::read(&mut BinaryReader::new(&data), &header),
            Err(Error::IndexOutOfRange { table: "overlay", index: 7, len: 2 })
        ));
    }

    #[test]
    fn test_read_package() {
        let header = header(DEPS);
        let data = test_util::package(
            "openssl",
            0,
            vec![
                test_util::version(1, 0, &[(10, "3")], true),
                test_util::version(1, 1, &[(10, "3"), (9, "1")], true),
            ],
        )
        .build();
        let mut reader = BinaryReader::new(&data);
        let package = Package::read(&mut reader, CategoryId(4), "dev-libs", &header).unwrap();

        assert!(reader.is_empty());
        assert_eq!(package.category.index(), 4);
        assert_eq!(package.name, "openssl");
        assert_eq!(package.description, "The openssl package");
        assert_eq!(package.homepage, "https://example.org/openssl");
        assert_eq!(package.license(&header), Some("GPL-2"));
        assert_eq!(package.versions.len(), 2);
    }

    #[test]
    fn test_read_package_ends_at_offset() {
        let header = header(0);
        let data = test_util::package("zlib", 1, vec![test_util::version(1, 0, &[], false)])
            .append(test_util::package("bzip2", 1, vec![]))
            .build();
        let mut reader = BinaryReader::new(&data);

        let first = Package::read(&mut reader, CategoryId(0), "sys-libs", &header).unwrap();
        let second = Package::read(&mut reader, CategoryId(0), "sys-libs", &header).unwrap();
        assert_eq!(first.name, "zlib");
        assert_eq!(second.name, "bzip2");
        assert!(second.versions.is_empty());
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_package_corrupt_offset() {
        let header = header(0);
        let body = CacheBuilder::new()
            .string("zlib")
            .string("")
            .string("")
            .number(0)
            .number(0);
        let body_len = body.len() as u64;

        for offset in [body_len - 1, body_len + 1, 0] {
            let data = CacheBuilder::new().number(offset).append(body.clone()).build();
            match Package::read(&mut BinaryReader::new(&data), CategoryId(0), "sys-libs", &header) {
                Err(Error::StructuralCorruption { package, expected, actual }) => {
                    assert_eq!(package, "sys-libs/zlib");
                    assert_eq!(expected, 1 + offset);
                    assert_eq!(actual, 1 + body_len);
                }
                other => panic!("offset {offset}: expected StructuralCorruption, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_read_package_bad_license() {
        let header = header(0);
        let data = test_util::package("zlib", 9, vec![]).build();

        assert!(matches!(
            Package::read(&mut BinaryReader::new(&data), CategoryId(0), "sys-libs", &header),
            Err(Error::IndexOutOfRange { table: "license", index: 9, len: 3 })
        ));
    }

    #[test]
    fn test_read_categories_zero() {
        let data = test_util::header(0, 0).raw(&[0xAA]).build();
        let mut reader = BinaryReader::new(&data);
        let header = Header::read(&mut reader).unwrap();

        // Nothing after the header is touched.
        let categories = read_categories(&mut reader, &header, &DecodeOptions::default()).unwrap();
        assert!(categories.is_empty());
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn test_read_categories() {
        let data = test_util::header(2, 0)
            .string("app-misc")
            .number(0)
            .string("sys-libs")
            .number(2)
            .append(test_util::package("zlib", 1, vec![test_util::version(1, 0, &[], false)]))
            .append(test_util::package("ncurses", 2, vec![]))
            .build();
        let mut reader = BinaryReader::new(&data);
        let header = Header::read(&mut reader).unwrap();
        let categories = read_categories(&mut reader, &header, &DecodeOptions::default()).unwrap();

        assert!(reader.is_empty());
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "app-misc");
        assert!(categories[0].packages.is_empty());
        assert_eq!(categories[1].name, "sys-libs");
        let names: Vec<_> = categories[1].packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["zlib", "ncurses"]);
        assert!(categories[1].packages.iter().all(|p| p.category.index() == 1));
    }

    #[test]
    fn test_read_categories_truncated() {
        let data = test_util::header(2, 0).string("app-misc").number(0).build();
        let mut reader = BinaryReader::new(&data);
        let header = Header::read(&mut reader).unwrap();

        assert!(matches!(
            read_categories(&mut reader, &header, &DecodeOptions::default()),
            Err(Error::TruncatedInput { .. })
        ));
    }
}
