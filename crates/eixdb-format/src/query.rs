//! Read-only lookups over a decoded database.

use eixdb_common::memchr::memmem;

use crate::database::EixDatabase;
use crate::record::{Category, Package};

impl EixDatabase {
    /// Iterate over every package together with its category, in file order.
    pub fn packages(&self) -> impl Iterator<Item = (&Category, &Package)> + '_ {
        self.categories
            .iter()
            .flat_map(|c| c.packages.iter().map(move |p| (c, p)))
    }

    /// Total number of packages.
    pub fn package_count(&self) -> usize {
        self.categories.iter().map(|c| c.packages.len()).sum()
    }

    /// Total number of versions across all packages.
    pub fn version_count(&self) -> usize {
        self.packages().map(|(_, p)| p.versions.len()).sum()
    }

    /// Find a category by name.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// The category a package is filed under.
    pub fn category_of(&self, package: &Package) -> Option<&Category> {
        self.categories.get(package.category.index())
    }

    /// Find a package by `category/name`.
    pub fn find(&self, atom: &str) -> Option<&Package> {
        let (category, name) = atom.split_once('/')?;
        self.category(category)?
            .packages
            .iter()
            .find(|p| p.name == name)
    }

    /// Packages whose name or description contains `pattern`, ignoring case.
    pub fn search<'a>(&'a self, pattern: &str) -> impl Iterator<Item = (&'a Category, &'a Package)> + 'a {
        let needle = pattern.to_lowercase();
        let finder = memmem::Finder::new(needle.as_bytes()).into_owned();

        self.packages().filter(move |(_, p)| {
            finder.find(p.name.to_lowercase().as_bytes()).is_some()
                || finder.find(p.description.to_lowercase().as_bytes()).is_some()
        })
    }
}
