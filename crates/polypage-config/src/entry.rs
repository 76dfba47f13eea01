//! Build entry data model.
//!
//! Entries are the named starting points of the dependency graph. A value is
//! either a single path or a sequence of paths; in the sequence form only the
//! last path is the entry proper, earlier ones are preload-only. The
//! string-or-array shape is resolved once here at the boundary and never
//! re-inspected downstream.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Source file(s) backing one named entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntrySpec {
    /// Single entry file.
    Single(PathBuf),

    /// Preload files followed by the entry file (last element).
    Sequence(Vec<PathBuf>),
}

impl EntrySpec {
    /// The path that identifies the entry: the path itself, or the last
    /// element of a sequence. `None` only for an (invalid) empty sequence.
    pub fn candidate(&self) -> Option<&Path> {
        match self {
            EntrySpec::Single(path) => Some(path),
            EntrySpec::Sequence(paths) => paths.last().map(PathBuf::as_path),
        }
    }

    /// All paths in declaration order.
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            EntrySpec::Single(path) => std::slice::from_ref(path),
            EntrySpec::Sequence(paths) => paths,
        }
    }
}

impl From<&str> for EntrySpec {
    fn from(path: &str) -> Self {
        EntrySpec::Single(PathBuf::from(path))
    }
}

impl From<PathBuf> for EntrySpec {
    fn from(path: PathBuf) -> Self {
        EntrySpec::Single(path)
    }
}

/// Ordered mapping from entry name to its source file(s).
///
/// Insertion order is preserved; it drives the order of generated page
/// artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryMap(IndexMap<String, EntrySpec>);

impl EntryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: impl Into<EntrySpec>) {
        self.0.insert(name.into(), spec.into());
    }

    pub fn get(&self, name: &str) -> Option<&EntrySpec> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &EntrySpec)> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl FromIterator<(String, EntrySpec)> for EntryMap {
    fn from_iter<I: IntoIterator<Item = (String, EntrySpec)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a EntryMap {
    type Item = (&'a String, &'a EntrySpec);
    type IntoIter = indexmap::map::Iter<'a, String, EntrySpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
