//! Projection of a [`FileMap`] onto reference strings seen from one directory.

use crate::file_map::FileMap;
use crate::paths::{relative_to, to_slash};
use std::path::Path;

/// Old reference -> new reference, both relative to one anchor directory and
/// always `/`-separated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMap {
    links: Vec<(String, String)>,
}

impl LinkMap {
    /// Re-roots every rename in `file_map` at `anchor_dir`.
    ///
    /// A markdown file at `src/pages/a/doc.md` uses `src/pages/a` as its
    /// anchor, so `src/pages/b/Old.md` becomes `../b/Old.md`.
    pub fn project(file_map: &FileMap, anchor_dir: &Path) -> Self {
        file_map
            .iter()
            .map(|(from, to)| {
                (
                    to_slash(&relative_to(from, anchor_dir)),
                    to_slash(&relative_to(to, anchor_dir)),
                )
            })
            .collect()
    }

    pub fn get(&self, from: &str) -> Option<&str> {
        self.links
            .iter()
            .find(|(old, _)| old == from)
            .map(|(_, new)| new.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.links
            .iter()
            .map(|(from, to)| (from.as_str(), to.as_str()))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, S)> for LinkMap {
    fn from_iter<I: IntoIterator<Item = (S, S)>>(iter: I) -> Self {
        Self {
            links: iter
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        }
    }
}
