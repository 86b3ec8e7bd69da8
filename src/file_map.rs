//! Canonical renaming of content files.
//!
//! Every directory and file-stem segment is passed through
//! [`case::normalize`](crate::case::normalize); the extension is kept
//! verbatim. Only files whose path actually changes end up in the map.

use crate::case;
use crate::error::{RenameError, Result};
use crate::paths::{split_extension, to_slash};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Original path -> canonical path, for non-identity renames only.
///
/// Paths are relative to the project root. Iteration is ordered by source
/// path so every run over the same tree produces the same output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMap {
    entries: BTreeMap<PathBuf, PathBuf>,
}

impl FileMap {
    /// Builds the rename map for `files`.
    ///
    /// Fails with a conflict when two sources normalize to the same
    /// destination, or when a destination is already taken by a file that is
    /// not being renamed.
    pub fn build<P: AsRef<Path>>(files: &[P]) -> Result<Self> {
        let mut entries = BTreeMap::new();
        let mut claimed: BTreeMap<String, PathBuf> = BTreeMap::new();
        let mut unchanged = BTreeSet::new();

        for file in files {
            let from = file.as_ref();
            let from_slash = to_slash(from);
            let to = canonical_path(&from_slash);

            if to == from_slash {
                unchanged.insert(from_slash);
                continue;
            }

            if let Some(other) = claimed.get(&to) {
                return Err(RenameError::conflict(format!(
                    "`{}` and `{}` both rename to `{}`",
                    other.display(),
                    from.display(),
                    to
                )));
            }
            claimed.insert(to.clone(), from.to_path_buf());
            entries.insert(from.to_path_buf(), PathBuf::from(to));
        }

        for (to, from) in &claimed {
            if unchanged.contains(to) {
                return Err(RenameError::conflict(format!(
                    "renaming `{}` would overwrite existing `{}`",
                    from.display(),
                    to
                )));
            }
        }

        Ok(Self { entries })
    }

    pub fn get(&self, from: &Path) -> Option<&Path> {
        self.entries.get(from).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.entries
            .iter()
            .map(|(from, to)| (from.as_path(), to.as_path()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalizes every segment of a `/`-separated path except the extension.
pub fn canonical_path(path: &str) -> String {
    let (stem, ext) = split_extension(path);
    let stem = stem
        .split('/')
        .map(case::normalize)
        .collect::<Vec<_>>()
        .join("/");
    format!("{stem}{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(files: &[&str]) -> Result<FileMap> {
        FileMap::build(files)
    }

    #[test]
    fn renames_non_canonical_file() {
        let map = build(&["src/pages/MyPage.md"]).unwrap();
        assert_eq!(
            map.get(Path::new("src/pages/MyPage.md")),
            Some(Path::new("src/pages/my-page.md"))
        );
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn identity_renames_are_not_stored() {
        let map = build(&["src/pages/index.md", "src/pages/guides/setup.json"]).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn directories_are_normalized_and_extension_kept() {
        let map = build(&["src/pages/GettingStarted/API_Reference.JSON"]).unwrap();
        assert_eq!(
            map.get(Path::new("src/pages/GettingStarted/API_Reference.JSON")),
            Some(Path::new("src/pages/getting-started/api-reference.JSON"))
        );
    }

    #[test]
    fn colliding_sources_are_a_conflict() {
        let err = build(&["src/pages/MyPage.md", "src/pages/my_page.md"]).unwrap_err();
        assert!(matches!(err, RenameError::Conflict { .. }));
        assert!(err.to_string().contains("both rename to `src/pages/my-page.md`"));
    }

    #[test]
    fn overwriting_an_existing_file_is_a_conflict() {
        let err = build(&["src/pages/my-page.md", "src/pages/MyPage.md"]).unwrap_err();
        assert!(err.to_string().contains("would overwrite existing"));
    }

    #[test]
    fn rebuilding_over_renamed_files_is_empty() {
        let files = [
            "src/pages/MyPage.md",
            "src/pages/Guides/HTMLParser.md",
            "src/pages/README.md",
            "src/pages/guides/index.md",
        ];
        let map = build(&files).unwrap();
        let renamed: Vec<PathBuf> = files
            .iter()
            .map(|f| {
                map.get(Path::new(f))
                    .map_or_else(|| PathBuf::from(f), Path::to_path_buf)
            })
            .collect();
        assert!(FileMap::build(&renamed).unwrap().is_empty());
    }
}
