//! Physical renames.
//!
//! Runs three strictly ordered passes: create every destination directory,
//! rename every file, then prune source directories left empty, walking
//! upward until the project root. A failure midway is fatal and not rolled
//! back, so [`FileMover::preflight`] checks everything it can beforehand.

use crate::error::{IoContext, RenameError, Result};
use crate::file_map::FileMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileMover {
    root: PathBuf,
}

impl FileMover {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Verifies that every source exists and no destination is occupied by a
    /// file that stays where it is.
    ///
    /// A case-only rename is allowed to "find" its own source at the
    /// destination on case-insensitive filesystems.
    pub fn preflight(&self, file_map: &FileMap) -> Result<()> {
        for (from, to) in file_map.iter() {
            let source = self.root.join(from);
            if !source.is_file() {
                return Err(RenameError::io(
                    &source,
                    std::io::Error::from(ErrorKind::NotFound),
                ));
            }

            let target = self.root.join(to);
            let case_only =
                from.to_string_lossy().to_lowercase() == to.to_string_lossy().to_lowercase();
            let vacated = file_map.get(to).is_some();
            if target.exists() && !case_only && !vacated {
                return Err(RenameError::conflict(format!(
                    "renaming `{}` would overwrite existing `{}`",
                    from.display(),
                    to.display()
                )));
            }
        }
        Ok(())
    }

    /// Performs every rename in `file_map`.
    pub fn apply(&self, file_map: &FileMap) -> Result<()> {
        for (_, to) in file_map.iter() {
            if let Some(dir) = self.root.join(to).parent() {
                std::fs::create_dir_all(dir).at(dir)?;
            }
        }

        for (from, to) in file_map.iter() {
            let source = self.root.join(from);
            std::fs::rename(&source, self.root.join(to)).at(&source)?;
        }

        for (from, _) in file_map.iter() {
            if let Some(dir) = self.root.join(from).parent() {
                prune_empty_dirs(dir, &self.root)?;
            }
        }

        Ok(())
    }
}

/// Removes `start` and its ancestors while they are empty, never touching `stop`.
fn prune_empty_dirs(start: &Path, stop: &Path) -> Result<()> {
    let mut dir = start;
    while dir != stop && dir.starts_with(stop) && dir.is_dir() {
        let mut entries = std::fs::read_dir(dir).at(dir)?;
        if entries.next().is_some() {
            break;
        }
        std::fs::remove_dir(dir).at(dir)?;
        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }
    Ok(())
}
