//! Content file discovery.
//!
//! Recursively walks the pages directory, skipping entries whose names start
//! with `.` and entries matching any exclusion glob. Returned paths are
//! relative to the project root and sorted.

use crate::config::Config;
use crate::error::{RenameError, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions of files published from the pages directory.
pub const DEPLOYABLE_EXTENSIONS: &[&str] = &["md", "json"];

/// Collects every file under `dir` (relative to `root`) with one of `extensions`.
pub fn collect_files(
    root: &Path,
    dir: &Path,
    extensions: &[&str],
    excludes: &[Pattern],
) -> Result<Vec<PathBuf>> {
    let walk_root = root.join(dir);
    if !walk_root.is_dir() {
        return Err(RenameError::config(format!(
            "The pages directory `{}` does not exist.\n\nTo fix this, run from the site root or pass --root / --pages-dir.",
            walk_root.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&walk_root)
        .into_iter()
        .filter_entry(|e| !is_hidden(e) && !is_excluded(e, root, excludes))
    {
        let entry = entry.map_err(|err| {
            RenameError::config(format!(
                "Failed to list files under `{}`: {err}",
                walk_root.display()
            ))
        })?;
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_path_buf();
            files.push(relative);
        }
    }

    files.sort();
    Ok(files)
}

/// Every `.md` and `.json` file under the configured pages directory.
pub fn deployable_files(config: &Config) -> Result<Vec<PathBuf>> {
    collect_files(
        &config.root,
        &config.pages_dir,
        DEPLOYABLE_EXTENSIONS,
        &config.excludes,
    )
}

pub fn is_markdown(path: &Path) -> bool {
    has_extension(path, &["md"])
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|s| s.starts_with('.'))
}

fn is_excluded(entry: &walkdir::DirEntry, root: &Path, excludes: &[Pattern]) -> bool {
    if excludes.is_empty() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
    excludes
        .iter()
        .any(|pattern| pattern.matches(&name) || pattern.matches_path(relative))
}
