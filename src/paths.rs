//! Path helpers shared by the rename, link and redirect stages.
//!
//! All paths handled here are relative to the project root. Comparisons and
//! link strings always use `/` regardless of the host separator.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::path::{Component, Path, PathBuf};

/// Bytes escaped inside a URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Renders `path` with `/` separators, dropping `.` components.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Splits off the extension of the last segment, keeping the dot with it.
///
/// A leading dot in the file name (`.env`) is not an extension.
pub fn split_extension(path: &str) -> (&str, &str) {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => path.split_at(name_start + dot),
        _ => (path, ""),
    }
}

/// Computes `path` relative to `base`, both given relative to the same root.
///
/// `relative_to("src/pages/a/B.md", "src/pages/c")` is `../a/B.md`.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path_parts = parts(path);
    let base_parts = parts(base);

    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part);
    }
    relative
}

fn parts(path: &Path) -> Vec<String> {
    let slashed = to_slash(path);
    slashed
        .split('/')
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds the site URL of a document path.
///
/// Strips the extension, percent-encodes each segment and turns a trailing
/// `index` document into a trailing slash (`guides/index.md` -> `guides/`).
pub fn to_url(path: &str) -> String {
    let (stem, _) = split_extension(path);
    let url = stem
        .split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/");

    if url == "index" {
        String::new()
    } else if let Some(dir) = url.strip_suffix("/index") {
        format!("{dir}/")
    } else {
        url
    }
}

pub fn trim_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}
