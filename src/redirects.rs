//! Redirect table storage and migration.
//!
//! The table lives in a JSON "sheet" envelope:
//!
//! ```json
//! { "total": 2, "offset": 0, "limit": 2, "data": [{ "Source": "...", "Destination": "..." }], ":type": "sheet" }
//! ```
//!
//! Migration never drops a rule. Every existing Source and Destination is
//! tested against four URL shapes per renamed file; matches are retargeted
//! or duplicated under the new URL, and one direct old -> new rule is
//! appended per rename. Because the table is first-match-wins, new rules are
//! only ever appended.

use crate::error::{IoContext, RenameError, Result};
use crate::file_map::FileMap;
use crate::link_map::LinkMap;
use crate::paths::{to_url, trim_trailing_slash};
use crate::rewriter::{RewritePattern, escape_template};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectEntry {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Destination")]
    pub destination: String,
}

impl RedirectEntry {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Sheet {
    #[serde(default)]
    total: usize,
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    limit: usize,
    data: Vec<RedirectEntry>,
    #[serde(rename = ":type", default = "sheet_type")]
    kind: String,
}

fn sheet_type() -> String {
    "sheet".to_string()
}

/// Reads the `data` rows of a redirects file.
pub fn read(path: &Path) -> Result<Vec<RedirectEntry>> {
    let contents = std::fs::read_to_string(path).at(path)?;
    let sheet: Sheet = serde_json::from_str(&contents).map_err(|source| RenameError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(sheet.data)
}

/// Serializes `entries` into a fresh envelope with recomputed counts.
pub fn to_json(entries: &[RedirectEntry]) -> serde_json::Result<String> {
    let sheet = Sheet {
        total: entries.len(),
        offset: 0,
        limit: entries.len(),
        data: entries.to_vec(),
        kind: sheet_type(),
    };
    serde_json::to_string(&sheet)
}

/// Replaces the redirects file in one step via a temp file in the same directory.
pub fn write(path: &Path, entries: &[RedirectEntry]) -> Result<()> {
    let json = to_json(entries).map_err(|source| RenameError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).at(dir)?;
    if let Ok(existing) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .at(tmp.path())?;
    }
    tmp.write_all(json.as_bytes()).at(tmp.path())?;
    tmp.persist(path).map_err(|err| RenameError::io(path, err.error))?;
    Ok(())
}

/// The URL shapes a renamed document may appear under in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectVariant {
    /// The document URL as built from its path.
    Exact,
    /// Directory URL written without its trailing slash.
    MissingTrailingSlash,
    /// Directory URL spelled with a literal `/index`.
    IndexSuffix,
    /// Document URL with an extra trailing slash.
    ExtraTrailingSlash,
}

impl RedirectVariant {
    pub const ALL: [Self; 4] = [
        Self::Exact,
        Self::MissingTrailingSlash,
        Self::IndexSuffix,
        Self::ExtraTrailingSlash,
    ];

    /// URL of `path` in this shape, without the path prefix.
    pub fn url(self, path: &str) -> String {
        let url = to_url(path);
        match self {
            Self::Exact => url,
            Self::MissingTrailingSlash => trim_trailing_slash(&url).to_string(),
            Self::IndexSuffix => format!("{}/index", trim_trailing_slash(&url)),
            Self::ExtraTrailingSlash => format!("{url}/"),
        }
    }

    /// Whether this shape is distinct from [`Exact`](Self::Exact) for `path`.
    fn applies_to(self, path: &str) -> bool {
        self != Self::MissingTrailingSlash || to_url(path).ends_with('/')
    }
}

/// Whole-URL match of one variant, with an optional trailing `#fragment`.
#[derive(Debug, Clone, Copy)]
pub struct RedirectPattern<'a> {
    pub variant: RedirectVariant,
    pub path_prefix: &'a str,
}

impl RewritePattern for RedirectPattern<'_> {
    fn find_pattern(&self, from: &str) -> String {
        let url = format!("{}{}", self.path_prefix, self.variant.url(from));
        format!("^({})(#.*)?$", regex::escape(&url))
    }

    fn replace_pattern(&self, to: &str) -> String {
        let url = format!("{}{}", self.path_prefix, self.variant.url(to));
        format!("{}${{2}}", escape_template(&url))
    }
}

#[derive(Debug)]
struct Matcher {
    from: String,
    find: Regex,
    template: String,
}

/// Migrates a redirect table across one set of renames.
#[derive(Debug)]
pub struct RedirectMigrator {
    path_prefix: String,
    links: LinkMap,
    matchers: Vec<Matcher>,
}

impl RedirectMigrator {
    /// Prepares matchers for `file_map`, with document URLs computed relative
    /// to `redirects_dir`.
    pub fn new(file_map: &FileMap, redirects_dir: &Path, path_prefix: &str) -> Result<Self> {
        let links = LinkMap::project(file_map, redirects_dir);
        let mut matchers = Vec::new();

        for variant in RedirectVariant::ALL {
            let pattern = RedirectPattern {
                variant,
                path_prefix,
            };
            for (from, to) in links.iter() {
                if !variant.applies_to(from) {
                    continue;
                }
                matchers.push(Matcher {
                    from: from.to_string(),
                    find: Regex::new(&pattern.find_pattern(from))?,
                    template: pattern.replace_pattern(to),
                });
            }
        }

        Ok(Self {
            path_prefix: path_prefix.to_string(),
            links,
            matchers,
        })
    }

    /// Returns the renamed form of `url`, or `None` when no rename touches it.
    ///
    /// Several matches are fine as long as they agree on the result;
    /// disagreeing matches are a conflict.
    pub fn renamed_url(&self, url: &str) -> Result<Option<String>> {
        let mut found: Option<(&str, String)> = None;

        for matcher in &self.matchers {
            if !matcher.find.is_match(url) {
                continue;
            }
            let renamed = matcher
                .find
                .replace(url, matcher.template.as_str())
                .into_owned();

            if let Some((from, previous)) = &found {
                if *previous != renamed {
                    return Err(RenameError::conflict(format!(
                        "redirect URL `{url}` matches both `{from}` and `{}`",
                        matcher.from
                    )));
                }
                continue;
            }
            found = Some((matcher.from.as_str(), renamed));
        }

        Ok(found.map(|(_, renamed)| renamed))
    }

    /// Produces the migrated table.
    ///
    /// | Source renamed | Destination renamed | Result                                  |
    /// |----------------|---------------------|-----------------------------------------|
    /// | no             | no                  | entry unchanged                         |
    /// | no             | yes                 | Destination retargeted in place         |
    /// | yes            | no                  | entry kept, new Source appended         |
    /// | yes            | yes                 | entry retargeted, new Source appended   |
    ///
    /// Entries for renamed Sources go after every existing rule so they never
    /// shadow one, followed by a direct rule from every old URL to its new URL.
    pub fn migrate(&self, entries: &[RedirectEntry]) -> Result<Vec<RedirectEntry>> {
        let mut migrated = Vec::with_capacity(entries.len() + self.links.len());
        let mut derived = Vec::new();

        for entry in entries {
            let source = self.renamed_url(&entry.source)?;
            let destination = self
                .renamed_url(&entry.destination)?
                .unwrap_or_else(|| entry.destination.clone());

            migrated.push(RedirectEntry::new(entry.source.clone(), destination.clone()));
            if let Some(source) = source {
                derived.push(RedirectEntry::new(source, destination));
            }
        }

        migrated.append(&mut derived);
        for (from, to) in self.links.iter() {
            migrated.push(RedirectEntry::new(
                format!("{}{}", self.path_prefix, to_url(from)),
                format!("{}{}", self.path_prefix, to_url(to)),
            ));
        }

        Ok(migrated)
    }
}

/// Convenience wrapper around [`RedirectMigrator`].
pub fn migrate(
    entries: &[RedirectEntry],
    file_map: &FileMap,
    redirects_dir: &Path,
    path_prefix: &str,
) -> Result<Vec<RedirectEntry>> {
    RedirectMigrator::new(file_map, redirects_dir, path_prefix)?.migrate(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PREFIX: &str = "/docs/";

    fn pages_map(files: &[&str]) -> FileMap {
        let files: Vec<String> = files.iter().map(|f| format!("src/pages/{f}")).collect();
        FileMap::build(&files).unwrap()
    }

    fn run(entries: &[(&str, &str)], files: &[&str]) -> Result<Vec<RedirectEntry>> {
        let entries: Vec<_> = entries
            .iter()
            .map(|(s, d)| RedirectEntry::new(*s, *d))
            .collect();
        migrate(&entries, &pages_map(files), Path::new("src/pages"), PREFIX)
    }

    fn pairs(entries: &[RedirectEntry]) -> Vec<(&str, &str)> {
        entries
            .iter()
            .map(|e| (e.source.as_str(), e.destination.as_str()))
            .collect()
    }

    #[test]
    fn renamed_source_keeps_old_rule_and_adds_new() {
        let result = run(&[("/docs/MyPage", "/docs/Other")], &["MyPage.md"]).unwrap();
        assert_eq!(
            pairs(&result),
            vec![
                ("/docs/MyPage", "/docs/Other"),
                ("/docs/my-page", "/docs/Other"),
                ("/docs/MyPage", "/docs/my-page"),
            ]
        );
    }

    #[test]
    fn renamed_destination_is_retargeted_in_place() {
        let result = run(&[("/docs/old", "/docs/MyPage#top")], &["MyPage.md"]).unwrap();
        assert_eq!(result[0], RedirectEntry::new("/docs/old", "/docs/my-page#top"));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn both_renamed_retargets_and_appends() {
        let result = run(
            &[("/docs/Guides/", "/docs/MyPage")],
            &["Guides/index.md", "MyPage.md"],
        )
        .unwrap();
        assert_eq!(
            pairs(&result)[..2],
            [
                ("/docs/Guides/", "/docs/my-page"),
                ("/docs/guides/", "/docs/my-page"),
            ]
        );
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn untouched_entries_are_kept_verbatim() {
        let result = run(
            &[("/docs/a", "/docs/b"), ("/elsewhere/MyPage", "/docs/b")],
            &["MyPage.md"],
        )
        .unwrap();
        assert_eq!(result[0], RedirectEntry::new("/docs/a", "/docs/b"));
        assert_eq!(result[1], RedirectEntry::new("/elsewhere/MyPage", "/docs/b"));
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn matches_all_four_url_shapes() {
        let map = pages_map(&["Guides/index.md", "MyPage.md"]);
        let migrator = RedirectMigrator::new(&map, Path::new("src/pages"), PREFIX).unwrap();
        let renamed = |url: &str| migrator.renamed_url(url).unwrap();

        assert_eq!(renamed("/docs/Guides/"), Some("/docs/guides/".to_string()));
        assert_eq!(renamed("/docs/Guides"), Some("/docs/guides".to_string()));
        assert_eq!(renamed("/docs/Guides/index"), Some("/docs/guides/index".to_string()));
        assert_eq!(renamed("/docs/MyPage/"), Some("/docs/my-page/".to_string()));
        assert_eq!(renamed("/docs/MyPage#a"), Some("/docs/my-page#a".to_string()));
        assert_eq!(renamed("/docs/MyPageX"), None);
        assert_eq!(renamed("/docs/Guides/Other"), None);
    }

    #[test]
    fn agreeing_rows_are_not_a_conflict() {
        let map = pages_map(&["Guides.md", "Guides/index.md"]);
        let migrator = RedirectMigrator::new(&map, Path::new("src/pages"), PREFIX).unwrap();
        assert_eq!(
            migrator.renamed_url("/docs/Guides/").unwrap(),
            Some("/docs/guides/".to_string())
        );
    }

    #[test]
    fn disagreeing_rows_are_a_conflict() {
        let map = pages_map(&["Foo/Index.md", "Foo/Index/index.md"]);
        let migrator = RedirectMigrator::new(&map, Path::new("src/pages"), PREFIX).unwrap();
        let err = migrator.renamed_url("/docs/Foo/Index/").unwrap_err();
        assert!(matches!(err, RenameError::Conflict { .. }));
        assert!(err.to_string().contains("/docs/Foo/Index/"));
    }

    #[test]
    fn conflicting_url_yields_no_table() {
        let result = run(
            &[("/docs/a", "/docs/Foo/Index/")],
            &["Foo/Index.md", "Foo/Index/index.md"],
        );
        assert!(matches!(result, Err(RenameError::Conflict { .. })));
    }

    #[test]
    fn never_shrinks_the_table() {
        let entries = [
            ("/docs/MyPage", "/docs/Guides/"),
            ("/docs/a", "/docs/b"),
            ("/docs/c", "/docs/MyPage"),
        ];
        let result = run(&entries, &["MyPage.md", "Guides/index.md"]).unwrap();
        assert!(result.len() >= entries.len());
        assert!(result.contains(&RedirectEntry::new("/docs/a", "/docs/b")));
    }

    #[test]
    fn writes_sheet_envelope() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("redirects.json");
        let entries = vec![RedirectEntry::new("/docs/a", "/docs/b")];

        write(&path, &entries).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            raw,
            r#"{"total":1,"offset":0,"limit":1,"data":[{"Source":"/docs/a","Destination":"/docs/b"}],":type":"sheet"}"#
        );
        assert_eq!(read(&path).unwrap(), entries);
    }

    #[test]
    fn reading_malformed_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("redirects.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read(&path), Err(RenameError::Json { .. })));
    }
}
