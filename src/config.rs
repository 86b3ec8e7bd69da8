//! Run configuration and path-prefix resolution.
//!
//! The path prefix namespaces every published URL (`/commerce/frontend-core/`).
//! It is taken from, in order: an explicit override, the `pathPrefix` entry
//! of `config.md` in the pages directory, and the `pathPrefix` field of the
//! navigation config. Whatever is found must start and end with `/`.

use crate::error::{IoContext, RenameError, Result};
use glob::Pattern;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Name of the site config document inside the pages directory.
pub const SITE_CONFIG_FILE: &str = "config.md";

#[derive(Debug, Clone)]
pub struct Config {
    /// Project root; every other path is relative to it.
    pub root: PathBuf,
    pub pages_dir: PathBuf,
    pub redirects_file: PathBuf,
    /// JavaScript navigation config holding quoted `path:` entries.
    pub nav_file: PathBuf,
    /// Overrides any prefix found in the site's own config.
    pub path_prefix: Option<String>,
    /// Canonical prefix published elsewhere, checked when present.
    pub expected_prefix: Option<String>,
    pub excludes: Vec<Pattern>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Config {
    /// Conventional layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let pages_dir = PathBuf::from("src/pages");
        Self {
            root: root.into(),
            redirects_file: pages_dir.join("redirects.json"),
            pages_dir,
            nav_file: PathBuf::from("gatsby-config.js"),
            path_prefix: None,
            expected_prefix: None,
            excludes: Vec::new(),
        }
    }

    /// Parses exclusion globs, reporting the first invalid one.
    pub fn with_excludes<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        self.excludes = patterns
            .iter()
            .map(|p| {
                Pattern::new(p.as_ref()).map_err(|err| {
                    RenameError::config(format!("Invalid exclude pattern '{}': {err}", p.as_ref()))
                })
            })
            .collect::<Result<_>>()?;
        Ok(self)
    }

    /// Absolute-ish location of a root-relative path.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Directory the redirect URLs are computed from.
    pub fn redirects_dir(&self) -> &Path {
        self.redirects_file.parent().unwrap_or(Path::new(""))
    }

    /// Resolves and validates the path prefix.
    pub fn path_prefix(&self) -> Result<String> {
        let prefix = match &self.path_prefix {
            Some(prefix) => Some(prefix.clone()),
            None => self.prefix_from_site()?,
        };

        let Some(prefix) = prefix else {
            return Err(RenameError::config(
                "The pathPrefix in the site's config.md file is missing.\n\n\
                 To fix this, open your config.md file, and add it to the config object:\n\n\
                 - pathPrefix:\n    - /commerce/frontend-core/",
            ));
        };

        validate_prefix(&prefix, self.expected_prefix.as_deref())?;
        Ok(prefix)
    }

    fn prefix_from_site(&self) -> Result<Option<String>> {
        let site_config = self.resolve(&self.pages_dir.join(SITE_CONFIG_FILE));
        if site_config.is_file() {
            let text = std::fs::read_to_string(&site_config).at(&site_config)?;
            if let Some(prefix) = prefix_from_site_config(&text) {
                return Ok(Some(prefix));
            }
        }

        let nav = self.resolve(&self.nav_file);
        if nav.is_file() {
            let text = std::fs::read_to_string(&nav).at(&nav)?;
            return Ok(prefix_from_nav_config(&text));
        }

        Ok(None)
    }
}

/// Reads the value under a `- pathPrefix:` list key.
///
/// ```text
/// - pathPrefix:
///     - /commerce/frontend-core/
/// ```
pub fn prefix_from_site_config(text: &str) -> Option<String> {
    let mut lines = text.lines();
    lines.find(|line| {
        line.trim_start()
            .strip_prefix('-')
            .is_some_and(|rest| rest.trim_start().starts_with("pathPrefix:"))
    })?;

    let value = lines.find(|line| line.trim_start().starts_with('-'))?;
    let value = value.trim_start()[1..].split_whitespace().next()?;
    Some(value.to_string())
}

/// Reads a quoted `pathPrefix` field from a JavaScript config module.
pub fn prefix_from_nav_config(text: &str) -> Option<String> {
    let re = Regex::new(r#"pathPrefix['"]?\s*:\s*['"`]([^'"`]*)['"`]"#).ok()?;
    re.captures(text).map(|caps| caps[1].to_string())
}

/// Checks the prefix shape and, when given, agreement with `expected`.
///
/// `expected` may be written with or without its trailing slash.
pub fn validate_prefix(prefix: &str, expected: Option<&str>) -> Result<()> {
    if prefix == "/" {
        return Err(RenameError::config(
            "The pathPrefix in the site's config.md file is set to \"/\". This is not allowed.\n\n\
             To fix this, change the pathPrefix to include a name that starts and ends with \"/\".\n\
             For example: \"/commerce/frontend-core/\"",
        ));
    }

    if !prefix.starts_with('/') || !prefix.ends_with('/') {
        return Err(RenameError::config(format!(
            "The pathPrefix in the site's config.md file does not start or end with \"/\".\n\n\
             pathPrefix: \"{prefix}\"\n\n\
             To fix this, change the pathPrefix to include a name that starts and ends with \"/\".\n\
             For example: \"/document-services/\" or \"/commerce/cloud-tools/\"."
        )));
    }

    if let Some(expected) = expected {
        let expected = format!("{}/", expected.trim_end_matches('/'));
        if prefix != expected {
            return Err(RenameError::config(format!(
                "The pathPrefix in the site's config.md file doesn't match the published pathPrefix.\n\n\
                 pathPrefix from config.md: \"{prefix}\"\n\
                 published pathPrefix: \"{expected}\"\n\n\
                 To fix this, change the pathPrefix on either side to have the same value."
            )));
        }
    }

    Ok(())
}
