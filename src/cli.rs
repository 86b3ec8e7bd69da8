//! Command-line interface definitions.
//!
//! Defines the argument parser and subcommands using clap's derive API.
//! Every subcommand shares the same site layout flags; `detect` and `apply`
//! differ only in whether the computed plan is written to disk.

use clap::{Parser, Subcommand};
use site_rename::{Config, Result};
use std::path::PathBuf;

/// Normalize content file names to kebab-case and keep links and redirects consistent.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the site's files live.
#[derive(Debug, clap::Args)]
pub struct SiteArgs {
    /// Project root. Every other path is relative to it.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Directory holding the deployable `.md` and `.json` files.
    #[arg(long, default_value = "src/pages")]
    pub pages_dir: PathBuf,

    /// Redirects sheet. Defaults to `redirects.json` in the pages directory.
    #[arg(long)]
    pub redirects: Option<PathBuf>,

    /// JavaScript navigation config with quoted `path:` entries.
    #[arg(long, default_value = "gatsby-config.js")]
    pub nav_config: PathBuf,

    /// Path prefix to use instead of the one in config.md or the navigation config.
    #[arg(long)]
    pub path_prefix: Option<String>,

    /// Canonical prefix published for this site, with or without trailing slash.
    #[arg(long)]
    pub expected_prefix: Option<String>,

    /// Glob patterns for directories/files to exclude (e.g., "drafts", "src/pages/vendor/*").
    /// Entries starting with `.` are always excluded.
    #[arg(short, long)]
    pub exclude: Vec<String>,
}

impl SiteArgs {
    pub fn into_config(self) -> Result<Config> {
        let mut config = Config::new(self.root);
        config.redirects_file = self
            .redirects
            .unwrap_or_else(|| self.pages_dir.join("redirects.json"));
        config.pages_dir = self.pages_dir;
        config.nav_file = self.nav_config;
        config.path_prefix = self.path_prefix;
        config.expected_prefix = self.expected_prefix;
        config.with_excludes(&self.exclude)
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report the renames, link rewrites and redirect changes without writing anything.
    Detect {
        #[command(flatten)]
        site: SiteArgs,

        /// Emit JSON instead of human-readable output.
        #[arg(long)]
        json: bool,

        /// Print additional diagnostics to stderr.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Rewrite references, migrate redirects, then rename the files.
    Apply {
        #[command(flatten)]
        site: SiteArgs,

        /// Confirm the plan before anything is written.
        #[arg(short, long)]
        interactive: bool,

        /// Print additional diagnostics to stderr.
        #[arg(short, long)]
        verbose: bool,
    },

    /// List files that would be considered for renaming.
    Scan {
        #[command(flatten)]
        site: SiteArgs,
    },

    /// Resolve, validate and print the site's path prefix.
    Prefix {
        #[command(flatten)]
        site: SiteArgs,
    },
}
