//! Plan-then-apply orchestration of a rename run.
//!
//! [`plan`] does all reading, conflict detection and rewriting in memory.
//! [`Plan::apply`] then writes in a fixed order: markdown files, the
//! navigation config, the redirects file, and only then the physical
//! renames, so every reference is updated while the old names still exist.

use crate::config::Config;
use crate::error::{IoContext, Result};
use crate::file_map::FileMap;
use crate::link_map::LinkMap;
use crate::mover::FileMover;
use crate::redirects::{self, RedirectEntry, RedirectMigrator};
use crate::rewriter::{MarkdownLink, NavConfigPath, RewritePattern, rewrite};
use crate::scanner;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A text file whose references change.
#[derive(Debug, Clone)]
pub struct FileEdit {
    /// Path relative to the project root.
    pub file: PathBuf,
    /// Number of references rewritten.
    pub links: usize,
    pub contents: String,
}

/// The migrated redirect table.
#[derive(Debug, Clone)]
pub struct RedirectsUpdate {
    pub before: usize,
    pub entries: Vec<RedirectEntry>,
}

/// Everything a run will change, computed without touching the disk.
#[derive(Debug, Clone)]
pub struct Plan {
    pub file_map: FileMap,
    pub edits: Vec<FileEdit>,
    pub redirects: Option<RedirectsUpdate>,
    pub files_scanned: usize,
}

/// Builds the plan for the site described by `config`.
pub fn plan(config: &Config) -> Result<Plan> {
    let files = scanner::deployable_files(config)?;
    let file_map = FileMap::build(&files)?;
    FileMover::new(&config.root).preflight(&file_map)?;

    if file_map.is_empty() {
        return Ok(Plan {
            file_map,
            edits: Vec::new(),
            redirects: None,
            files_scanned: files.len(),
        });
    }

    let mut edits = Vec::new();
    let mut link_maps: HashMap<PathBuf, LinkMap> = HashMap::new();
    for file in files.iter().filter(|f| scanner::is_markdown(f)) {
        let dir = file.parent().unwrap_or(Path::new("")).to_path_buf();
        let links = link_maps
            .entry(dir)
            .or_insert_with_key(|dir| LinkMap::project(&file_map, dir));
        edits.extend(rewrite_file(config, file, links, &MarkdownLink)?);
    }

    if config.resolve(&config.nav_file).is_file() {
        let links = LinkMap::project(&file_map, &config.pages_dir);
        edits.extend(rewrite_file(config, &config.nav_file, &links, &NavConfigPath)?);
    }

    let mut redirects = None;
    let redirects_file = config.resolve(&config.redirects_file);
    if redirects_file.is_file() {
        let path_prefix = config.path_prefix()?;
        let entries = redirects::read(&redirects_file)?;
        let migrator = RedirectMigrator::new(&file_map, config.redirects_dir(), &path_prefix)?;
        redirects = Some(RedirectsUpdate {
            before: entries.len(),
            entries: migrator.migrate(&entries)?,
        });
    }

    Ok(Plan {
        file_map,
        edits,
        redirects,
        files_scanned: files.len(),
    })
}

fn rewrite_file(
    config: &Config,
    file: &Path,
    links: &LinkMap,
    pattern: &dyn RewritePattern,
) -> Result<Option<FileEdit>> {
    let path = config.resolve(file);
    let text = std::fs::read_to_string(&path).at(&path)?;
    let rewritten = rewrite(&text, links, pattern)?;
    Ok(rewritten.changed().then(|| FileEdit {
        file: file.to_path_buf(),
        links: rewritten.count,
        contents: rewritten.text,
    }))
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.file_map.is_empty()
    }

    /// Writes every planned change, renaming files last.
    pub fn apply(&self, config: &Config) -> Result<()> {
        for edit in &self.edits {
            let path = config.resolve(&edit.file);
            std::fs::write(&path, &edit.contents).at(&path)?;
        }

        if let Some(update) = &self.redirects {
            redirects::write(&config.resolve(&config.redirects_file), &update.entries)?;
        }

        FileMover::new(&config.root).apply(&self.file_map)
    }

    pub fn report(&self) -> Report {
        let renames: Vec<Rename> = self
            .file_map
            .iter()
            .map(|(from, to)| Rename {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
            })
            .collect();

        let edits: Vec<EditSummary> = self
            .edits
            .iter()
            .map(|edit| EditSummary {
                file: edit.file.clone(),
                links: edit.links,
            })
            .collect();

        let redirects = self.redirects.as_ref().map(|update| RedirectSummary {
            before: update.before,
            after: update.entries.len(),
        });

        let diagnostics = Diagnostics {
            files_scanned: self.files_scanned,
            renames: renames.len(),
            files_rewritten: edits.len(),
            links_rewritten: edits.iter().map(|e| e.links).sum(),
            redirects_added: redirects.as_ref().map_or(0, |r| r.after - r.before),
        };

        Report {
            renames,
            edits,
            redirects,
            diagnostics,
        }
    }
}

/// Plans and applies in one go.
pub fn run(config: &Config) -> Result<Report> {
    let plan = plan(config)?;
    plan.apply(config)?;
    Ok(plan.report())
}

#[derive(Debug, Clone, Serialize)]
pub struct Rename {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditSummary {
    pub file: PathBuf,
    pub links: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RedirectSummary {
    pub before: usize,
    pub after: usize,
}

/// Summary statistics from a run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Diagnostics {
    pub files_scanned: usize,
    pub renames: usize,
    pub files_rewritten: usize,
    pub links_rewritten: usize,
    pub redirects_added: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub renames: Vec<Rename>,
    pub edits: Vec<EditSummary>,
    pub redirects: Option<RedirectSummary>,
    pub diagnostics: Diagnostics,
}
