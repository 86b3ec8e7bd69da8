//! Reference rewriting inside text files.
//!
//! Each [`LinkMap`] entry is turned into a find regex and a replacement
//! template by a [`RewritePattern`]. All matches are located against the
//! original text first, then spliced in reverse offset order, so the output
//! of one entry is never fed into the find of another.

use crate::error::Result;
use crate::link_map::LinkMap;
use crate::paths::split_extension;
use regex::RegexBuilder;

/// Builds the find regex and replacement template for one reference.
///
/// Find patterns must delimit the reference explicitly (quotes, parens, or
/// anchors) so a reference that is a substring of another never matches.
pub trait RewritePattern {
    /// Regex matching `from` in its surrounding syntax.
    fn find_pattern(&self, from: &str) -> String;

    /// `regex` replacement template writing `to` back into the same syntax.
    fn replace_pattern(&self, to: &str) -> String;
}

/// `[label](target)` links, with an optional `/` or `./` prefix, optional
/// file extension and optional `#fragment`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownLink;

impl RewritePattern for MarkdownLink {
    fn find_pattern(&self, from: &str) -> String {
        let (stem, ext) = split_extension(from);
        format!(
            r"(\[[^\]]*\]\()(/|\./)?({})({})?(#[^()]*)?(\))",
            regex::escape(stem),
            regex::escape(ext)
        )
    }

    fn replace_pattern(&self, to: &str) -> String {
        let (stem, _) = split_extension(to);
        format!("${{1}}${{2}}{}${{4}}${{5}}${{6}}", escape_template(stem))
    }
}

/// Quoted `path:` values in a JavaScript navigation config, such as
/// `{ title: "Setup", path: "/guides/Setup.md#install" }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavConfigPath;

impl RewritePattern for NavConfigPath {
    fn find_pattern(&self, from: &str) -> String {
        let (stem, ext) = split_extension(from);
        format!(
            r#"(['"]?path['"]?\s*:\s*['"])(/|\./)?({})({})?(#[^'"]*)?(['"])"#,
            regex::escape(stem),
            regex::escape(ext)
        )
    }

    fn replace_pattern(&self, to: &str) -> String {
        let (stem, _) = split_extension(to);
        format!("${{1}}${{2}}{}${{4}}${{5}}${{6}}", escape_template(stem))
    }
}

/// Escapes `$` so literal text survives inside a replacement template.
pub(crate) fn escape_template(text: &str) -> String {
    text.replace('$', "$$")
}

/// Rewritten text plus the number of references that changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub count: usize,
}

impl Rewrite {
    pub fn changed(&self) -> bool {
        self.count > 0
    }
}

/// A single text replacement with position information.
#[derive(Debug, Clone)]
struct Replacement {
    start: usize,
    end: usize,
    new_text: String,
}

/// Rewrites every reference in `text` that `links` renames.
///
/// Entries are matched in insertion order. When two matches overlap, the
/// earlier one in the text wins, and on a tie the earlier entry wins.
pub fn rewrite(text: &str, links: &LinkMap, pattern: &dyn RewritePattern) -> Result<Rewrite> {
    let mut replacements = Vec::new();

    for (from, to) in links.iter() {
        let find = RegexBuilder::new(&pattern.find_pattern(from))
            .multi_line(true)
            .build()?;
        let template = pattern.replace_pattern(to);

        for caps in find.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let mut new_text = String::new();
            caps.expand(&template, &mut new_text);
            replacements.push(Replacement {
                start: whole.start(),
                end: whole.end(),
                new_text,
            });
        }
    }

    Ok(apply_replacements(text, replacements))
}

/// Applies non-overlapping replacements from the end of `content` backwards.
fn apply_replacements(content: &str, mut replacements: Vec<Replacement>) -> Rewrite {
    replacements.sort_by_key(|rep| rep.start);

    let mut kept: Vec<Replacement> = Vec::with_capacity(replacements.len());
    for rep in replacements {
        if kept.last().is_none_or(|last| rep.start >= last.end) {
            kept.push(rep);
        }
    }

    let count = kept.len();
    let mut result = content.to_string();
    for rep in kept.into_iter().rev() {
        result.replace_range(rep.start..rep.end, &rep.new_text);
    }

    Rewrite {
        text: result,
        count,
    }
}
