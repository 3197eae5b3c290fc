//! Broken-link report and build gate.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Error;
use crate::registry::LinkRegistry;
use crate::suggestions::SuggestionTable;
use crate::types::{LinkTarget, Locale, Occurrence};
use crate::walker;

/// Report rendering selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Machine-readable JSON on stdout.
    Json,
    /// Markdown with bold headings.
    Text,
}

/// Where a broken target is referenced, relative to its locale root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedOccurrence {
    /// File path relative to the locale root.
    pub file: PathBuf,
    /// One-based line of the link tag.
    pub line: u32,
    /// Locale containing the file.
    pub locale: Locale,
}

/// One unresolved target with every place it is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    /// Competing dynamic routes when the target was ambiguous.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ambiguous: Vec<String>,
    /// Occurrences in scan order.
    pub occurrences: Vec<ReportedOccurrence>,
    /// Known replacement for the target, if it was renamed.
    pub suggestion: Option<String>,
    /// The unresolved target.
    pub target: LinkTarget,
}

/// Outcome of one validation pass.
#[derive(Debug, Serialize)]
pub struct LinkReport {
    /// Unresolved targets in registry order.
    pub broken: Vec<BrokenLink>,
    /// Markdown files scanned.
    pub files: usize,
    /// Total link tags seen.
    pub links: usize,
    /// Distinct targets checked.
    pub targets: usize,
}

impl LinkReport {
    /// Partition the registry: every target missing from `validated` is
    /// broken. Order follows the registry, so output is stable across runs.
    pub fn build(
        docs_root: &Path,
        files: usize,
        registry: &LinkRegistry,
        validated: &HashSet<LinkTarget>,
        ambiguous: &HashMap<LinkTarget, Vec<String>>,
        suggestions: &SuggestionTable,
    ) -> Self {
        let broken = registry
            .iter()
            .filter(|entry| return !validated.contains(&entry.target))
            .map(|entry| {
                return BrokenLink {
                    ambiguous: ambiguous.get(&entry.target).cloned().unwrap_or_default(),
                    occurrences: entry.occurrences.iter().map(|o| return reported(docs_root, o)).collect(),
                    suggestion: suggestions.lookup(&entry.target),
                    target: entry.target.clone(),
                };
            })
            .collect();
        return Self { broken, files, links: registry.occurrence_count(), targets: registry.len() };
    }

    /// Fail the build when anything is broken.
    ///
    /// # Errors
    ///
    /// Returns `Error::BrokenLinks` carrying the number of broken targets.
    pub fn gate(&self) -> Result<(), Error> {
        if self.broken.is_empty() {
            return Ok(());
        }
        return Err(Error::BrokenLinks { count: self.broken.len() });
    }

    /// Markdown report: one section per broken target, then a summary line.
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        if !self.broken.is_empty() {
            out.push_str("# Broken Links\n");
        }
        for link in &self.broken {
            let _ = write!(out, "\n## `{}`\n\n", link.target);
            for occurrence in &link.occurrences {
                let _ = writeln!(out, "- {}: {}:{}", occurrence.locale, occurrence.file.display(), occurrence.line);
            }
            if !link.ambiguous.is_empty() {
                let routes: Vec<_> = link.ambiguous.iter().map(|r| return format!("`{r}`")).collect();
                let _ = write!(out, "\nAmbiguous: competing dynamic routes {}\n", routes.join(", "));
            }
            if let Some(suggestion) = &link.suggestion {
                let _ = write!(out, "\nDid you mean `{suggestion}`?\n");
            }
        }
        if !self.broken.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "{} broken of {} targets ({} links in {} files)",
            self.broken.len(),
            self.targets,
            self.links,
            self.files
        );
        return out;
    }
}

/// An occurrence with its file made relative to its locale root.
fn reported(docs_root: &Path, occurrence: &Occurrence) -> ReportedOccurrence {
    let root = walker::locale_root(docs_root, &occurrence.locale);
    let file = occurrence.file.strip_prefix(&root).unwrap_or(&occurrence.file).to_path_buf();
    return ReportedOccurrence { file, line: occurrence.line, locale: occurrence.locale.clone() };
}
