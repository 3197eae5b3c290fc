use std::path::Path;

use regex::Regex;

use crate::error::Error;
use crate::registry::LinkRegistry;
use crate::types::{LinkTarget, Occurrence};
use crate::walker::LocaleTree;

/// The `LocalizedLink` component tag with its `href` attribute.
/// Attributes may span lines; plain markdown links are not matched. `href`
/// must stand alone, so bound `:href` and `data-href` are skipped.
const LINK_PATTERN: &str = r#"<LocalizedLink\b[^>]*?\shref\s*=\s*"([^"]*)""#;

/// Result of scanning every locale tree.
#[derive(Debug)]
pub struct Scan {
    /// Number of markdown files read.
    pub files: usize,
    /// Every extracted target with its occurrences.
    pub registry: LinkRegistry,
}

/// Scan all locale trees and build the link registry.
/// Each locale is scanned on its own thread; partial registries are merged in
/// locale order once every scan has finished.
///
/// # Errors
///
/// Returns `Error::Io` if any markdown file cannot be read,
/// or `Error::ScanAborted` if a scan thread panicked.
pub fn scan(trees: &[LocaleTree]) -> Result<Scan, Error> {
    let regex = Regex::new(LINK_PATTERN)?;
    let pattern = &regex;

    let partials = std::thread::scope(|scope| {
        let handles: Vec<_> = trees
            .iter()
            .map(|tree| return (tree, scope.spawn(move || return scan_locale_tree(tree, pattern))))
            .collect();
        return handles
            .into_iter()
            .map(|(tree, handle)| {
                return handle.join().unwrap_or_else(|_| {
                    return Err(Error::ScanAborted { locale: tree.locale.0.clone() });
                });
            })
            .collect::<Result<Vec<_>, Error>>();
    })?;

    let mut registry = LinkRegistry::default();
    for partial in partials {
        registry.merge(partial);
    }
    let files: usize = trees.iter().map(|t| return t.files.len()).sum();
    tracing::info!(files, targets = registry.len(), links = registry.occurrence_count(), "scanned locale trees");
    return Ok(Scan { files, registry });
}

/// Build the partial registry of one locale.
///
/// # Errors
///
/// Returns `Error::Io` if a markdown file cannot be read.
fn scan_locale_tree(tree: &LocaleTree, pattern: &Regex) -> Result<LinkRegistry, Error> {
    let mut registry = LinkRegistry::default();
    for file in &tree.files {
        let content = std::fs::read_to_string(file)?;
        record_file_links(&content, file, tree, pattern, &mut registry);
    }
    tracing::debug!(locale = %tree.locale, targets = registry.len(), "scanned locale");
    return Ok(registry);
}

/// Record every link of one file, one occurrence per tag.
fn record_file_links(content: &str, file: &Path, tree: &LocaleTree, pattern: &Regex, registry: &mut LinkRegistry) {
    for (line, target) in extract_link_targets(content, pattern) {
        let occurrence = Occurrence { file: file.to_path_buf(), line, locale: tree.locale.clone() };
        registry.insert(target, occurrence);
    }
}

/// Lazily extract `(line, target)` pairs from markdown content.
/// Skips empty hrefs, in-page anchors, and external URLs.
pub fn extract_link_targets<'a>(content: &'a str, pattern: &'a Regex) -> impl Iterator<Item = (u32, LinkTarget)> + 'a {
    return pattern.captures_iter(content).filter_map(move |cap| {
        let href = cap.get(1)?;
        if !is_checkable_href(href.as_str()) {
            return None;
        }
        return Some((line_of_offset(content, href.start()), LinkTarget::from_href(href.as_str())));
    });
}

/// Whether an href points at a page inside the documentation tree.
fn is_checkable_href(href: &str) -> bool {
    let href = href.trim();
    return !(href.is_empty() || href.starts_with('#') || href.contains("://") || href.starts_with("mailto:"));
}

/// One-based line number of a byte offset.
fn line_of_offset(content: &str, offset: usize) -> u32 {
    let newlines = content.as_bytes().iter().take(offset).filter(|&&b| return b == b'\n').count();
    return u32::try_from(newlines).unwrap_or(u32::MAX).saturating_add(1);
}
