//! Locale completeness gate: every base-locale page exists in every locale.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Error;
use crate::route;
use crate::types::Locale;
use crate::walker;

/// Base-locale pages absent from one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingPages {
    /// Locale lacking the pages.
    pub locale: Locale,
    /// Page paths relative to the locale root, in walk order.
    pub pages: Vec<PathBuf>,
}

/// Outcome of the completeness check.
#[derive(Debug, Serialize)]
pub struct CompletenessReport {
    /// Pages found under the base locale.
    pub base_pages: usize,
    /// Locales with at least one missing page, in configured order.
    pub missing: Vec<MissingPages>,
}

/// Compare every locale against `base`. A locale without a directory is
/// missing every page.
///
/// # Errors
///
/// Returns `Error::Walk` if the base tree cannot be walked,
/// or `Error::Io` if a counterpart cannot be inspected.
pub fn check(docs_root: &Path, base: &Locale, locales: &[Locale]) -> Result<CompletenessReport, Error> {
    let base_root = walker::locale_root(docs_root, base);
    if !base_root.is_dir() {
        tracing::warn!(locale = %base, root = %base_root.display(), "base locale directory missing");
        return Ok(CompletenessReport { base_pages: 0, missing: Vec::new() });
    }

    let pages: Vec<PathBuf> = walker::markdown_files(&base_root)?
        .iter()
        .map(|file| return file.strip_prefix(&base_root).unwrap_or(file).to_path_buf())
        .collect();

    let mut missing = Vec::new();
    for locale in locales.iter().filter(|l| return *l != base) {
        let root = walker::locale_root(docs_root, locale);
        let mut absent = Vec::new();
        for page in &pages {
            if !route::file_exists(&root.join(page))? {
                absent.push(page.clone());
            }
        }
        tracing::debug!(%locale, missing = absent.len(), "checked locale completeness");
        if !absent.is_empty() {
            missing.push(MissingPages { locale: locale.clone(), pages: absent });
        }
    }
    return Ok(CompletenessReport { base_pages: pages.len(), missing });
}

impl CompletenessReport {
    /// Number of missing (locale, page) pairs.
    pub fn missing_count(&self) -> usize {
        return self.missing.iter().map(|m| return m.pages.len()).sum();
    }

    /// Fail the build when any page is missing.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingLocalePages` with the number of missing pages.
    pub fn gate(&self) -> Result<(), Error> {
        let count = self.missing_count();
        if count == 0 {
            return Ok(());
        }
        return Err(Error::MissingLocalePages { count });
    }

    /// Markdown report grouped by locale.
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        if !self.missing.is_empty() {
            out.push_str("# Missing Localized Pages\n");
        }
        for group in &self.missing {
            let _ = write!(out, "\n## {} ({} missing)\n\n", group.locale, group.pages.len());
            for page in &group.pages {
                let _ = writeln!(out, "- {}", page.display());
            }
        }
        if !self.missing.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "{} missing across {} base pages", self.missing_count(), self.base_pages);
        return out;
    }
}
