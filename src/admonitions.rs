//! Admonition syntax gate: container keywords must be in the allow-list.

use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::Error;
use crate::types::Locale;
use crate::walker::LocaleTree;

/// Minimum marker run for containers and code fences.
const MARKER_LEN: usize = 3;

/// A run of backticks or tildes at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    /// Whether nothing but whitespace follows the run.
    bare: bool,
    /// Fence character.
    marker: char,
    /// Length of the run.
    run: usize,
}

impl Fence {
    /// Whether `self` closes a fence opened by `open`.
    fn closes(self, open: Self) -> bool {
        return self.bare && self.marker == open.marker && self.run >= open.run;
    }
}

/// A container opener whose keyword is not allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidAdmonition {
    /// File relative to its locale root.
    pub file: PathBuf,
    /// The rejected keyword.
    pub keyword: String,
    /// One-based line number.
    pub line: u32,
    /// Locale containing the file.
    pub locale: Locale,
}

/// Outcome of the admonition check.
#[derive(Debug, Serialize)]
pub struct AdmonitionReport {
    /// Keywords accepted, for the report footer.
    pub allowed: Vec<String>,
    /// Markdown files scanned.
    pub files: usize,
    /// Offending lines in scan order.
    pub invalid: Vec<InvalidAdmonition>,
}

/// Check every container opener in every locale tree.
///
/// # Errors
///
/// Returns `Error::Io` if a markdown file cannot be read.
pub fn check(trees: &[LocaleTree], allowed: &[String]) -> Result<AdmonitionReport, Error> {
    let mut invalid = Vec::new();
    let mut files = 0_usize;
    for tree in trees {
        for file in &tree.files {
            let content = std::fs::read_to_string(file)?;
            files = files.saturating_add(1);
            for (line, keyword) in invalid_keywords(&content, allowed) {
                invalid.push(InvalidAdmonition {
                    file: tree.relative(file).to_path_buf(),
                    keyword,
                    line,
                    locale: tree.locale.clone(),
                });
            }
        }
    }
    return Ok(AdmonitionReport { allowed: allowed.to_vec(), files, invalid });
}

/// `(line, keyword)` for every opener outside code fences with a keyword
/// not in `allowed`.
fn invalid_keywords(content: &str, allowed: &[String]) -> Vec<(u32, String)> {
    let mut found = Vec::new();
    let mut open_fence: Option<Fence> = None;
    for (number, line) in (1_u32..).zip(content.lines()) {
        let trimmed = line.trim_start();
        let fence = fence_run(trimmed);
        if let Some(open) = open_fence {
            if fence.is_some_and(|f| return f.closes(open)) {
                open_fence = None;
            }
            continue;
        }
        if fence.is_some() {
            open_fence = fence;
            continue;
        }
        if let Some(keyword) = container_keyword(trimmed) {
            if !allowed.iter().any(|k| return k == keyword) {
                found.push((number, keyword.to_string()));
            }
        }
    }
    return found;
}

/// The code fence run a line starts with, if any.
fn fence_run(trimmed: &str) -> Option<Fence> {
    let marker = trimmed.chars().next().filter(|&c| return matches!(c, '`' | '~'))?;
    let rest = trimmed.trim_start_matches(marker);
    let run = trimmed.len().saturating_sub(rest.len());
    if run < MARKER_LEN {
        return None;
    }
    return Some(Fence { bare: rest.trim().is_empty(), marker, run });
}

/// The keyword of a container opener. Closers and ordinary lines yield `None`.
fn container_keyword(trimmed: &str) -> Option<&str> {
    let rest = trimmed.trim_start_matches(':');
    let colons = trimmed.len().saturating_sub(rest.len());
    if colons < MARKER_LEN {
        return None;
    }
    let keyword = rest
        .trim_start()
        .split(|c: char| return c.is_whitespace() || c == '{')
        .next()
        .unwrap_or_default();
    if keyword.is_empty() {
        return None;
    }
    return Some(keyword);
}

impl AdmonitionReport {
    /// Fail the build when any opener is invalid.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidAdmonitions` with the number of offending lines.
    pub fn gate(&self) -> Result<(), Error> {
        if self.invalid.is_empty() {
            return Ok(());
        }
        return Err(Error::InvalidAdmonitions { count: self.invalid.len() });
    }

    /// Markdown report listing each offending line.
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        if !self.invalid.is_empty() {
            out.push_str("# Invalid Admonitions\n\n");
            for item in &self.invalid {
                let _ = writeln!(out, "- {}/{}:{}  `::: {}`", item.locale, item.file.display(), item.line, item.keyword);
            }
            let _ = write!(out, "\n## Allowed keywords\n\n{}\n\n", self.allowed.join(", "));
        }
        let _ = writeln!(out, "{} invalid admonitions in {} files", self.invalid.len(), self.files);
        return out;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        return ["info", "tip", "warning", "danger", "details"].iter().map(|k| (*k).to_string()).collect();
    }

    #[test]
    fn flags_unknown_keywords_only() {
        let content = "::: tip\nok\n:::\n\n::: warn Careful\nx\n:::\n:::: details{open}\n::::\n";
        assert_eq!(invalid_keywords(content, &allowed()), vec![(5, "warn".to_string())]);
    }

    #[test]
    fn ignores_code_fences_and_short_markers() {
        let content = "```md\n::: bogus\n```\n~~~\n::: also-bogus\n~~~\n:: nope\n  :::note\n";
        assert_eq!(invalid_keywords(content, &allowed()), vec![(8, "note".to_string())]);
    }

    #[test]
    fn nested_fence_of_other_kind_does_not_close() {
        let content = "~~~\n```\n::: bogus\n~~~\n";
        assert!(invalid_keywords(content, &allowed()).is_empty());
    }

    #[test]
    fn info_string_line_does_not_close_a_fence() {
        let content = "```md\n```js\n::: bogus\n```\n::: after\n";
        assert_eq!(invalid_keywords(content, &allowed()), vec![(5, "after".to_string())]);
    }

    #[test]
    fn longer_fence_needs_a_long_enough_closer() {
        let content = "````md\n```\n::: bogus\n```\n````\n::: after\n";
        assert_eq!(invalid_keywords(content, &allowed()), vec![(6, "after".to_string())]);
    }

    #[test]
    fn reports_relative_paths_and_fails() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("es");
        std::fs::create_dir_all(root.join("guides")).unwrap();
        std::fs::write(root.join("guides/a.md"), "::: caution\n:::\n").unwrap();
        let tree = LocaleTree { files: vec![root.join("guides/a.md")], locale: Locale("es".into()), root };

        let report = check(&[tree], &allowed()).unwrap();
        assert_eq!(report.invalid.len(), 1);
        assert_eq!(report.invalid[0].file, PathBuf::from("guides/a.md"));
        assert!(matches!(report.gate(), Err(Error::InvalidAdmonitions { count: 1 })));
        assert!(report.render_markdown().contains("- es/guides/a.md:1  `::: caution`"));
    }
}
