//! Locale tree walking: list markdown files under each locale root.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Error;
use crate::types::Locale;

/// All markdown files of one locale, sorted for deterministic scans.
#[derive(Debug, Clone)]
pub struct LocaleTree {
    /// Absolute paths of every `.md` file below `root`.
    pub files: Vec<PathBuf>,
    /// The locale this tree belongs to.
    pub locale: Locale,
    /// The locale root, `<docs root>/<locale>`.
    pub root: PathBuf,
}

impl LocaleTree {
    /// Path of a file relative to this locale root, for reports.
    pub fn relative<'a>(&self, file: &'a Path) -> &'a Path {
        return file.strip_prefix(&self.root).unwrap_or(file);
    }
}

/// The root directory of a locale below the documentation root.
pub fn locale_root(docs_root: &Path, locale: &Locale) -> PathBuf {
    return docs_root.join(locale.as_str());
}

/// Walk every locale whose directory exists. Missing locale directories are
/// skipped, narrowing the set of locales checked.
///
/// # Errors
///
/// Returns `Error::Walk` if a directory below a locale root cannot be read.
pub fn locale_trees(docs_root: &Path, locales: &[Locale]) -> Result<Vec<LocaleTree>, Error> {
    let mut trees = Vec::with_capacity(locales.len());
    for locale in locales {
        let root = locale_root(docs_root, locale);
        if !root.is_dir() {
            tracing::debug!(%locale, root = %root.display(), "locale directory missing, skipped");
            continue;
        }
        let files = markdown_files(&root)?;
        tracing::debug!(%locale, files = files.len(), "walked locale tree");
        trees.push(LocaleTree { files, locale: locale.clone(), root });
    }
    return Ok(trees);
}

/// List all markdown files below `root`, recursively, in file-name order.
///
/// # Errors
///
/// Returns `Error::Walk` if any directory entry cannot be read.
pub fn markdown_files(root: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| return ext == "md") {
            files.push(entry.into_path());
        }
    }
    return Ok(files);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn lists_nested_markdown_only() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "en/index.md");
        touch(dir.path(), "en/guides/deep/page.md");
        touch(dir.path(), "en/guides/logo.png");

        let files = markdown_files(&dir.path().join("en")).unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path().join("en")).unwrap().to_path_buf())
            .collect();
        assert_eq!(relative, vec![PathBuf::from("guides/deep/page.md"), PathBuf::from("index.md")]);
    }

    #[test]
    fn missing_locale_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "en/index.md");
        let locales = vec![Locale("en".into()), Locale("es".into())];

        let trees = locale_trees(dir.path(), &locales).unwrap();
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].locale.as_str(), "en");
        assert_eq!(trees[0].relative(&trees[0].files[0]), Path::new("index.md"));
    }
}
