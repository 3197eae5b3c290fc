//! Route patterns: a target path pre-parsed into literal and dynamic segments.
//!
//! Dynamic matching walks a locale tree one segment at a time. A literal
//! segment needs a child with exactly that name; a dynamic segment (`[param]`)
//! needs a bracketed child, whatever its parameter name. A page and its
//! `.paths.*` data loader share one route stem and count as one child.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Markdown source extension appended to page targets.
const MARKDOWN_EXT: &str = ".md";

/// Page rendered for a section reference.
const INDEX_FILE: &str = "index.md";

/// Suffixes of the data loaders that enumerate a dynamic page's parameters.
const LOADER_SUFFIXES: [&str; 3] = [".paths.js", ".paths.mjs", ".paths.ts"];

/// Outcome of matching a route pattern against one locale tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch {
    /// A dynamic segment faced several bracketed routes.
    Ambiguous {
        /// Sorted route stems that compete.
        candidates: Vec<String>,
        /// Directory holding them.
        directory: PathBuf,
    },
    /// The pattern's shape exists.
    Found,
    /// Some segment has no matching child.
    Missing,
}

/// One `/`-separated piece of a target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Bracketed placeholder such as `[slug]`. Matches any bracketed entry.
    Dynamic(String),
    /// Plain name that must exist verbatim.
    Literal(String),
}

impl PathSegment {
    /// Classify a raw segment.
    fn parse(raw: &str) -> Self {
        if is_bracketed(raw) {
            return Self::Dynamic(raw.to_string());
        }
        return Self::Literal(raw.to_string());
    }

    /// The segment text as written.
    fn as_str(&self) -> &str {
        return match self {
            Self::Dynamic(name) | Self::Literal(name) => name,
        };
    }
}

/// A target path split into segments, with `.` and `..` already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    /// A trailing `/` marks a section: only its `index.md` can satisfy it.
    section: bool,
    /// Segments from the locale root down.
    segments: Vec<PathSegment>,
}

impl RoutePattern {
    /// Parse the path portion of a target.
    /// Returns `None` when `..` climbs above the locale root.
    pub fn parse(path: &str) -> Option<Self> {
        let mut segments: Vec<PathSegment> = Vec::new();
        for raw in path.split('/') {
            match raw {
                "" | "." => {},
                ".." => {
                    segments.pop()?;
                },
                other => segments.push(PathSegment::parse(other)),
            }
        }
        return Some(Self { section: path.ends_with('/'), segments });
    }

    /// Files that would satisfy a static target under `locale_root`: the page
    /// itself (with `.md` appended when missing) and the section's `index.md`.
    pub fn candidate_files(&self, locale_root: &Path) -> Vec<PathBuf> {
        let base = self.segments.iter().fold(locale_root.to_path_buf(), |path, segment| {
            return path.join(segment.as_str());
        });
        let index = base.join(INDEX_FILE);

        let Some(last) = self.segments.last().filter(|_| return !self.section) else {
            return vec![index];
        };
        let page = if last.as_str().ends_with(MARKDOWN_EXT) {
            base
        } else {
            base.with_file_name(format!("{}{MARKDOWN_EXT}", last.as_str()))
        };
        return vec![page, index];
    }

    /// Whether the pattern's shape exists under `locale_root`. The final
    /// segment may be a file or a directory.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if a directory cannot be listed.
    pub fn matches_in(&self, locale_root: &Path) -> Result<RouteMatch, Error> {
        let mut cursor = locale_root.to_path_buf();
        for segment in &self.segments {
            let children = child_names(&cursor)?;
            let next = match segment {
                PathSegment::Literal(name) => children.iter().find(|child| return *child == name),
                PathSegment::Dynamic(_) => match dynamic_child(&children) {
                    Ok(next) => next,
                    Err(candidates) => return Ok(RouteMatch::Ambiguous { candidates, directory: cursor }),
                },
            };
            let Some(next) = next else {
                return Ok(RouteMatch::Missing);
            };
            cursor.push(next);
        }
        return Ok(RouteMatch::Found);
    }
}

/// Whether a name is a bracketed dynamic segment.
fn is_bracketed(name: &str) -> bool {
    return name.starts_with('[') && name.contains(']');
}

/// Route stem of a directory entry: a page without `.md`, a data loader
/// without its `.paths.*` suffix, a directory as is.
fn route_stem(name: &str) -> &str {
    return LOADER_SUFFIXES
        .iter()
        .chain(std::iter::once(&MARKDOWN_EXT))
        .find_map(|suffix| return name.strip_suffix(*suffix))
        .unwrap_or(name);
}

/// The bracketed entry among `children` when exactly one route stem is
/// bracketed. A directory named after the stem sorts first and is preferred.
///
/// # Errors
///
/// Returns the sorted competing stems when more than one is bracketed.
fn dynamic_child(children: &[String]) -> Result<Option<&String>, Vec<String>> {
    let mut bracketed = children.iter().filter(|name| return is_bracketed(name));
    let Some(first) = bracketed.next() else {
        return Ok(None);
    };
    let stem = route_stem(first);
    if bracketed.clone().all(|name| return route_stem(name) == stem) {
        return Ok(Some(first));
    }

    let mut stems: Vec<String> = std::iter::once(first)
        .chain(bracketed)
        .map(|name| return route_stem(name).to_string())
        .collect();
    stems.sort();
    stems.dedup();
    return Err(stems);
}

/// Sorted UTF-8 entry names of a directory. A path that is missing or not a
/// directory has no children.
///
/// # Errors
///
/// Returns `Error::Io` for any other listing failure.
fn child_names(directory: &Path) -> Result<Vec<String>, Error> {
    let entries = match std::fs::read_dir(directory) {
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => return Ok(Vec::new()),
        Err(e) => return Err(Error::Io(e)),
        Ok(entries) => entries,
    };
    let mut names = Vec::new();
    for entry in entries {
        if let Ok(name) = entry?.file_name().into_string() {
            names.push(name);
        }
    }
    names.sort();
    return Ok(names);
}

/// Whether a regular file exists at `path`.
///
/// # Errors
///
/// Returns `Error::Io` for failures other than absence.
pub fn file_exists(path: &Path) -> Result<bool, Error> {
    return match std::fs::metadata(path) {
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(false),
        Err(e) => Err(Error::Io(e)),
        Ok(meta) => Ok(meta.is_file()),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    fn matches(root: &Path, target: &str) -> RouteMatch {
        return RoutePattern::parse(target).unwrap().matches_in(root).unwrap();
    }

    #[test]
    fn parses_literal_and_dynamic_segments() {
        let pattern = RoutePattern::parse("a/./[x]/../b/[id]").unwrap();
        assert_eq!(
            pattern.segments,
            vec![
                PathSegment::Literal("a".into()),
                PathSegment::Literal("b".into()),
                PathSegment::Dynamic("[id]".into()),
            ]
        );
        assert!(RoutePattern::parse("../outside").is_none());
    }

    #[test]
    fn page_targets_try_file_and_index() {
        let root = Path::new("/docs/en");
        let pattern = RoutePattern::parse("guides/install").unwrap();
        assert_eq!(
            pattern.candidate_files(root),
            vec![root.join("guides/install.md"), root.join("guides/install/index.md")]
        );
    }

    #[test]
    fn section_and_explicit_md_targets() {
        let root = Path::new("/docs/en");
        let section = RoutePattern::parse("guides/").unwrap();
        assert_eq!(section.candidate_files(root), vec![root.join("guides/index.md")]);

        let explicit = RoutePattern::parse("guides/install.md").unwrap();
        assert_eq!(
            explicit.candidate_files(root),
            vec![root.join("guides/install.md"), root.join("guides/install.md/index.md")]
        );

        let dotted = RoutePattern::parse("releases/v1.2").unwrap();
        assert_eq!(dotted.candidate_files(root)[0], root.join("releases/v1.2.md"));

        let empty = RoutePattern::parse("").unwrap();
        assert_eq!(empty.candidate_files(root), vec![root.join("index.md")]);
    }

    #[test]
    fn placeholder_name_does_not_matter() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "cli/[command]/options.md");
        touch(dir.path(), "cli/[command]/options");

        assert_eq!(matches(dir.path(), "cli/[command]/options"), RouteMatch::Found);
        assert_eq!(matches(dir.path(), "cli/[id]/options"), RouteMatch::Found);
        assert_eq!(matches(dir.path(), "cli/[id]/flags"), RouteMatch::Missing);
    }

    #[test]
    fn bracketed_file_satisfies_final_segment() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "references/[name].md");
        assert_eq!(matches(dir.path(), "references/[slug]"), RouteMatch::Found);
        assert_eq!(matches(dir.path(), "guides/[slug]"), RouteMatch::Missing);
    }

    #[test]
    fn literal_segments_must_match_exactly() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Cli/[command].md");
        assert_eq!(matches(dir.path(), "cli/[command]"), RouteMatch::Missing);
    }

    #[test]
    fn sibling_dynamic_entries_are_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "cli/[a]/index.md");
        touch(dir.path(), "cli/[b]/index.md");
        touch(dir.path(), "cli/[b].paths.mjs");
        assert_eq!(
            matches(dir.path(), "cli/[x]"),
            RouteMatch::Ambiguous {
                candidates: vec!["[a]".into(), "[b]".into()],
                directory: dir.path().join("cli"),
            }
        );
    }

    #[test]
    fn page_and_its_data_loader_are_one_route() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "cli/[command].md");
        touch(dir.path(), "cli/[command].paths.mjs");
        touch(dir.path(), "cli/run.md");
        assert_eq!(matches(dir.path(), "cli/[command]"), RouteMatch::Found);
        assert_eq!(matches(dir.path(), "cli/[x]/flags"), RouteMatch::Missing);

        touch(dir.path(), "cli/[command]/flags.md");
        assert_eq!(matches(dir.path(), "cli/[x]/flags.md"), RouteMatch::Found);
    }

    #[test]
    fn descending_through_a_file_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "cli/[command]");
        assert_eq!(matches(dir.path(), "cli/[command]/options"), RouteMatch::Missing);
    }
}
