/// Core domain types for doclinks: locales, link targets, occurrences.
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// A supported locale code such as `en` or `zh_Hans`.
/// Each locale owns a direct child directory of the documentation root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Locale(
    /// The locale code, identical to its directory name.
    pub String,
);

impl Locale {
    /// The locale code as a string slice.
    pub fn as_str(&self) -> &str {
        return &self.0;
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(&self.0);
    }
}

/// The `href` value of a `LocalizedLink`, relative to a locale root.
/// Equality is by exact string, fragment included. Resolution ignores the fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LinkTarget(
    /// The normalized target string.
    pub String,
);

impl LinkTarget {
    /// Normalize a raw `href` value: trim whitespace and leading slashes.
    pub fn from_href(raw: &str) -> Self {
        return Self(raw.trim().trim_start_matches('/').to_string());
    }

    /// The full target string.
    pub fn as_str(&self) -> &str {
        return &self.0;
    }

    /// The anchor fragment after `#`, if any.
    pub fn fragment(&self) -> Option<&str> {
        return self.0.split_once('#').map(|(_, fragment)| return fragment);
    }

    /// A dynamic route has both `[` and `]` somewhere in its path portion.
    pub fn is_dynamic(&self) -> bool {
        let path = self.path();
        return path.contains('[') && path.contains(']');
    }

    /// The path portion, with any anchor fragment removed.
    pub fn path(&self) -> &str {
        return match self.0.split_once('#') {
            None => &self.0,
            Some((path, _)) => path,
        };
    }
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(&self.0);
    }
}

/// One physical `LocalizedLink` in a markdown file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    /// Absolute path of the markdown file containing the link.
    pub file: PathBuf,
    /// One-based line number of the link tag.
    pub line: u32,
    /// Locale whose tree contains the file.
    pub locale: Locale,
}
