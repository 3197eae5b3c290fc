//! Known renamed documentation paths, consulted only to enrich reports.

use std::collections::BTreeMap;

use crate::types::LinkTarget;

/// Documentation pages that moved, as `(old target, current target)`.
const KNOWN_RENAMES: &[(&str, &str)] = &[
    ("guides/develop/build/cache", "guides/features/cache"),
    ("guides/develop/build/registry", "guides/features/registry"),
    ("guides/develop/selective-testing", "guides/features/selective-testing"),
    ("guides/develop/test/smart-runner", "guides/features/selective-testing"),
    ("guides/environments/automate/continuous-integration", "guides/integrations/continuous-integration"),
    ("guides/environments/continuous-integration", "guides/integrations/continuous-integration"),
    ("guides/features/mcp", "guides/features/agentic-coding/mcp"),
    ("guides/server/install", "guides/server/self-host/install"),
    ("guides/server/metrics", "guides/server/self-host/telemetry"),
    ("references/examples", "guides/examples/generated-projects"),
    ("server/introduction/accounts-and-projects", "guides/server/accounts-and-projects"),
    ("server/introduction/authentication", "guides/server/authentication"),
    ("server/on-premise/install", "guides/server/self-host/install"),
    ("server/on-premise/metrics", "guides/server/self-host/telemetry"),
];

/// Mapping from obsolete link targets to their replacements.
/// Passed into the reporter so tests can substitute their own fixtures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionTable {
    /// Old target string to replacement target string.
    renames: BTreeMap<String, String>,
}

impl SuggestionTable {
    /// The built-in table of known documentation renames.
    pub fn builtin() -> Self {
        let renames = KNOWN_RENAMES
            .iter()
            .map(|(old, new)| return ((*old).to_string(), (*new).to_string()))
            .collect();
        return Self { renames };
    }

    /// A table from explicit `(old, new)` pairs. Leading slashes are dropped on
    /// both sides so entries compare against normalized targets.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let renames = pairs
            .into_iter()
            .map(|(old, new)| {
                return (
                    old.as_ref().trim_start_matches('/').to_string(),
                    new.as_ref().trim_start_matches('/').to_string(),
                );
            })
            .collect();
        return Self { renames };
    }

    /// Look up the replacement for a target.
    ///
    /// An exact match wins. Otherwise a fragment-bearing target is looked up by
    /// its path, and the fragment is carried over to the suggestion.
    pub fn lookup(&self, target: &LinkTarget) -> Option<String> {
        if let Some(exact) = self.renames.get(target.as_str()) {
            return Some(exact.clone());
        }
        let fragment = target.fragment()?;
        return self
            .renames
            .get(target.path())
            .map(|replacement| return format!("{replacement}#{fragment}"));
    }
}
