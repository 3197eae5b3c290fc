//! Link registry: distinct targets with every occurrence, in scan order.

use std::collections::HashMap;

use crate::types::{LinkTarget, Occurrence};

/// One distinct target and the places that reference it.
/// Never empty: entries are only created by a first occurrence.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    /// Every occurrence, in scan order.
    pub occurrences: Vec<Occurrence>,
    /// The referenced target.
    pub target: LinkTarget,
}

/// Mapping from target to occurrences. Iteration follows first-seen order so
/// reports stay stable across runs.
#[derive(Debug, Default)]
pub struct LinkRegistry {
    /// Entries in first-seen order.
    entries: Vec<RegistryEntry>,
    /// Position of each target in `entries`.
    index: HashMap<LinkTarget, usize>,
}

impl LinkRegistry {
    /// Record one occurrence of `target`.
    pub fn insert(&mut self, target: LinkTarget, occurrence: Occurrence) {
        if let Some(entry) = self.index.get(&target).and_then(|&pos| return self.entries.get_mut(pos)) {
            entry.occurrences.push(occurrence);
            return;
        }
        self.index.insert(target.clone(), self.entries.len());
        self.entries.push(RegistryEntry { occurrences: vec![occurrence], target });
    }

    /// Whether no target has been recorded.
    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        return self.entries.iter();
    }

    /// Number of distinct targets.
    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    /// Fold a partial registry into this one, preserving both orders.
    pub fn merge(&mut self, other: Self) {
        for entry in other.entries {
            for occurrence in entry.occurrences {
                self.insert(entry.target.clone(), occurrence);
            }
        }
    }

    /// Total number of occurrences across all targets.
    pub fn occurrence_count(&self) -> usize {
        return self.entries.iter().map(|e| return e.occurrences.len()).sum();
    }
}

#[cfg(test)]
impl LinkRegistry {
    /// Look up a target's entry.
    pub fn get(&self, target: &LinkTarget) -> Option<&RegistryEntry> {
        return self.index.get(target).and_then(|&pos| return self.entries.get(pos));
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::types::Locale;

    fn occurrence(file: &str, locale: &str) -> Occurrence {
        return Occurrence { file: PathBuf::from(file), line: 1, locale: Locale(locale.into()) };
    }

    #[test]
    fn repeated_target_has_one_key_and_all_occurrences() {
        let mut registry = LinkRegistry::default();
        let target = LinkTarget::from_href("guides/install");
        registry.insert(target.clone(), occurrence("/d/en/a.md", "en"));
        registry.insert(LinkTarget::from_href("other"), occurrence("/d/en/a.md", "en"));
        registry.insert(target.clone(), occurrence("/d/es/a.md", "es"));
        registry.insert(target.clone(), occurrence("/d/es/a.md", "es"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.occurrence_count(), 4);
        assert_eq!(registry.get(&target).unwrap().occurrences.len(), 3);
    }

    #[test]
    fn fragments_are_distinct_keys() {
        let mut registry = LinkRegistry::default();
        registry.insert(LinkTarget::from_href("a/b#one"), occurrence("/d/en/x.md", "en"));
        registry.insert(LinkTarget::from_href("a/b#two"), occurrence("/d/en/x.md", "en"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn merge_keeps_first_seen_order() {
        let mut en = LinkRegistry::default();
        en.insert(LinkTarget::from_href("b"), occurrence("/d/en/x.md", "en"));
        en.insert(LinkTarget::from_href("a"), occurrence("/d/en/x.md", "en"));
        let mut es = LinkRegistry::default();
        es.insert(LinkTarget::from_href("c"), occurrence("/d/es/x.md", "es"));
        es.insert(LinkTarget::from_href("b"), occurrence("/d/es/x.md", "es"));

        en.merge(es);
        let order: Vec<_> = en.iter().map(|e| e.target.as_str().to_string()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(en.get(&LinkTarget::from_href("b")).unwrap().occurrences[1].locale.as_str(), "es");
    }
}
