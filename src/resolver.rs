use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::registry::LinkRegistry;
use crate::route::{self, RouteMatch, RoutePattern};
use crate::types::{LinkTarget, Locale};
use crate::walker;

/// Decides whether link targets exist in any locale, for one validation pass.
///
/// A target proven valid is remembered and never checked again. Validity is
/// existential: one locale holding the page is enough.
#[derive(Debug)]
pub struct Resolver {
    /// Unresolved dynamic targets with the route stems that competed.
    ambiguous: HashMap<LinkTarget, Vec<String>>,
    /// Number of targets actually checked against the filesystem.
    attempts: usize,
    /// Documentation root holding one directory per locale.
    docs_root: PathBuf,
    /// Locales to try, in order.
    locales: Vec<Locale>,
    /// Targets already proven to exist.
    validated: HashSet<LinkTarget>,
}

impl Resolver {
    /// A resolver with an empty memo.
    pub fn new(docs_root: &Path, locales: &[Locale]) -> Self {
        return Self {
            ambiguous: HashMap::new(),
            attempts: 0,
            docs_root: docs_root.to_path_buf(),
            locales: locales.to_vec(),
            validated: HashSet::new(),
        };
    }

    /// Whether `target` names a page, section, or dynamic route in some locale.
    /// A dynamic target that matches nowhere but met competing routes is
    /// recorded in `ambiguous`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the filesystem cannot be inspected.
    pub fn resolve(&mut self, target: &LinkTarget) -> Result<bool, Error> {
        if self.validated.contains(target) {
            return Ok(true);
        }
        self.attempts = self.attempts.saturating_add(1);

        let Some(pattern) = RoutePattern::parse(target.path()) else {
            tracing::debug!(%target, "target escapes the locale root");
            return Ok(false);
        };
        let found = if target.is_dynamic() {
            self.find_dynamic(&pattern, target)?
        } else {
            self.find_static(&pattern)?.cloned()
        };

        match &found {
            None => tracing::debug!(%target, "unresolved in every locale"),
            Some(locale) => {
                tracing::debug!(%target, %locale, "resolved");
                self.validated.insert(target.clone());
            },
        }
        return Ok(found.is_some());
    }

    /// Resolve every distinct target of a registry, once each.
    ///
    /// # Errors
    ///
    /// Propagates the first filesystem error; the pass is aborted.
    pub fn resolve_registry(&mut self, registry: &LinkRegistry) -> Result<(), Error> {
        for entry in registry.iter() {
            self.resolve(&entry.target)?;
        }
        return Ok(());
    }

    /// Unresolved targets that met competing dynamic routes.
    pub const fn ambiguous(&self) -> &HashMap<LinkTarget, Vec<String>> {
        return &self.ambiguous;
    }

    /// How many targets went to the filesystem (memo hits excluded).
    pub const fn resolution_attempts(&self) -> usize {
        return self.attempts;
    }

    /// Targets proven to exist so far.
    pub const fn validated(&self) -> &HashSet<LinkTarget> {
        return &self.validated;
    }

    /// First locale whose tree has the dynamic route's shape. Ambiguity in
    /// one locale does not stop the search; it is recorded only if no
    /// locale matches.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if a directory cannot be listed.
    fn find_dynamic(&mut self, pattern: &RoutePattern, target: &LinkTarget) -> Result<Option<Locale>, Error> {
        let mut competing: Option<Vec<String>> = None;
        for locale in &self.locales {
            let root = walker::locale_root(&self.docs_root, locale);
            match pattern.matches_in(&root)? {
                RouteMatch::Found => return Ok(Some(locale.clone())),
                RouteMatch::Missing => {},
                RouteMatch::Ambiguous { candidates, directory } => {
                    tracing::warn!(
                        %target,
                        %locale,
                        directory = %directory.display(),
                        ?candidates,
                        "ambiguous dynamic route"
                    );
                    if competing.is_none() {
                        competing = Some(candidates);
                    }
                },
            }
        }
        if let Some(candidates) = competing {
            self.ambiguous.insert(target.clone(), candidates);
        }
        return Ok(None);
    }

    /// First locale holding the page or its section index.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if a candidate cannot be inspected.
    fn find_static(&self, pattern: &RoutePattern) -> Result<Option<&Locale>, Error> {
        for locale in &self.locales {
            let root = walker::locale_root(&self.docs_root, locale);
            for candidate in pattern.candidate_files(&root) {
                if route::file_exists(&candidate)? {
                    return Ok(Some(locale));
                }
            }
        }
        return Ok(None);
    }
}
