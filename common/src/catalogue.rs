//! Overlay store for resolved translation strings.
//!
//! # Invariants
//!
//! 1. **Last writer wins**: merging a mapping overwrites any value already
//!    held for the same key, so merge order encodes precedence.
//! 2. **Monotonic accounting**: the catalogue never forgets. Entries, used
//!    keys, loaded paths, and error files only grow for the catalogue's life.
//! 3. **Scope provenance**: [`MessageCatalogue::paths_for`] is `None` exactly
//!    when no load was ever started for that scope.

use std::collections::{BTreeMap, BTreeSet};

use camino::{Utf8Path, Utf8PathBuf};

/// Scope name used when loading the core language file alone.
pub const CORE_SCOPE: &str = "core";

/// Fold a translation key into its canonical (uppercase) form.
///
/// ```
/// use langpack_common::canonical_key;
///
/// assert_eq!(canonical_key("com_admin.title"), "COM_ADMIN.TITLE");
/// ```
#[must_use]
pub fn canonical_key(key: &str) -> String {
    key.to_uppercase()
}

/// Key → string overlay with usage, provenance, and error tracking.
#[derive(Clone, Debug, Default)]
pub struct MessageCatalogue {
    tag: String,
    strings: BTreeMap<String, String>,
    used: BTreeSet<String>,
    paths: BTreeMap<String, Vec<Utf8PathBuf>>,
    error_files: BTreeMap<Utf8PathBuf, String>,
}

impl MessageCatalogue {
    /// Create an empty catalogue for the language `tag`.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Language tag the catalogue holds strings for.
    #[must_use]
    pub const fn tag(&self) -> &str {
        self.tag.as_str()
    }

    /// Record that a load for `scope` has started.
    ///
    /// After this call [`Self::paths_for`] returns an (initially empty) list
    /// for the scope even if no file ends up contributing.
    pub fn begin_scope(&mut self, scope: &str) {
        self.paths.entry(scope.to_owned()).or_default();
    }

    /// Merge `entries` read from `source` on behalf of `scope`.
    ///
    /// Existing values for the same keys are replaced. `source` is appended to
    /// the scope's path list unless it is already present. Returns the number
    /// of entries merged.
    pub fn merge_in<I>(&mut self, scope: &str, source: &Utf8Path, entries: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut merged = 0;
        for (key, value) in entries {
            self.strings.insert(canonical_key(&key), value);
            merged += 1;
        }

        let paths = self.paths.entry(scope.to_owned()).or_default();
        if !paths.iter().any(|known| known == source) {
            paths.push(source.to_owned());
        }

        merged
    }

    /// Look up `key`, recording it as used.
    #[must_use = "lookups record usage; use `has` for a side-effect free probe"]
    pub fn get(&mut self, key: &str) -> Option<&str> {
        let canonical = canonical_key(key);
        let value = self.strings.get(&canonical).map(String::as_str);
        self.used.insert(canonical);
        value
    }

    /// Whether `key` resolves, without recording usage.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.strings.contains_key(&canonical_key(key))
    }

    /// Keys that were looked up through [`Self::get`].
    #[must_use]
    pub const fn used(&self) -> &BTreeSet<String> {
        &self.used
    }

    /// Keys held by the catalogue that were never looked up.
    #[must_use]
    pub fn orphans(&self) -> BTreeSet<&str> {
        self.strings
            .keys()
            .filter(|key| !self.used.contains(*key))
            .map(String::as_str)
            .collect()
    }

    /// Record `path` as a file that failed to load cleanly.
    ///
    /// The first description recorded for a path is kept. Returns `true` when
    /// the path was not already known.
    pub fn record_error(&mut self, path: &Utf8Path, description: impl Into<String>) -> bool {
        if self.error_files.contains_key(path) {
            return false;
        }
        self.error_files.insert(path.to_owned(), description.into());
        true
    }

    /// Files that failed to load cleanly, with their descriptions.
    #[must_use]
    pub const fn error_files(&self) -> &BTreeMap<Utf8PathBuf, String> {
        &self.error_files
    }

    /// Paths successfully merged for `scope`, in merge order.
    #[must_use]
    pub fn paths_for(&self, scope: &str) -> Option<&[Utf8PathBuf]> {
        self.paths.get(scope).map(Vec::as_slice)
    }

    /// Every scope's merged paths.
    #[must_use]
    pub const fn paths(&self) -> &BTreeMap<String, Vec<Utf8PathBuf>> {
        &self.paths
    }

    /// Number of distinct keys held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the catalogue holds no strings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
