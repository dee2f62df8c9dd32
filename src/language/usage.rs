//! Call-site log kept while debug mode is on.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::Location;

use langpack_common::canonical_key;

/// Source location of a translation request.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CallSite {
    file: &'static str,
    line: u32,
    column: u32,
}

impl CallSite {
    /// Source file of the caller.
    #[must_use]
    pub const fn file(&self) -> &'static str {
        self.file
    }

    /// One-based line of the caller.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// One-based column of the caller.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Clone, Debug, Default)]
pub(super) struct UsageLog {
    resolved: BTreeMap<String, Vec<CallSite>>,
    unresolved: BTreeMap<String, Vec<CallSite>>,
}

impl UsageLog {
    pub(super) fn record(&mut self, key: &str, resolved: bool, site: CallSite) {
        let table = if resolved {
            &mut self.resolved
        } else {
            &mut self.unresolved
        };
        table.entry(canonical_key(key)).or_default().push(site);
    }

    pub(super) fn call_sites(&self, key: &str) -> Vec<CallSite> {
        let canonical = canonical_key(key);
        self.resolved
            .get(&canonical)
            .into_iter()
            .chain(self.unresolved.get(&canonical))
            .flatten()
            .copied()
            .collect()
    }

    pub(super) const fn unresolved(&self) -> &BTreeMap<String, Vec<CallSite>> {
        &self.unresolved
    }
}
