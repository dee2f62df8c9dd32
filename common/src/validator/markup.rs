//! Visual markers applied to lookups while debug mode is on.

use crate::catalogue::canonical_key;

/// Wrap a resolved translation, e.g. `Bar` becomes `**Bar**`.
///
/// ```
/// use langpack_common::mark_resolved;
///
/// assert_eq!(mark_resolved("Bar"), "**Bar**");
/// ```
#[must_use]
pub fn mark_resolved(value: &str) -> String {
    format!("**{value}**")
}

/// Render a key with no translation, e.g. `bar` becomes `??BAR??`.
///
/// ```
/// use langpack_common::mark_missing;
///
/// assert_eq!(mark_missing("bar"), "??BAR??");
/// ```
#[must_use]
pub fn mark_missing(key: &str) -> String {
    format!("??{}??", canonical_key(key))
}
