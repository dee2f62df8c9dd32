//! Resolution of the active language tag.
//!
//! Candidates are considered in a fixed order and the first usable one wins:
//!
//! 1. the tag supplied explicitly by the caller,
//! 2. the `LANGPACK_LANGUAGE` environment variable,
//! 3. the `language` configuration key,
//! 4. the configured default language.
//!
//! A candidate is usable when it is non-blank, parses as a BCP 47 language
//! identifier, and is installed according to the caller's existence check.

use std::env;
use std::fmt;

use log::{debug, warn};
use unic_langid::LanguageIdentifier;

/// Environment variable naming the preferred language tag.
pub const LANGUAGE_ENV: &str = "LANGPACK_LANGUAGE";

/// Where a resolved tag came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TagSource {
    /// Tag supplied explicitly by the caller.
    ExplicitArgument,
    /// Tag read from `LANGPACK_LANGUAGE`.
    EnvironmentVariable,
    /// Tag taken from configuration.
    Configuration,
    /// The configured default language.
    Default,
}

impl fmt::Display for TagSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExplicitArgument => formatter.write_str("explicit language"),
            Self::EnvironmentVariable => formatter.write_str(LANGUAGE_ENV),
            Self::Configuration => formatter.write_str("configured language"),
            Self::Default => formatter.write_str("default language"),
        }
    }
}

/// Resolved tag plus its provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TagSelection {
    tag: String,
    source: TagSource,
}

impl TagSelection {
    /// The canonical tag.
    #[must_use]
    pub const fn tag(&self) -> &str {
        self.tag.as_str()
    }

    /// Which candidate supplied the tag.
    #[must_use]
    pub const fn source(&self) -> TagSource {
        self.source
    }

    /// Whether every preferred candidate was rejected or absent.
    #[must_use]
    pub fn used_default(&self) -> bool {
        self.source == TagSource::Default
    }

    /// Consume the selection, yielding the tag.
    #[must_use]
    pub fn into_tag(self) -> String {
        self.tag
    }
}

/// Resolve the active tag from the ordered candidates.
///
/// `exists` reports whether a canonical tag is installed. The default is
/// canonicalised when possible but never checked for existence.
///
/// ```
/// use langpack::selection::{TagSource, resolve_tag};
///
/// let selection = resolve_tag(Some("de-de"), None, None, "en-GB", |tag| tag == "de-DE");
/// assert_eq!(selection.tag(), "de-DE");
/// assert_eq!(selection.source(), TagSource::ExplicitArgument);
/// ```
#[must_use]
pub fn resolve_tag<F>(
    explicit: Option<&str>,
    environment: Option<&str>,
    configuration: Option<&str>,
    default: &str,
    exists: F,
) -> TagSelection
where
    F: Fn(&str) -> bool,
{
    let candidates = [
        (TagSource::ExplicitArgument, explicit),
        (TagSource::EnvironmentVariable, environment),
        (TagSource::Configuration, configuration),
    ];

    let selection = candidates
        .into_iter()
        .find_map(|(source, raw)| try_candidate(source, raw, &exists))
        .unwrap_or_else(|| TagSelection {
            tag: canonical_tag(default).unwrap_or_else(|| default.trim().to_owned()),
            source: TagSource::Default,
        });

    debug!(
        target: "langpack::selection",
        "resolved {} to `{}`",
        selection.source,
        selection.tag,
    );
    selection
}

/// Read `LANGPACK_LANGUAGE` from the process environment.
#[must_use]
pub fn environment_tag() -> Option<String> {
    env::var(LANGUAGE_ENV).ok()
}

/// Trim whitespace and discard blank tag candidates.
#[must_use]
pub fn normalise_tag(input: Option<&str>) -> Option<&str> {
    input.map(str::trim).filter(|value| !value.is_empty())
}

/// Canonical spelling of `raw` (`en-gb` becomes `en-GB`).
///
/// Returns `None` for blank input or text that is not a language identifier.
#[must_use]
pub fn canonical_tag(raw: &str) -> Option<String> {
    let trimmed = normalise_tag(Some(raw))?;
    trimmed
        .parse::<LanguageIdentifier>()
        .ok()
        .map(|identifier| identifier.to_string())
}

fn try_candidate<F>(source: TagSource, raw: Option<&str>, exists: &F) -> Option<TagSelection>
where
    F: Fn(&str) -> bool,
{
    let candidate = normalise_tag(raw)?;

    let Some(tag) = canonical_tag(candidate) else {
        warn!(
            target: "langpack::selection",
            "skipping malformed {source} `{candidate}`",
        );
        return None;
    };

    if !exists(&tag) {
        warn!(
            target: "langpack::selection",
            "skipping {source} `{tag}`: language is not installed",
        );
        return None;
    }

    Some(TagSelection { tag, source })
}
