//! Step parameter types for scenarios that mention language tags.

use std::convert::Infallible;
use std::str::FromStr;

/// A tag as spelled in a feature file.
///
/// Double-quoted spellings keep their inner text untouched, so scenarios can
/// pass blank or padded values such as `"   "`. Bare spellings are trimmed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeatureTag(String);

impl FromStr for FeatureTag {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(Self(unquote(input).to_owned()))
    }
}

impl FeatureTag {
    /// The tag text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Comma-separated tags, e.g. `en-GB, de-DE, cy`. The word `none` stands for
/// an empty list.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TagList(Vec<String>);

impl FromStr for TagList {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.trim() == "none" {
            return Ok(Self::default());
        }
        let tags = input
            .split(',')
            .map(|item| unquote(item).to_owned())
            .collect();
        Ok(Self(tags))
    }
}

impl TagList {
    /// Tags in the order written.
    pub fn tags(&self) -> &[String] {
        &self.0
    }
}

fn unquote(input: &str) -> &str {
    let trimmed = input.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed)
}
