//! Language discovery and manifest metadata.
//!
//! The orchestrator never inspects the language tree itself: it asks a
//! [`MetadataSource`] where things live and what a language declares about
//! itself. [`FsMetadata`] implements the conventional on-disk layout:
//!
//! ```text
//! <base>/language/
//! ├── en-GB/
//! │   ├── en-GB.xml      manifest
//! │   ├── en-GB.ini      core strings
//! │   └── com_admin.ini  extension strings
//! └── overrides/
//!     └── en-GB.override.ini
//! ```

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::MetadataError;

mod layout;
mod xml;

pub use layout::FsMetadata;
pub use xml::parse_manifest_str;

const DEFAULT_WEEKEND: &str = "0,6";

/// Name → text pairs declared in a language manifest's `<metadata>` block.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LanguageMetadata {
    values: BTreeMap<String, String>,
}

impl LanguageMetadata {
    /// Wrap already extracted manifest values.
    #[must_use]
    pub const fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    /// Raw value for `key`, if declared.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Every declared value.
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Human-readable language name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    /// Declared language tag.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.get("tag")
    }

    /// Whether the language is written right to left (`<rtl>1</rtl>`).
    #[must_use]
    pub fn is_rtl(&self) -> bool {
        self.get("rtl").is_some_and(|value| value.trim() == "1")
    }

    /// System locale names, split on commas and trimmed.
    #[must_use]
    pub fn locale(&self) -> Vec<String> {
        self.get("locale")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(ToOwned::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First day of the week, `0` being Sunday.
    #[must_use]
    pub fn first_day(&self) -> u8 {
        self.get("firstDay")
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Comma-separated weekend day numbers.
    #[must_use]
    pub fn weekend(&self) -> &str {
        self.get("weekEnd").unwrap_or(DEFAULT_WEEKEND)
    }
}

impl FromIterator<(String, String)> for LanguageMetadata {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Read-only view of the installed languages.
///
/// Implementations answer questions about layout and metadata; they never
/// load translation strings.
#[cfg_attr(test, mockall::automock)]
pub trait MetadataSource {
    /// Directory holding one subdirectory per language tag.
    fn languages_root(&self, base: &Utf8Path) -> Utf8PathBuf;

    /// Directory holding the files for `tag`.
    fn language_path(&self, base: &Utf8Path, tag: &str) -> Utf8PathBuf;

    /// Override file layered over every load for `tag`.
    fn override_path(&self, base: &Utf8Path, tag: &str) -> Utf8PathBuf;

    /// Whether `tag` is installed under `base`.
    fn exists(&self, tag: &str, base: &Utf8Path) -> bool;

    /// Manifest metadata for `tag`, if the language is installed.
    fn metadata(&self, tag: &str, base: &Utf8Path) -> Option<LanguageMetadata>;

    /// Every installed language under `base`, keyed by tag.
    fn known_languages(&self, base: &Utf8Path) -> BTreeMap<String, LanguageMetadata>;

    /// Every language directory directly below `dir`, keyed by tag.
    fn parse_language_files(&self, dir: &Utf8Path) -> BTreeMap<String, LanguageMetadata>;

    /// Read the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`MetadataError`] when the manifest cannot be read, is not
    /// well-formed, or is not rooted at `metafile`.
    fn parse_xml_manifest(&self, path: &Utf8Path) -> Result<LanguageMetadata, MetadataError>;
}
