//! TOML configuration for building a [`crate::Language`].
//!
//! Applications typically ship a `langpack.toml` next to their language tree:
//!
//! ```toml
//! base_path = "/srv/site"
//! language = "de-DE"
//! default_language = "en-GB"
//! debug = false
//! ```
//!
//! Every key is optional. Unknown keys are rejected so that typos surface
//! instead of silently falling back to defaults.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::selection::normalise_tag;

/// Language used when neither the caller nor the configuration names one.
pub const DEFAULT_LANGUAGE: &str = "en-GB";

/// Settings consumed by [`crate::Language::from_config`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LanguageConfig {
    /// Directory containing the `language/` tree.
    pub base_path: Utf8PathBuf,
    /// Preferred language tag.
    ///
    /// Whitespace-only values are treated as absent so templated
    /// configuration such as `language = ""` falls back cleanly.
    pub language: Option<String>,
    /// Language whose extension files stand in for missing ones.
    pub default_language: String,
    /// Whether lookups are marked up and loaded files linted.
    pub debug: bool,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            base_path: Utf8PathBuf::from("."),
            language: None,
            default_language: String::from(DEFAULT_LANGUAGE),
            debug: false,
        }
    }
}

impl LanguageConfig {
    /// Parse configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid TOML or
    /// contains unknown or mistyped keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use langpack::LanguageConfig;
    ///
    /// let config = LanguageConfig::from_toml_str("debug = true\n")?;
    /// assert!(config.debug);
    /// assert_eq!(config.default_language, "en-GB");
    /// # Ok::<(), langpack::ConfigError>(())
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|error| ConfigError::Parse {
            reason: error.to_string(),
        })
    }

    /// Read and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents are invalid.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        Self::load_with(path, |file| {
            fs::read_to_string(file).map_err(|error| ConfigError::Read {
                path: file.to_owned(),
                reason: error.to_string(),
            })
        })
    }

    /// Parse configuration text produced by `reader` for `path`.
    ///
    /// This lets tests inject file contents without touching the file system.
    ///
    /// # Errors
    ///
    /// Propagates the reader's error, or returns [`ConfigError::Parse`] for
    /// invalid contents.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use langpack::LanguageConfig;
    ///
    /// let config = LanguageConfig::load_with(Utf8Path::new("langpack.toml"), |_| {
    ///     Ok(String::from("language = \"de-DE\"\n"))
    /// })?;
    /// assert_eq!(config.language(), Some("de-DE"));
    /// # Ok::<(), langpack::ConfigError>(())
    /// ```
    pub fn load_with<F>(path: &Utf8Path, reader: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&Utf8Path) -> Result<String, ConfigError>,
    {
        let source = reader(path)?;
        Self::from_toml_str(&source)
    }

    /// The configured language, if one is set.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        normalise_tag(self.language.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(source: &str) -> LanguageConfig {
        LanguageConfig::from_toml_str(source)
            .unwrap_or_else(|error| panic!("expected configuration to parse: {error}"))
    }

    #[rstest]
    fn defaults_cover_every_key() {
        let config = parse("");

        assert_eq!(config, LanguageConfig::default());
        assert_eq!(config.base_path, ".");
        assert_eq!(config.default_language, "en-GB");
        assert!(config.language().is_none());
        assert!(!config.debug);
    }

    #[rstest]
    fn deserialises_overrides() {
        let config = parse(concat!(
            "base_path = \"/srv/site\"\n",
            "language = \"cy\"\n",
            "default_language = \"de-DE\"\n",
            "debug = true\n",
        ));

        assert_eq!(config.base_path, "/srv/site");
        assert_eq!(config.language(), Some("cy"));
        assert_eq!(config.default_language, "de-DE");
        assert!(config.debug);
    }

    #[rstest]
    #[case("language = \"\"\n")]
    #[case("language = \"   \"\n")]
    fn blank_languages_are_absent(#[case] source: &str) {
        assert!(parse(source).language().is_none());
    }

    #[rstest]
    #[case("debug = \"sometimes\"\n")]
    #[case("unexpected = true\n")]
    #[case("language = \n")]
    fn rejects_invalid_configuration(#[case] source: &str) {
        let outcome = LanguageConfig::from_toml_str(source);

        assert!(
            matches!(outcome, Err(ConfigError::Parse { .. })),
            "expected a parse error for {source:?}"
        );
    }

    #[rstest]
    fn load_with_passes_the_path_to_the_reader() {
        let config = LanguageConfig::load_with(Utf8Path::new("conf/langpack.toml"), |path| {
            assert_eq!(path, "conf/langpack.toml");
            Ok(String::from("debug = true\n"))
        });

        assert!(matches!(config, Ok(LanguageConfig { debug: true, .. })));
    }

    #[rstest]
    fn load_reports_missing_files() {
        let outcome = LanguageConfig::load(Utf8Path::new("/definitely/not/langpack.toml"));

        assert!(matches!(outcome, Err(ConfigError::Read { .. })));
    }
}
