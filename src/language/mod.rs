//! The language orchestrator.
//!
//! A [`Language`] owns one [`MessageCatalogue`] for one tag and decides which
//! files feed it. Every [`Language::load`] walks the same fixed precedence:
//!
//! 1. the core file `<tag>.<format>`,
//! 2. the extension file `<extension>.<format>` when an extension is named,
//! 3. the override file supplied by the [`MetadataSource`].
//!
//! Later files overwrite earlier values for the same key. Missing files are
//! skipped; files that exist but fail to parse still contribute their
//! well-formed lines and make the load report `false`.
//!
//! Lookups never fail. In debug mode resolved strings render as `**value**`,
//! unknown keys as `??KEY??`, and every loaded file is linted.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::mem;
use std::panic::Location;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use langpack_common::{
    CORE_SCOPE, MessageCatalogue, ParseOutcome, ParserRegistry, RegistryError, mark_missing,
    mark_resolved, scan_file,
};
use log::{debug, warn};

use crate::config::{DEFAULT_LANGUAGE, LanguageConfig};
use crate::error::LanguageError;
use crate::metadata::{FsMetadata, LanguageMetadata, MetadataSource};
use crate::selection::{canonical_tag, environment_tag, normalise_tag, resolve_tag};

mod candidates;
mod escape;
mod usage;

use candidates::{Lookup, Slot};
pub use escape::TranslateOptions;
pub use usage::CallSite;

/// Progress of the most recent [`Language::load`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LoadState {
    /// No load has been attempted.
    #[default]
    NotLoaded,
    /// A load is in progress.
    Loading,
    /// Every candidate parsed cleanly.
    Loaded,
    /// At least one candidate had issues or could not be dispatched.
    Failed,
}

/// Translation strings for one language, layered from core, extension and
/// override files.
pub struct Language<M = FsMetadata> {
    registry: Arc<ParserRegistry>,
    source: M,
    base_path: Utf8PathBuf,
    tag: String,
    default_tag: String,
    debug: bool,
    metadata: Option<LanguageMetadata>,
    catalogue: MessageCatalogue,
    state: LoadState,
    usage: usage::UsageLog,
}

impl<M> fmt::Debug for Language<M> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Language")
            .field("tag", &self.tag)
            .field("default_language", &self.default_tag)
            .field("base_path", &self.base_path)
            .field("debug", &self.debug)
            .field("state", &self.state)
            .field("strings", &self.catalogue.len())
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Language<FsMetadata> {
    /// Create a language reading the conventional tree under `base_path`.
    ///
    /// Without a `tag` the default language (`en-GB`) is used. Nothing is
    /// loaded until [`Self::load`] is called.
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use langpack::{Language, ParserRegistry};
    ///
    /// let mut language = Language::new(Arc::new(ParserRegistry::with_defaults()), "/srv/site", None);
    /// language.load(None)?;
    /// assert!(!language.translate("JYES").is_empty());
    /// # Ok::<(), langpack::LanguageError>(())
    /// ```
    #[must_use]
    pub fn new(
        registry: Arc<ParserRegistry>,
        base_path: impl Into<Utf8PathBuf>,
        tag: Option<&str>,
    ) -> Self {
        Self::with_metadata_source(registry, FsMetadata::new(), base_path, tag)
    }

    /// Create a language from configuration.
    ///
    /// The tag is resolved from `LANGPACK_LANGUAGE`, then `config.language`,
    /// then `config.default_language`; see [`crate::selection`].
    #[must_use]
    pub fn from_config(registry: Arc<ParserRegistry>, config: &LanguageConfig) -> Self {
        let source = FsMetadata::new();
        let environment = environment_tag();
        let selection = resolve_tag(
            None,
            environment.as_deref(),
            config.language(),
            &config.default_language,
            |tag| source.exists(tag, &config.base_path),
        );

        let mut language = Self::with_metadata_source(
            registry,
            source,
            config.base_path.clone(),
            Some(selection.tag()),
        );
        language.set_default_language(&config.default_language);
        language.set_debug(config.debug);
        language
    }
}

impl<M: MetadataSource> Language<M> {
    /// Create a language backed by a custom metadata source.
    #[must_use]
    pub fn with_metadata_source(
        registry: Arc<ParserRegistry>,
        source: M,
        base: impl Into<Utf8PathBuf>,
        tag: Option<&str>,
    ) -> Self {
        let base_path = base.into();
        let active = normalise_tag(tag).map_or_else(
            || String::from(DEFAULT_LANGUAGE),
            |raw| canonical_tag(raw).unwrap_or_else(|| raw.to_owned()),
        );
        let metadata = source.metadata(&active, &base_path);

        Self {
            registry,
            source,
            base_path,
            catalogue: MessageCatalogue::new(active.clone()),
            tag: active,
            default_tag: String::from(DEFAULT_LANGUAGE),
            debug: false,
            metadata,
            state: LoadState::NotLoaded,
            usage: usage::UsageLog::default(),
        }
    }

    // Loading.

    /// Load the core file and, when `extension` is given, that extension's
    /// file, followed by the override file.
    ///
    /// Returns `Ok(true)` when every file found parsed without issues.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageError::UnknownFormat`] when a candidate (usually the
    /// override) has an extension no parser claims. Files merged before the
    /// failure stay merged.
    pub fn load(&mut self, extension: Option<&str>) -> Result<bool, LanguageError> {
        self.state = LoadState::Loading;
        let scope = extension.unwrap_or(CORE_SCOPE);
        self.catalogue.begin_scope(CORE_SCOPE);
        self.catalogue.begin_scope(scope);

        let candidates = Lookup {
            registry: &self.registry,
            source: &self.source,
            base: &self.base_path,
            tag: &self.tag,
            default_tag: &self.default_tag,
        }
        .candidates(extension);

        let mut clean = true;
        for candidate in candidates {
            let target = match candidate.slot {
                Slot::Core => CORE_SCOPE,
                Slot::Extension | Slot::Override => scope,
            };
            match self.load_file(&candidate.path, target) {
                Ok(parsed) => clean &= parsed,
                Err(error) => {
                    self.state = LoadState::Failed;
                    return Err(error);
                }
            }
        }

        self.state = if clean {
            LoadState::Loaded
        } else {
            LoadState::Failed
        };
        Ok(clean)
    }

    /// Parse `path` and merge its entries under `extension`.
    ///
    /// Returns `Ok(false)` when the file had parse issues; its well-formed
    /// entries are merged regardless. Unreadable files merge nothing.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageError::UnknownFormat`] when no parser claims the
    /// file's extension.
    pub fn load_file(&mut self, path: &Utf8Path, extension: &str) -> Result<bool, LanguageError> {
        self.catalogue.begin_scope(extension);
        let outcome = self.parse(path)?;
        if outcome.is_unreadable() {
            return Ok(false);
        }

        let clean = outcome.is_clean();
        let merged = self
            .catalogue
            .merge_in(extension, path, outcome.into_entries());
        debug!(
            target: "langpack::language",
            "merged {merged} string(s) from {path} into `{extension}`",
        );
        Ok(clean)
    }

    /// Parse `path` with the parser registered for its extension.
    ///
    /// Files with issues are recorded as error files. In debug mode the file
    /// is linted as well.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageError::UnknownFormat`] when no parser claims the
    /// file's extension.
    pub fn parse(&mut self, path: &Utf8Path) -> Result<ParseOutcome, LanguageError> {
        let format = path.extension().unwrap_or_default();
        let parser = self
            .registry
            .get(format)
            .map_err(|RegistryError::NotFound { extension }| LanguageError::UnknownFormat {
                extension,
                path: path.to_owned(),
            })?;

        let outcome = parser.parse_file(path);
        if !outcome.is_clean() {
            let summary = outcome.summary();
            warn!(target: "langpack::language", "{path}: {summary}");
            self.catalogue.record_error(path, summary);
        }

        if self.debug {
            self.debug_file(path);
        }
        Ok(outcome)
    }

    /// Lint `path`, returning the number of defective lines.
    ///
    /// A file with defects is recorded as an error file.
    pub fn debug_file(&mut self, path: &Utf8Path) -> usize {
        let report = scan_file(path);
        let count = report.defect_count();
        if count > 0 {
            let summary = report.summary();
            warn!(target: "langpack::language", "{path}: {summary}");
            self.catalogue.record_error(path, summary);
        }
        count
    }

    /// Progress of the most recent load.
    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    // Lookup.

    /// Translate `key` with [`TranslateOptions::default`].
    #[track_caller]
    pub fn translate(&mut self, key: &str) -> String {
        self.translate_with(key, TranslateOptions::default())
    }

    /// Shorthand for [`Self::translate`].
    #[track_caller]
    pub fn tr(&mut self, key: &str) -> String {
        self.translate_with(key, TranslateOptions::default())
    }

    /// Translate `key`, post-processing the result according to `options`.
    ///
    /// An empty key yields an empty string without a lookup. An unknown key
    /// yields the key itself, or `??KEY??` in debug mode.
    #[track_caller]
    pub fn translate_with(&mut self, key: &str, options: TranslateOptions) -> String {
        if key.is_empty() {
            return String::new();
        }

        let resolved = self.catalogue.get(key).map(ToOwned::to_owned);
        let text = if self.debug {
            self.usage
                .record(key, resolved.is_some(), CallSite::from(Location::caller()));
            resolved.map_or_else(|| mark_missing(key), |value| mark_resolved(&value))
        } else {
            resolved.unwrap_or_else(|| key.to_owned())
        };

        escape::apply(text, options)
    }

    /// Whether `key` resolves, without recording usage.
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.catalogue.has(key)
    }

    /// Keys looked up so far.
    #[must_use]
    pub const fn used(&self) -> &BTreeSet<String> {
        self.catalogue.used()
    }

    /// Loaded keys never looked up.
    #[must_use]
    pub fn orphans(&self) -> BTreeSet<&str> {
        self.catalogue.orphans()
    }

    /// Where each debug-mode lookup of `key` came from.
    #[must_use]
    pub fn call_sites(&self, key: &str) -> Vec<CallSite> {
        self.usage.call_sites(key)
    }

    /// Keys that failed to resolve in debug mode, with their call sites.
    #[must_use]
    pub const fn unresolved(&self) -> &BTreeMap<String, Vec<CallSite>> {
        self.usage.unresolved()
    }

    /// Files merged for every scope.
    #[must_use]
    pub const fn paths(&self) -> &BTreeMap<String, Vec<Utf8PathBuf>> {
        self.catalogue.paths()
    }

    /// Files merged for `extension`; `None` until a load for it starts.
    #[must_use]
    pub fn paths_for(&self, extension: &str) -> Option<&[Utf8PathBuf]> {
        self.catalogue.paths_for(extension)
    }

    /// Files that failed to parse or lint cleanly.
    #[must_use]
    pub const fn error_files(&self) -> &BTreeMap<Utf8PathBuf, String> {
        self.catalogue.error_files()
    }

    /// The underlying catalogue.
    #[must_use]
    pub const fn catalogue(&self) -> &MessageCatalogue {
        &self.catalogue
    }

    // Settings.

    /// Active language tag.
    #[must_use]
    pub const fn tag(&self) -> &str {
        self.tag.as_str()
    }

    /// Alias of [`Self::tag`].
    #[must_use]
    pub const fn language(&self) -> &str {
        self.tag.as_str()
    }

    /// Directory containing the `language/` tree.
    #[must_use]
    pub fn base_path(&self) -> &Utf8Path {
        &self.base_path
    }

    /// Language whose extension files stand in for missing ones.
    #[must_use]
    pub const fn default_language(&self) -> &str {
        self.default_tag.as_str()
    }

    /// Replace the default language, returning the previous one.
    pub fn set_default_language(&mut self, tag: &str) -> String {
        let canonical = canonical_tag(tag).unwrap_or_else(|| tag.trim().to_owned());
        mem::replace(&mut self.default_tag, canonical)
    }

    /// Whether debug mode is on.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Switch debug mode, returning the previous setting.
    pub const fn set_debug(&mut self, debug: bool) -> bool {
        mem::replace(&mut self.debug, debug)
    }

    // Cached metadata.

    /// Manifest metadata read at construction, if any.
    #[must_use]
    pub const fn metadata(&self) -> Option<&LanguageMetadata> {
        self.metadata.as_ref()
    }

    /// Human-readable name of the language.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(LanguageMetadata::name)
    }

    /// Whether the language is written right to left.
    #[must_use]
    pub fn is_rtl(&self) -> bool {
        self.metadata.as_ref().is_some_and(LanguageMetadata::is_rtl)
    }

    /// System locale names declared by the manifest.
    #[must_use]
    pub fn locale(&self) -> Vec<String> {
        self.metadata
            .as_ref()
            .map(LanguageMetadata::locale)
            .unwrap_or_default()
    }

    /// First day of the week, `0` being Sunday.
    #[must_use]
    pub fn first_day(&self) -> u8 {
        self.metadata.as_ref().map_or(0, LanguageMetadata::first_day)
    }

    /// Comma-separated weekend day numbers, `0,6` unless declared.
    #[must_use]
    pub fn weekend(&self) -> &str {
        self.metadata
            .as_ref()
            .map_or("0,6", LanguageMetadata::weekend)
    }

    /// Manifest value for `key`, or `default` when undeclared.
    #[must_use]
    pub fn metadata_value<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.get(key))
            .unwrap_or(default)
    }

    // Delegation to the metadata source.

    /// Whether `tag` is installed under `base`.
    #[must_use]
    pub fn exists(&self, tag: &str, base: &Utf8Path) -> bool {
        self.source.exists(tag, base)
    }

    /// Manifest metadata for `tag` under `base`.
    #[must_use]
    pub fn metadata_for(&self, tag: &str, base: &Utf8Path) -> Option<LanguageMetadata> {
        self.source.metadata(tag, base)
    }

    /// Installed languages under `base`.
    #[must_use]
    pub fn known_languages(&self, base: &Utf8Path) -> BTreeMap<String, LanguageMetadata> {
        self.source.known_languages(base)
    }

    /// Directory holding the language subdirectories under `base`.
    #[must_use]
    pub fn language_path(&self, base: &Utf8Path) -> Utf8PathBuf {
        self.source.languages_root(base)
    }

    /// Language directories directly below `dir`.
    #[must_use]
    pub fn parse_language_files(&self, dir: &Utf8Path) -> BTreeMap<String, LanguageMetadata> {
        self.source.parse_language_files(dir)
    }

    /// Read the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageError::Metadata`] when the manifest is unusable.
    pub fn parse_xml_manifest(&self, path: &Utf8Path) -> Result<LanguageMetadata, LanguageError> {
        Ok(self.source.parse_xml_manifest(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetadataError;
    use crate::metadata::MockMetadataSource;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    const BASE: &str = "/srv/site";

    fn quiet_source() -> MockMetadataSource {
        let mut source = MockMetadataSource::new();
        source.expect_metadata().returning(|_, _| None);
        source
    }

    fn language_with(source: MockMetadataSource) -> Language<MockMetadataSource> {
        Language::with_metadata_source(
            Arc::new(ParserRegistry::with_defaults()),
            source,
            BASE,
            Some("en-GB"),
        )
    }

    struct Site {
        _root: TempDir,
        language: Language,
    }

    impl Site {
        fn write(&self, relative: &str, contents: impl AsRef<[u8]>) -> Utf8PathBuf {
            let path = self.language.base_path().join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap_or_else(|error| panic!("mkdir {parent}: {error}"));
            }
            fs::write(&path, contents).unwrap_or_else(|error| panic!("write {path}: {error}"));
            path
        }
    }

    #[fixture]
    fn site() -> Site {
        let root = TempDir::new().unwrap_or_else(|error| panic!("tempdir: {error}"));
        let base = Utf8PathBuf::from_path_buf(root.path().to_path_buf())
            .unwrap_or_else(|path| panic!("non UTF-8 temp path {}", path.display()));
        let language = Language::new(Arc::new(ParserRegistry::with_defaults()), base, None);
        Site {
            _root: root,
            language,
        }
    }

    #[rstest]
    fn construction_caches_metadata_from_the_source() {
        let mut source = MockMetadataSource::new();
        source
            .expect_metadata()
            .withf(|tag: &str, base: &Utf8Path| tag == "en-GB" && base == BASE)
            .times(1)
            .returning(|_, _| {
                Some(
                    [(String::from("name"), String::from("English (United Kingdom)"))]
                        .into_iter()
                        .collect(),
                )
            });

        let language = language_with(source);

        assert_eq!(language.name(), Some("English (United Kingdom)"));
        assert_eq!(language.metadata_value("missing", "fallback"), "fallback");
    }

    #[rstest]
    fn existence_checks_are_forwarded() {
        let mut source = quiet_source();
        source
            .expect_exists()
            .withf(|tag: &str, base: &Utf8Path| tag == "de-DE" && base == "/elsewhere")
            .times(1)
            .returning(|_, _| true);

        let language = language_with(source);

        assert!(language.exists("de-DE", Utf8Path::new("/elsewhere")));
    }

    #[rstest]
    fn language_path_is_the_source_root() {
        let mut source = quiet_source();
        source
            .expect_languages_root()
            .returning(|base| base.join("lang"));

        let language = language_with(source);

        assert_eq!(language.language_path(Utf8Path::new(BASE)), "/srv/site/lang");
    }

    #[rstest]
    fn manifest_errors_are_wrapped() {
        let mut source = quiet_source();
        source.expect_parse_xml_manifest().returning(|path| {
            Err(MetadataError::InvalidRoot {
                path: path.to_owned(),
                found: String::from("extension"),
            })
        });

        let language = language_with(source);
        let error = language.parse_xml_manifest(Utf8Path::new("x.xml")).err();

        assert!(matches!(
            error,
            Some(LanguageError::Metadata(MetadataError::InvalidRoot { .. }))
        ));
    }

    #[rstest]
    fn unknown_tags_keep_their_spelling() {
        let language = Language::with_metadata_source(
            Arc::new(ParserRegistry::with_defaults()),
            quiet_source(),
            BASE,
            Some("  not a tag! "),
        );

        assert_eq!(language.tag(), "not a tag!");
    }

    #[rstest]
    fn state_tracks_the_last_load(mut site: Site) {
        assert_eq!(site.language.state(), LoadState::NotLoaded);

        site.write("language/en-GB/en-GB.ini", "FOO=\"Bar\"\n");
        assert_eq!(site.language.load(None), Ok(true));
        assert_eq!(site.language.state(), LoadState::Loaded);

        site.write("language/en-GB/broken.ini", "FOO=\"Bar\n");
        assert_eq!(site.language.load(Some("broken")), Ok(false));
        assert_eq!(site.language.state(), LoadState::Failed);
    }

    #[rstest]
    fn unregistered_formats_are_configuration_errors(mut site: Site) {
        site.write("language/en-GB/en-GB.ini", "FOO=\"Bar\"\n");
        let stray = site.write("language/en-GB/notes.txt", "");

        let error = site.language.load_file(&stray, "notes").err();

        assert_eq!(
            error,
            Some(LanguageError::UnknownFormat {
                extension: String::from("txt"),
                path: stray,
            })
        );
    }

    #[rstest]
    fn debug_lookups_record_call_sites(mut site: Site) {
        site.write("language/en-GB/en-GB.ini", "FOO=\"Bar\"\n");
        assert_eq!(site.language.load(None), Ok(true));
        site.language.set_debug(true);

        let line = line!() + 1;
        let resolved = site.language.translate("foo");
        let missing = site.language.tr("NOPE");

        assert_eq!(resolved, "**Bar**");
        assert_eq!(missing, "??NOPE??");
        let sites = site.language.call_sites("FOO");
        assert_eq!(sites.len(), 1);
        assert!(sites.iter().all(|call| call.line() == line && call.file().ends_with("mod.rs")));
        assert_eq!(
            site.language.unresolved().keys().collect::<Vec<_>>(),
            vec!["NOPE"]
        );
    }

    #[rstest]
    fn lookups_outside_debug_mode_are_not_logged(mut site: Site) {
        assert_eq!(site.language.translate("NOPE"), "NOPE");

        assert!(site.language.call_sites("NOPE").is_empty());
        assert!(site.language.used().contains("NOPE"));
    }

    #[rstest]
    fn debug_parsing_lints_the_file(mut site: Site) {
        // Parses cleanly; the lone `%` only trips the linter.
        let path = site.write("language/en-GB/en-GB.ini", "RATE=\"50% off\"\n");
        site.language.set_debug(true);

        let outcome = site.language.parse(&path);

        assert!(outcome.is_ok_and(|parsed| parsed.is_clean()));
        assert_eq!(
            site.language.error_files().get(&path).map(String::as_str),
            Some("error(s) in line(s) 1")
        );
    }

    #[rstest]
    fn unreadable_files_fail_the_load_without_merging(mut site: Site) {
        site.write("language/en-GB/en-GB.ini", "FOO=\"Bar\"\n");
        let latin = site.write("language/en-GB/latin.ini", b"OTHER=\"caf\xe9\"\n");

        assert_eq!(site.language.load(Some("latin")), Ok(false));

        assert_eq!(site.language.state(), LoadState::Failed);
        assert!(
            site.language
                .error_files()
                .get(&latin)
                .is_some_and(|reason| reason.contains("unable to read")),
            "{:?}",
            site.language.error_files()
        );
        assert_eq!(site.language.paths_for("latin"), Some(&[][..]));
        assert!(!site.language.has_key("OTHER"));
        assert_eq!(site.language.translate("FOO"), "Bar");
    }

    #[rstest]
    fn unclaimed_override_formats_fail_the_load() {
        let root = TempDir::new().unwrap_or_else(|error| panic!("tempdir: {error}"));
        let dir = Utf8PathBuf::from_path_buf(root.path().to_path_buf())
            .unwrap_or_else(|path| panic!("non UTF-8 temp path {}", path.display()));
        fs::write(dir.join("en-GB.ini"), "FOO=\"Bar\"\n")
            .unwrap_or_else(|error| panic!("write core file: {error}"));
        let stray = dir.join("en-GB.override.txt");
        fs::write(&stray, "FOO=\"Replaced\"\n")
            .unwrap_or_else(|error| panic!("write {stray}: {error}"));

        let mut source = quiet_source();
        let core_dir = dir.clone();
        source
            .expect_language_path()
            .withf(|base: &Utf8Path, tag: &str| base == BASE && tag == "en-GB")
            .returning(move |_, _| core_dir.clone());
        let override_file = stray.clone();
        source
            .expect_override_path()
            .times(1)
            .returning(move |_, _| override_file.clone());
        let mut language = language_with(source);

        let outcome = language.load(None);

        assert_eq!(
            outcome,
            Err(LanguageError::UnknownFormat {
                extension: String::from("txt"),
                path: stray,
            })
        );
        assert_eq!(language.state(), LoadState::Failed);
        assert_eq!(language.translate("FOO"), "Bar");
    }

    #[rstest]
    fn debug_output_summarises_the_language() {
        let language = language_with(quiet_source());

        let rendered = format!("{language:?}");

        assert!(rendered.starts_with("Language { tag: \"en-GB\""), "{rendered}");
        assert!(rendered.contains("state: NotLoaded"), "{rendered}");
        assert!(rendered.contains("registry: ParserRegistry"), "{rendered}");
        assert!(rendered.ends_with(", .. }"), "{rendered}");
    }
}
