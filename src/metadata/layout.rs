//! Filesystem implementation of [`MetadataSource`].

use std::collections::BTreeMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};

use super::{LanguageMetadata, MetadataSource, parse_manifest_str};
use crate::error::MetadataError;

const LANGUAGE_DIR: &str = "language";
const OVERRIDES_DIR: &str = "overrides";

/// Metadata source reading the conventional `language/` tree.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FsMetadata;

impl FsMetadata {
    /// Create the source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn manifest_path(directory: &Utf8Path, tag: &str) -> Utf8PathBuf {
        directory.join(format!("{tag}.xml"))
    }
}

impl MetadataSource for FsMetadata {
    fn languages_root(&self, base: &Utf8Path) -> Utf8PathBuf {
        base.join(LANGUAGE_DIR)
    }

    fn language_path(&self, base: &Utf8Path, tag: &str) -> Utf8PathBuf {
        self.languages_root(base).join(tag)
    }

    fn override_path(&self, base: &Utf8Path, tag: &str) -> Utf8PathBuf {
        self.languages_root(base)
            .join(OVERRIDES_DIR)
            .join(format!("{tag}.override.ini"))
    }

    fn exists(&self, tag: &str, base: &Utf8Path) -> bool {
        !tag.is_empty() && self.language_path(base, tag).is_dir()
    }

    fn metadata(&self, tag: &str, base: &Utf8Path) -> Option<LanguageMetadata> {
        let manifest = Self::manifest_path(&self.language_path(base, tag), tag);
        if !manifest.is_file() {
            debug!(target: "langpack::metadata", "no manifest at {manifest}");
            return None;
        }

        self.parse_xml_manifest(&manifest)
            .map_err(|error| {
                warn!(target: "langpack::metadata", "ignoring manifest for `{tag}`: {error}");
            })
            .ok()
    }

    fn known_languages(&self, base: &Utf8Path) -> BTreeMap<String, LanguageMetadata> {
        self.parse_language_files(&self.languages_root(base))
    }

    fn parse_language_files(&self, dir: &Utf8Path) -> BTreeMap<String, LanguageMetadata> {
        let entries = match dir.read_dir_utf8() {
            Ok(entries) => entries,
            Err(error) => {
                debug!(target: "langpack::metadata", "cannot list {dir}: {error}");
                return BTreeMap::new();
            }
        };

        let mut languages = BTreeMap::new();
        for entry in entries.flatten() {
            let directory = entry.path();
            if !directory.is_dir() {
                continue;
            }
            let tag = entry.file_name();
            let manifest = Self::manifest_path(directory, tag);
            if !manifest.is_file() {
                continue;
            }
            let Ok(metadata) = self.parse_xml_manifest(&manifest).map_err(|error| {
                warn!(target: "langpack::metadata", "skipping `{tag}`: {error}");
            }) else {
                continue;
            };
            languages.insert(tag.to_owned(), metadata);
        }

        languages
    }

    fn parse_xml_manifest(&self, path: &Utf8Path) -> Result<LanguageMetadata, MetadataError> {
        let source = fs::read_to_string(path).map_err(|error| MetadataError::Io {
            path: path.to_owned(),
            reason: error.to_string(),
        })?;
        parse_manifest_str(&source, path)
    }
}
