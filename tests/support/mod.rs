//! Shared helpers for the integration suites.
//!
//! `fixture_base` locates the bundled language tree under
//! `tests/fixtures/data`. The `tag` module holds the step parameter types
//! used by the tag-related features.
pub mod tag;

use std::sync::Arc;

use camino::Utf8PathBuf;
use langpack::{Language, ParserRegistry};

/// Directory holding the fixture `language/` tree.
pub fn fixture_base() -> Utf8PathBuf {
    Utf8PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/data"))
}

/// A language over the fixture tree with the default registry, nothing loaded.
pub fn fixture_language(tag: Option<&str>) -> Language {
    Language::new(Arc::new(ParserRegistry::with_defaults()), fixture_base(), tag)
}
