//! Layered translation catalogues.
//!
//! A [`Language`] resolves translation keys for one language tag by merging
//! a core file, per-extension files, and an override file into a single
//! [`MessageCatalogue`], last writer winning. File formats plug in through the
//! [`ParserRegistry`]; the bundled [`IniParser`] reads `KEY="value"` files.
//! Debug mode marks up lookups and lints every file it loads.
//!
//! ```no_run
//! use std::sync::Arc;
//! use camino::Utf8Path;
//! use langpack::{Language, LanguageConfig, ParserRegistry};
//!
//! let config = LanguageConfig::load(Utf8Path::new("langpack.toml"))?;
//! let mut language = Language::from_config(Arc::new(ParserRegistry::with_defaults()), &config);
//! language.load(Some("com_admin"))?;
//! let title = language.translate("COM_ADMIN_TITLE");
//! # let _ = title;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod language;
pub mod metadata;
pub mod selection;

pub use config::{DEFAULT_LANGUAGE, LanguageConfig};
pub use error::{ConfigError, LanguageError, MetadataError};
pub use langpack_common::{
    CORE_SCOPE, DefectKind, FormatParser, IniParser, LintReport, MessageCatalogue, ParseIssue,
    ParseOutcome, ParserRegistry, RegistryError,
};
pub use language::{CallSite, Language, LoadState, TranslateOptions};
pub use metadata::{FsMetadata, LanguageMetadata, MetadataSource};
pub use selection::{TagSelection, TagSource, resolve_tag};
