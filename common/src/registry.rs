//! Extension-keyed registry of file-format parsers.
//!
//! Registering a parser claims every extension it declares. A later
//! registration for an extension that is already claimed replaces the earlier
//! parser, which lets callers substitute formats without rebuilding the
//! registry.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use log::debug;
use thiserror::Error;

use crate::parser::{FormatParser, IniParser};

/// Error raised when no parser claims an extension.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum RegistryError {
    /// No parser is registered for the extension.
    #[error("no parser registered for `.{extension}` files")]
    NotFound {
        /// The normalised extension that was requested.
        extension: String,
    },
}

/// Mapping from file extension to the parser handling it.
#[derive(Clone, Default)]
pub struct ParserRegistry {
    parsers: BTreeMap<String, Arc<dyn FormatParser>>,
}

impl ParserRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the bundled [`IniParser`].
    ///
    /// ```
    /// use langpack_common::ParserRegistry;
    ///
    /// let registry = ParserRegistry::with_defaults();
    /// assert!(registry.has("ini"));
    /// assert!(registry.has(".INI"));
    /// ```
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.add(IniParser::new());
        registry
    }

    /// Register `parser` under every extension it declares.
    pub fn add<P>(&mut self, parser: P)
    where
        P: FormatParser + 'static,
    {
        let shared: Arc<dyn FormatParser> = Arc::new(parser);
        self.add_shared(&shared);
    }

    /// Register an already shared parser under every extension it declares.
    pub fn add_shared(&mut self, parser: &Arc<dyn FormatParser>) {
        for extension in parser.extensions() {
            let key = normalise_extension(extension);
            if self.parsers.insert(key.clone(), Arc::clone(parser)).is_some() {
                debug!(
                    target: "langpack_common::registry",
                    "replaced the parser registered for `.{key}` files",
                );
            }
        }
    }

    /// Whether a parser claims `extension`.
    #[must_use]
    pub fn has(&self, extension: &str) -> bool {
        self.parsers.contains_key(&normalise_extension(extension))
    }

    /// Fetch the parser claiming `extension`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when no parser claims the
    /// extension.
    pub fn get(&self, extension: &str) -> Result<&dyn FormatParser, RegistryError> {
        let key = normalise_extension(extension);
        self.parsers
            .get(&key)
            .map(AsRef::as_ref)
            .ok_or(RegistryError::NotFound { extension: key })
    }

    /// Registered extensions in sorted order.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.parsers.keys().map(String::as_str)
    }

    /// Whether no parser is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ParserRegistry")
            .field("extensions", &self.parsers.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn normalise_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}
