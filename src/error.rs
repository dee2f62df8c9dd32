//! Error types for the language orchestrator and its collaborators.
//!
//! Translation lookups never fail, so these errors cover the remaining
//! surfaces: files whose format has no registered parser, unusable language
//! manifests, and configuration that cannot be read.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while loading language files.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum LanguageError {
    /// No parser is registered for the file's extension.
    #[error("no parser registered for `.{extension}` files (needed for {path})")]
    UnknownFormat {
        /// The normalised extension that was requested.
        extension: String,
        /// File that could not be dispatched.
        path: Utf8PathBuf,
    },

    /// The metadata collaborator failed.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Errors raised while reading language manifests.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum MetadataError {
    /// The manifest could not be read from disk.
    #[error("unable to read manifest {path}: {reason}")]
    Io {
        /// Path of the manifest.
        path: Utf8PathBuf,
        /// Description of the underlying I/O error.
        reason: String,
    },

    /// The manifest is not well-formed XML.
    #[error("malformed manifest {path}: {reason}")]
    Xml {
        /// Path of the manifest.
        path: Utf8PathBuf,
        /// Description of the XML error.
        reason: String,
    },

    /// The manifest's root element is not `metafile`.
    #[error("manifest {path} has root element `{found}`; expected `metafile`")]
    InvalidRoot {
        /// Path of the manifest.
        path: Utf8PathBuf,
        /// Name of the root element actually found.
        found: String,
    },
}

/// Errors raised while loading configuration.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("unable to read configuration {path}: {reason}")]
    Read {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Description of the underlying I/O error.
        reason: String,
    },

    /// The configuration is not valid TOML for [`crate::LanguageConfig`].
    #[error("invalid configuration: {reason}")]
    Parse {
        /// Description of the deserialisation error.
        reason: String,
    },
}
