//! Shared building blocks for layered translation catalogues: the pluggable
//! file-format parsers, the extension-keyed parser registry, the overlay
//! message catalogue, and the debug validator that lints translation files
//! and marks up lookups.

pub mod catalogue;
pub mod parser;
pub mod registry;
pub mod validator;

pub use catalogue::{CORE_SCOPE, MessageCatalogue, canonical_key};
pub use parser::{FormatParser, IniParser, MalformedReason, ParseIssue, ParseOutcome};
pub use registry::{ParserRegistry, RegistryError};
pub use validator::lint::{DefectKind, LintFinding, LintReport, scan_file, scan_str};
pub use validator::markup::{mark_missing, mark_resolved};
