//! File-format parsers for translation resources.
//!
//! Every format implements [`FormatParser`]: it turns one resource file into a
//! flat key → string mapping plus the list of problems met along the way.
//! Parsers never fail wholesale on malformed content; bad lines are dropped and
//! reported as [`ParseIssue`] values so callers can still merge the well-formed
//! entries.

use std::collections::BTreeMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

mod ini;

pub use ini::IniParser;

/// Why a single line was rejected by a parser.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MalformedReason {
    /// The line carries no `=` separator.
    MissingAssignment,
    /// Nothing precedes the `=` separator.
    EmptyKey,
    /// The value is not wrapped in double quotes.
    UnquotedValue,
    /// The opening quote is never closed on the same line.
    UnterminatedValue,
    /// Something other than a comment follows the closing quote.
    TrailingContent,
    /// A `[section` marker lacks its closing bracket.
    UnterminatedSection,
}

impl MalformedReason {
    /// Short human-readable description used in issue messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::MissingAssignment => "missing `=`",
            Self::EmptyKey => "empty key",
            Self::UnquotedValue => "value is not a quoted string",
            Self::UnterminatedValue => "unterminated quoted value",
            Self::TrailingContent => "unexpected content after the closing quote",
            Self::UnterminatedSection => "unterminated section header",
        }
    }
}

/// Problem reported while parsing a resource file.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParseIssue {
    /// A line could not be interpreted and was skipped.
    #[error("line {line}: {}", .reason.describe())]
    MalformedLine {
        /// One-based line number within the file.
        line: usize,
        /// Classification of the defect.
        reason: MalformedReason,
    },
    /// The file could not be opened or read.
    #[error("unable to read {path}: {reason}")]
    Unreadable {
        /// Path of the file that failed to load.
        path: Utf8PathBuf,
        /// Description of the underlying I/O error.
        reason: String,
    },
}

/// Entries and issues produced by parsing a single resource.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParseOutcome {
    entries: BTreeMap<String, String>,
    issues: Vec<ParseIssue>,
}

impl ParseOutcome {
    /// Build an outcome from already collected parts.
    #[must_use]
    pub const fn new(entries: BTreeMap<String, String>, issues: Vec<ParseIssue>) -> Self {
        Self { entries, issues }
    }

    /// Outcome for a file that could not be read at all.
    #[must_use]
    pub fn unreadable(path: &Utf8Path, reason: impl Into<String>) -> Self {
        Self {
            entries: BTreeMap::new(),
            issues: vec![ParseIssue::Unreadable {
                path: path.to_owned(),
                reason: reason.into(),
            }],
        }
    }

    /// Parsed key → value pairs. Keys are canonical (uppercase).
    #[must_use]
    pub const fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Consume the outcome, yielding the entries.
    #[must_use]
    pub fn into_entries(self) -> BTreeMap<String, String> {
        self.entries
    }

    /// Problems met while parsing.
    #[must_use]
    pub const fn issues(&self) -> &[ParseIssue] {
        self.issues.as_slice()
    }

    /// Whether the file parsed without a single issue.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Whether the file could not be read.
    #[must_use]
    pub fn is_unreadable(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| matches!(issue, ParseIssue::Unreadable { .. }))
    }

    /// One-line summary of the issues, e.g. `2 parse issue(s): line 3: ...`.
    #[must_use]
    pub fn summary(&self) -> String {
        let details: Vec<String> = self.issues.iter().map(ToString::to_string).collect();
        format!("{} parse issue(s): {}", self.issues.len(), details.join("; "))
    }
}

/// Capability shared by every translation file format.
///
/// Implementations declare the file extensions they handle and parse source
/// text into a [`ParseOutcome`]. Reading from disk is provided on top of
/// [`FormatParser::parse_str`] so formats only deal with text.
pub trait FormatParser: Send + Sync {
    /// File extensions (without the leading dot) claimed by this parser.
    fn extensions(&self) -> &[&'static str];

    /// Parse resource text.
    fn parse_str(&self, source: &str) -> ParseOutcome;

    /// Parse the file at `path`.
    ///
    /// An unreadable file produces an empty mapping and a single
    /// [`ParseIssue::Unreadable`] issue. Resource files must be UTF-8: a
    /// single invalid byte makes the whole file unreadable, so none of its
    /// entries are returned, not even those on well-formed lines.
    fn parse_file(&self, path: &Utf8Path) -> ParseOutcome {
        fs::read_to_string(path).map_or_else(
            |error| ParseOutcome::unreadable(path, error.to_string()),
            |source| self.parse_str(&source),
        )
    }
}
