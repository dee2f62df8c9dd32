//! Line-level linting of `key="value"` translation files.
//!
//! The linter walks the raw lines of a file and flags each line showing any
//! of the following:
//!
//! | Defect | Trigger |
//! |--------|---------|
//! | [`DefectKind::UnbalancedQuote`] | the quoted value is never closed |
//! | [`DefectKind::UnescapedQuote`] | a bare `"` follows the closing quote |
//! | [`DefectKind::TrailingBackslash`] | the closing quote is escaped by a trailing `\` |
//! | [`DefectKind::LiteralNewline`] | the value holds a raw line-break character |
//! | [`DefectKind::OddPercent`] | the value holds an odd number of `%` markers |
//! | [`DefectKind::DuplicateKey`] | the key was already defined earlier in the file |
//!
//! The `%` rule is a heuristic for broken `printf`-style placeholders and
//! cannot tell a deliberate literal `%` from a missing pair. A line counts once
//! however many rules it trips.

use std::collections::{BTreeSet, HashSet};
use std::fs;

use camino::Utf8Path;

use crate::catalogue::canonical_key;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Structural defect detected on a line.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum DefectKind {
    /// An opening quote without a closing one.
    UnbalancedQuote,
    /// An unescaped double quote outside the quoted value.
    UnescapedQuote,
    /// A backslash escaping what should have been the closing quote.
    TrailingBackslash,
    /// A carriage return or Unicode line separator inside the value.
    LiteralNewline,
    /// An odd number of `%` markers in the value.
    OddPercent,
    /// A key defined more than once in the same file.
    DuplicateKey,
    /// The file could not be read.
    Unreadable,
}

/// Defects found on one line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LintFinding {
    line: usize,
    defects: BTreeSet<DefectKind>,
}

impl LintFinding {
    /// One-based line number, or `0` for file-level problems.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Every defect the line tripped.
    #[must_use]
    pub const fn defects(&self) -> &BTreeSet<DefectKind> {
        &self.defects
    }
}

/// Result of linting a translation file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LintReport {
    findings: Vec<LintFinding>,
}

impl LintReport {
    /// Flagged lines in file order.
    #[must_use]
    pub const fn findings(&self) -> &[LintFinding] {
        self.findings.as_slice()
    }

    /// Number of flagged lines; `0` means the file is clean.
    #[must_use]
    pub const fn defect_count(&self) -> usize {
        self.findings.len()
    }

    /// Whether nothing was flagged.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Whether any line tripped `kind`.
    #[must_use]
    pub fn has(&self, kind: DefectKind) -> bool {
        self.findings
            .iter()
            .any(|finding| finding.defects.contains(&kind))
    }

    /// Description suitable for an error-file listing.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.has(DefectKind::Unreadable) {
            return String::from("file could not be read");
        }
        let lines: Vec<String> = self
            .findings
            .iter()
            .map(|finding| finding.line.to_string())
            .collect();
        format!("error(s) in line(s) {}", lines.join(", "))
    }
}

/// Lint the file at `path`.
///
/// Never fails: an unreadable file yields a single [`DefectKind::Unreadable`]
/// finding at line `0`.
#[must_use]
pub fn scan_file(path: &Utf8Path) -> LintReport {
    fs::read_to_string(path).map_or_else(
        |_| LintReport {
            findings: vec![LintFinding {
                line: 0,
                defects: BTreeSet::from([DefectKind::Unreadable]),
            }],
        },
        |source| scan_str(&source),
    )
}

/// Lint translation source text.
///
/// ```
/// use langpack_common::{DefectKind, scan_str};
///
/// let report = scan_str("GOOD=\"fine\"\nBAD=\"unterminated\n");
/// assert_eq!(report.defect_count(), 1);
/// assert!(report.has(DefectKind::UnbalancedQuote));
/// ```
#[must_use]
pub fn scan_str(source: &str) -> LintReport {
    let mut seen = HashSet::new();
    let findings = source
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let defects = scan_line(line, &mut seen);
            (!defects.is_empty()).then(|| LintFinding {
                line: index + 1,
                defects,
            })
        })
        .collect();

    LintReport { findings }
}

fn scan_line(raw: &str, seen: &mut HashSet<String>) -> BTreeSet<DefectKind> {
    let mut defects = BTreeSet::new();
    let line = raw.trim_start_matches(BYTE_ORDER_MARK).trim();

    if line.is_empty() || line.starts_with(';') || line.starts_with('[') {
        return defects;
    }

    let Some((raw_key, raw_value)) = line.split_once('=') else {
        return defects;
    };

    let key = canonical_key(raw_key.trim());
    if !key.is_empty() && !seen.insert(key) {
        defects.insert(DefectKind::DuplicateKey);
    }

    let content = inspect_quotes(raw_value.trim(), &mut defects);

    if content.chars().any(is_line_break) {
        defects.insert(DefectKind::LiteralNewline);
    }

    if !content.matches('%').count().is_multiple_of(2) {
        defects.insert(DefectKind::OddPercent);
    }

    defects
}

/// Check the quoting of `value` and return the text between the quotes.
///
/// Unquoted values are returned whole; rejecting them is the parser's job.
fn inspect_quotes<'a>(value: &'a str, defects: &mut BTreeSet<DefectKind>) -> &'a str {
    let Some(body) = value.strip_prefix('"') else {
        return value;
    };

    let mut escaped = false;
    for (offset, character) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match character {
            '\\' => escaped = true,
            '"' => {
                let (content, closing) = body.split_at(offset);
                let rest = closing.strip_prefix('"').unwrap_or(closing).trim();
                if !rest.starts_with(';') && rest.contains('"') {
                    defects.insert(DefectKind::UnescapedQuote);
                }
                return content;
            }
            _ => {}
        }
    }

    // No closing quote: either the author escaped it by accident or forgot it.
    if body.ends_with('"') {
        defects.insert(DefectKind::TrailingBackslash);
    } else {
        defects.insert(DefectKind::UnbalancedQuote);
    }
    body
}

const fn is_line_break(character: char) -> bool {
    matches!(character, '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}
