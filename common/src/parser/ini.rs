//! Baseline `key="value"` format.
//!
//! Lines are trimmed before inspection. Blank lines and `;` comments are
//! skipped, `[section]` markers are accepted but carry no meaning for lookup,
//! and every remaining line must read `KEY="value"` with an optional trailing
//! `; comment`. Inside the quotes `\"`, `\\` and `\n` are interpreted; any
//! other backslash sequence is kept verbatim.

use std::collections::BTreeMap;

use super::{FormatParser, MalformedReason, ParseIssue, ParseOutcome};
use crate::catalogue::canonical_key;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parser for `.ini` translation files.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IniParser;

impl IniParser {
    /// Create the parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FormatParser for IniParser {
    fn extensions(&self) -> &[&'static str] {
        &["ini"]
    }

    fn parse_str(&self, source: &str) -> ParseOutcome {
        let mut entries = BTreeMap::new();
        let mut issues = Vec::new();

        for (index, raw) in source.lines().enumerate() {
            match classify_line(raw) {
                Line::Skip => {}
                Line::Entry { key, value } => {
                    // Later definitions replace earlier ones within the file.
                    entries.insert(key, value);
                }
                Line::Malformed(reason) => issues.push(ParseIssue::MalformedLine {
                    line: index + 1,
                    reason,
                }),
            }
        }

        ParseOutcome::new(entries, issues)
    }
}

enum Line {
    Skip,
    Entry { key: String, value: String },
    Malformed(MalformedReason),
}

fn classify_line(raw: &str) -> Line {
    let line = raw.trim_start_matches(BYTE_ORDER_MARK).trim();

    if line.is_empty() || line.starts_with(';') {
        return Line::Skip;
    }

    if line.starts_with('[') {
        return if is_section_header(line) {
            Line::Skip
        } else {
            Line::Malformed(MalformedReason::UnterminatedSection)
        };
    }

    let Some((raw_key, raw_value)) = line.split_once('=') else {
        return Line::Malformed(MalformedReason::MissingAssignment);
    };

    let key = raw_key.trim();
    if key.is_empty() {
        return Line::Malformed(MalformedReason::EmptyKey);
    }

    unquote(raw_value.trim()).map_or_else(Line::Malformed, |value| Line::Entry {
        key: canonical_key(key),
        value,
    })
}

fn is_section_header(line: &str) -> bool {
    line.split_once(']')
        .is_some_and(|(_, rest)| is_blank_or_comment(rest))
}

fn is_blank_or_comment(rest: &str) -> bool {
    let trimmed = rest.trim();
    trimmed.is_empty() || trimmed.starts_with(';')
}

/// Strip the surrounding quotes from `value` and interpret escapes.
fn unquote(value: &str) -> Result<String, MalformedReason> {
    let mut chars = value.chars();
    if chars.next() != Some('"') {
        return Err(MalformedReason::UnquotedValue);
    }

    let mut parsed = String::with_capacity(value.len());
    while let Some(character) = chars.next() {
        match character {
            '\\' => match chars.next() {
                Some('"') => parsed.push('"'),
                Some('\\') => parsed.push('\\'),
                Some('n') => parsed.push('\n'),
                Some(other) => {
                    parsed.push('\\');
                    parsed.push(other);
                }
                None => return Err(MalformedReason::UnterminatedValue),
            },
            '"' => {
                return if is_blank_or_comment(chars.as_str()) {
                    Ok(parsed)
                } else {
                    Err(MalformedReason::TrailingContent)
                };
            }
            other => parsed.push(other),
        }
    }

    Err(MalformedReason::UnterminatedValue)
}
