//! Output escaping applied by [`super::Language::translate_with`].

/// How a looked-up string is post-processed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TranslateOptions {
    /// Backslash-escape `\`, `'`, `"` and NUL for embedding in script string
    /// literals. Takes precedence over [`Self::interpret_backslashes`].
    pub javascript_safe: bool,
    /// Turn `\\`, `\t` and `\n` sequences into the characters they denote.
    pub interpret_backslashes: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            javascript_safe: false,
            interpret_backslashes: true,
        }
    }
}

impl TranslateOptions {
    /// Options for text embedded in a script string literal.
    #[must_use]
    pub const fn javascript() -> Self {
        Self {
            javascript_safe: true,
            interpret_backslashes: true,
        }
    }

    /// Options that leave backslash sequences untouched.
    #[must_use]
    pub const fn verbatim() -> Self {
        Self {
            javascript_safe: false,
            interpret_backslashes: false,
        }
    }
}

pub(super) fn apply(text: String, options: TranslateOptions) -> String {
    if options.javascript_safe {
        add_slashes(&text)
    } else if options.interpret_backslashes {
        interpret_backslashes(&text)
    } else {
        text
    }
}

fn add_slashes(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '\\' | '\'' | '"' => {
                escaped.push('\\');
                escaped.push(character);
            }
            '\0' => escaped.push_str("\\0"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn interpret_backslashes(text: &str) -> String {
    let mut interpreted = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(character) = chars.next() {
        if character != '\\' {
            interpreted.push(character);
            continue;
        }
        match chars.peek() {
            Some('\\') => interpreted.push('\\'),
            Some('t') => interpreted.push('\t'),
            Some('n') => interpreted.push('\n'),
            _ => {
                interpreted.push('\\');
                continue;
            }
        }
        chars.next();
    }
    interpreted
}
