//! Line and word break classification for adjacent code-unit pairs.
//!
//! Both classifiers are pure functions of the pair `(a, b)` where `b` is the
//! unit following `a`, or `None` past the end of the buffer.

use unicode_width::UnicodeWidthChar;

/// The newline code unit used by edit buffers.
pub const NEWLINE: char = '\n';

/// Line break opportunity between two code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreak {
    /// The line must not break between the pair.
    None,
    /// The line may break between the pair.
    Optional,
    /// The line must break after the first unit.
    Mandatory,
}

/// Word boundary between two code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordBreak {
    None,
    Optional,
}

/// Classify the line break opportunity after `a`.
///
/// # Examples
///
/// ```
/// use wrapedit_core::line_break::{classify_line_break, LineBreak};
///
/// assert_eq!(classify_line_break('\n', Some('a')), LineBreak::Mandatory);
/// assert_eq!(classify_line_break(' ', Some('a')), LineBreak::Optional);
/// assert_eq!(classify_line_break('a', Some('b')), LineBreak::None);
/// ```
pub fn classify_line_break(a: char, b: Option<char>) -> LineBreak {
    if a == NEWLINE {
        return LineBreak::Mandatory;
    }
    let Some(b) = b else {
        return LineBreak::None;
    };

    if a.is_whitespace() || b.is_whitespace() || is_break_after(a) || is_wide(a) || is_wide(b) {
        LineBreak::Optional
    } else {
        LineBreak::None
    }
}

/// Classify the word boundary between `a` and `b`.
///
/// Two word characters (alphanumeric or `_`) never have a boundary between
/// them; anything else does.
pub fn classify_word_break(a: char, b: Option<char>) -> WordBreak {
    match b {
        Some(b) if is_word_char(a) && is_word_char(b) => WordBreak::None,
        _ => WordBreak::Optional,
    }
}

fn is_word_char(c: char) -> bool {
    (c.is_alphanumeric() || c == '_') && !is_wide(c)
}

/// Punctuation after which a line may break.
fn is_break_after(c: char) -> bool {
    matches!(c, '-' | '/' | '?' | '!' | ',' | ';' | ':' | ')' | ']' | '}')
}

/// East Asian wide characters break freely on either side.
fn is_wide(c: char) -> bool {
    c.width() == Some(2)
}
