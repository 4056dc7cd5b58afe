use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A double-quoted literal. A backslash escapes any following character,
    /// newlines included. An unterminated literal runs to end of text.
    static ref STRING_LITERAL: Regex =
        Regex::new(r#""(?:\\(?s:.)|[^"\\])*(?:"|\\?\z)"#).expect("string literal regex is valid");
}

/// Half-open byte interval `[start, end)` over the input text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when `other` lies entirely inside this span
    pub fn contains(&self, other: &Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

/// Locate every double-quoted string literal, in order of appearance
pub fn string_literal_spans(text: &str) -> Vec<Span> {
    STRING_LITERAL
        .find_iter(text)
        .map(|m| Span::new(m.start(), m.end()))
        .collect()
}

/// Locate runs of exactly `tab_width` spaces with a non-overlapping forward search.
///
/// A longer run matches at each consecutive `tab_width` window it fully
/// holds; any shorter remainder is left out.
pub fn space_runs(text: &str, tab_width: usize) -> Vec<Span> {
    if tab_width == 0 {
        return Vec::new();
    }

    let needle = " ".repeat(tab_width);
    text.match_indices(needle.as_str())
        .map(|(start, run)| Span::new(start, start + run.len()))
        .collect()
}
