//! Source location tracking
//!
//! Expressions are single-line, so a location is just a character offset into
//! the input. Spans are half-open `[start, end)` ranges of those offsets and are
//! only used for diagnostics; they never take part in token equality.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open range of character offsets into the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive, 0-based)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "Span start must not be after end");
        Self { start, end }
    }

    /// Create a single-character span
    pub fn single(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset + 1,
        }
    }

    /// Zero-width span, used to point just past the last character
    pub fn empty_at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Number of characters covered
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one covering both
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Columns are shown 1-based
        if self.len() <= 1 {
            write!(f, "col {}", self.start + 1)
        } else {
            write!(f, "col {}-{}", self.start + 1, self.end)
        }
    }
}

/// A value with its source location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    /// Map the value while preserving the span
    pub fn map<U, F>(self, f: F) -> Spanned<U>
    where
        F: FnOnce(T) -> U,
    {
        Spanned {
            value: f(self.value),
            span: self.span,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: fmt::Display> fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// One line of source text, used to render caret diagnostics
#[derive(Debug, Clone)]
pub struct SourceLine {
    pub source: String,
}

impl SourceLine {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Number of characters in the line
    pub fn char_len(&self) -> usize {
        self.source.chars().count()
    }

    /// Get the text covered by a span, clamped to the line
    pub fn span_text(&self, span: &Span) -> String {
        self.source
            .chars()
            .skip(span.start)
            .take(span.len())
            .collect()
    }

    /// Format an error with the offending line and a caret underline
    pub fn format_error(&self, span: &Span, code: &str, message: &str) -> String {
        let mut result = String::new();

        result.push_str(&format!("error[{}]: {}\n", code, message));
        result.push_str(&format!("  --> {}\n", span));
        result.push_str("   |\n");
        result.push_str(&format!(" 1 | {}\n", self.source));

        let mut underline = String::from("   | ");
        let start = span.start.min(self.char_len());
        underline.push_str(&" ".repeat(start));
        underline.push_str(&"^".repeat(span.len().max(1)));

        result.push_str(&underline);
        result.push('\n');

        result
    }
}
