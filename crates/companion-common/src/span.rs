//! Source spans.
//!
//! Spans are byte offsets into the source text of one compilation unit.
//! A `SourceLocation` pairs a span with the file it belongs to and is what
//! diagnostics are anchored to.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, start + length)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub length: u32,
}

impl Span {
    #[inline]
    #[must_use]
    pub const fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    /// Span covering `[start, end)`. An inverted range yields an empty span at `start`.
    #[inline]
    #[must_use]
    pub const fn from_bounds(start: u32, end: u32) -> Self {
        Self {
            start,
            length: end.saturating_sub(start),
        }
    }

    #[inline]
    #[must_use]
    pub const fn end(self) -> u32 {
        self.start.saturating_add(self.length)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.length == 0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, offset: u32) -> bool {
        offset >= self.start && offset < self.end()
    }
}

/// A span within a named file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    #[serde(default)]
    pub file: String,
    #[serde(flatten)]
    pub span: Span,
}

impl SourceLocation {
    #[must_use]
    pub fn new(file: impl Into<String>, span: Span) -> Self {
        Self {
            file: file.into(),
            span,
        }
    }
}
