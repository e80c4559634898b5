//! Source locations.
//!
//! A [`Span`] is a byte range within one file; a [`Location`] pairs it with
//! the file it came from. Spans are small and cheap to copy, mirroring how
//! the teacher compiler tracks AST node positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open byte range `[start, end)` within a single source file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// An empty span, used for synthetic nodes the builder creates itself
    /// (fresh inferred nodes, substitution results) that have no source text.
    #[inline]
    pub const fn synthetic() -> Self {
        Span { start: 0, end: 0 }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A [`Span`] anchored to a source file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub span: Span,
}

impl Location {
    pub fn new(file: impl Into<String>, span: Span) -> Self {
        Location {
            file: file.into(),
            span,
        }
    }

    pub fn synthetic() -> Self {
        Location {
            file: String::new(),
            span: Span::synthetic(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.is_empty() {
            write!(f, "<synthetic>")
        } else {
            write!(f, "{}:{}..{}", self.file, self.span.start, self.span.end)
        }
    }
}
