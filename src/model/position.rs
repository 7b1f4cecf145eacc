// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

/// A location in a document.
///
/// `character` counts Unicode scalar values (`char`s) from the start of the line, not bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub const fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// An inclusive range of lines, as reported for the visible part of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn single(line: usize) -> Self {
        Self { start: line, end: line }
    }

    /// Iterates the line indices of the range; empty when `end < start`.
    pub fn lines(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// A half-open column range `[start, end)` on a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextRange {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub const fn new(line: usize, start: usize, end: usize) -> Self {
        Self { line, start, end }
    }

    /// Zero-width range at `position`.
    pub const fn caret(position: Position) -> Self {
        Self {
            line: position.line,
            start: position.character,
            end: position.character,
        }
    }

    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn start_position(&self) -> Position {
        Position::new(self.line, self.start)
    }

    /// True when both ranges are on the same line and share at least one column.
    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.line == other.line && self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}..{}", self.line, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::{LineRange, Position, TextRange};

    #[test]
    fn line_range_with_equal_bounds_yields_one_line() {
        assert_eq!(LineRange::single(4).lines().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn line_range_with_inverted_bounds_is_empty() {
        assert_eq!(LineRange::new(3, 1).lines().count(), 0);
    }

    #[test]
    fn overlap_requires_shared_columns_on_the_same_line() {
        let a = TextRange::new(0, 0, 3);
        assert!(a.overlaps(&TextRange::new(0, 2, 5)));
        assert!(!a.overlaps(&TextRange::new(0, 3, 5)));
        assert!(!a.overlaps(&TextRange::new(1, 0, 3)));
    }

    #[test]
    fn caret_is_zero_width() {
        let caret = TextRange::caret(Position::new(2, 7));
        assert!(caret.is_empty());
        assert_eq!(caret.start_position(), Position::new(2, 7));
    }
}
