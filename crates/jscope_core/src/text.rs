//! Text range and position types for source location tracking.
//!
//! Nodes and tokens carry byte-offset [`TextRange`]s. Markers and query
//! results are reported as line/column [`SourcePosition`]s, converted through
//! a [`LineMap`] built once per document.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A position in source text, measured as a byte offset from the start.
pub type TextPos = u32;

/// A text range with start and end positions.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextRange {
    /// The byte offset where this range starts (inclusive).
    pub pos: TextPos,
    /// The byte offset where this range ends (exclusive).
    pub end: TextPos,
}

impl TextRange {
    /// Create a new text range.
    #[inline]
    pub fn new(pos: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= pos);
        Self { pos, end }
    }

    /// Create an empty range at a position.
    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self { pos, end: pos }
    }

    /// The length of this range in bytes.
    #[inline]
    pub fn len(&self) -> TextPos {
        self.end - self.pos
    }

    /// Whether this range is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    /// Convert to a byte range.
    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.pos as usize..self.end as usize
    }

    /// Whether this range contains a position.
    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.pos && pos < self.end
    }

    /// Whether this range contains or touches the given position.
    ///
    /// A cursor placed right after an identifier still selects it.
    #[inline]
    pub fn contains_inclusive(&self, pos: TextPos) -> bool {
        pos >= self.pos && pos <= self.end
    }

    /// Return a new range covering both this range and the other.
    pub fn cover(&self, other: TextRange) -> TextRange {
        TextRange::new(self.pos.min(other.pos), self.end.max(other.end))
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.pos, self.end)
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.pos, self.end)
    }
}

/// Line and column information derived from source text.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LineAndColumn {
    /// 0-based line number.
    pub line: u32,
    /// 0-based byte column within the line.
    pub column: u32,
}

impl LineAndColumn {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// The start and end of a node as 0-based line/column pairs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePosition {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl SourcePosition {
    pub fn new(start: LineAndColumn, end: LineAndColumn) -> Self {
        Self {
            start_line: start.line,
            start_column: start.column,
            end_line: end.line,
            end_column: end.column,
        }
    }

    pub fn start(&self) -> LineAndColumn {
        LineAndColumn::new(self.start_line, self.start_column)
    }

    pub fn end(&self) -> LineAndColumn {
        LineAndColumn::new(self.end_line, self.end_column)
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-based, the way editors and compilers print locations.
        write!(f, "{},{}", self.start_line + 1, self.start_column + 1)
    }
}

/// A map from byte offsets to line numbers, built from source text.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offsets of the start of each line.
    line_starts: Vec<TextPos>,
    /// Total length of the text the map was built from.
    text_len: TextPos,
}

impl LineMap {
    /// Build a line map from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        line_starts.extend(memchr::memchr_iter(b'\n', text.as_bytes()).map(|i| (i + 1) as u32));
        Self {
            line_starts,
            text_len: text.len() as u32,
        }
    }

    /// Get the line number (0-based) for a byte offset.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(line) => (line - 1) as u32,
        }
    }

    /// Get the line and column for a byte offset.
    pub fn line_and_column_of(&self, pos: TextPos) -> LineAndColumn {
        let line = self.line_of(pos);
        let line_start = self.line_starts[line as usize];
        LineAndColumn {
            line,
            column: pos - line_start,
        }
    }

    /// Convert a byte range into a line/column position.
    pub fn position_of(&self, range: TextRange) -> SourcePosition {
        SourcePosition::new(
            self.line_and_column_of(range.pos),
            self.line_and_column_of(range.end),
        )
    }

    /// Convert a 0-based line/column back into a byte offset.
    ///
    /// Returns `None` when the line does not exist. Columns past the end of
    /// the line are clamped to the end of the text.
    pub fn offset_of(&self, line: u32, column: u32) -> Option<TextPos> {
        let start = *self.line_starts.get(line as usize)?;
        Some((start + column).min(self.text_len))
    }

    /// Get the byte offset of the start of a line.
    pub fn line_start(&self, line: u32) -> TextPos {
        self.line_starts[line as usize]
    }

    /// Get the total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_range() {
        let range = TextRange::new(5, 15);
        assert_eq!(range.len(), 10);
        assert!(range.contains(5));
        assert!(range.contains(14));
        assert!(!range.contains(15));
        assert!(range.contains_inclusive(15));
    }

    #[test]
    fn test_text_range_cover() {
        let a = TextRange::new(4, 6);
        let b = TextRange::new(1, 5);
        assert_eq!(a.cover(b), TextRange::new(1, 6));
    }

    #[test]
    fn test_line_map() {
        let text = "line1\nline2\nline3";
        let map = LineMap::new(text);
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.line_of(0), 0);
        assert_eq!(map.line_of(5), 0); // newline char
        assert_eq!(map.line_of(6), 1); // start of line2
        assert_eq!(map.line_of(12), 2);

        let lc = map.line_and_column_of(8);
        assert_eq!(lc.line, 1);
        assert_eq!(lc.column, 2);
    }

    #[test]
    fn test_offset_round_trip() {
        let text = "var a;\n  a = 1;\n";
        let map = LineMap::new(text);
        let offset = map.offset_of(1, 2).unwrap();
        assert_eq!(&text[offset as usize..offset as usize + 1], "a");
        assert_eq!(map.line_and_column_of(offset), LineAndColumn::new(1, 2));
        assert_eq!(map.offset_of(7, 0), None);
    }

    #[test]
    fn test_position_of() {
        let map = LineMap::new("x\nfoo = 1;");
        let pos = map.position_of(TextRange::new(2, 5));
        assert_eq!(pos.start_line, 1);
        assert_eq!(pos.start_column, 0);
        assert_eq!(pos.end_line, 1);
        assert_eq!(pos.end_column, 3);
        assert_eq!(pos.to_string(), "2,1");
    }
}
