/// A location in a document, as the editing surface reports it.
///
/// Both fields are 1-based; `column` counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A span between two positions. Construction normalises direction, so
/// `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    start: Position,
    end: Position,
}

impl TextRange {
    #[must_use]
    pub fn new(a: Position, b: Position) -> Self {
        Self {
            start: std::cmp::min(a, b),
            end: std::cmp::max(a, b),
        }
    }

    /// An empty range at `pos`, i.e. a plain insertion point.
    #[must_use]
    pub fn caret(pos: Position) -> Self {
        Self { start: pos, end: pos }
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> Position {
        self.start
    }

    #[inline]
    #[must_use]
    pub fn end(&self) -> Position {
        self.end
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A whole-line location: column 1 through one past the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSpan {
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
}

impl LineSpan {
    #[must_use]
    pub fn whole_line(line: usize, text: &str) -> Self {
        Self {
            line,
            start_column: 1,
            end_column: text.chars().count() + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_normalises_direction() {
        let range = TextRange::new(Position::new(4, 2), Position::new(1, 7));
        assert_eq!(range.start(), Position::new(1, 7));
        assert_eq!(range.end(), Position::new(4, 2));
        assert!(!range.is_empty());
    }

    #[test]
    fn test_caret_is_empty() {
        assert!(TextRange::caret(Position::new(3, 3)).is_empty());
    }

    #[test]
    fn test_whole_line_counts_chars() {
        let span = LineSpan::whole_line(7, "Call 表示");
        assert_eq!(span, LineSpan { line: 7, start_column: 1, end_column: 8 });
    }
}
