use editor_core::bookmarks::EditDelta;
use editor_core::position::{Position, TextRange};

/// One replacement reported by the editing surface.
///
/// `range` is expressed against the text as it was *before* the edit event
/// that carries this edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: TextRange,
    pub text: String,
}

impl TextEdit {
    #[must_use]
    pub fn new(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Inserts `text` at `pos` without replacing anything.
    #[must_use]
    pub fn insert(pos: Position, text: impl Into<String>) -> Self {
        Self::new(TextRange::caret(pos), text)
    }

    /// The line-level view of this edit, for the bookmark reconciler.
    #[must_use]
    pub fn delta(&self) -> EditDelta {
        EditDelta::new(
            self.range.start().line,
            self.range.end().line,
            editor_core::lines::line_count(&self.text) - 1,
        )
    }
}

/// The text of one buffer slot, held as lines.
///
/// Always has at least one line; the empty document is a single empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }
}

impl Document {
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            lines: editor_core::lines::split_lines(text)
                .map(str::to_owned)
                .collect(),
        }
    }

    /// The full text, lines joined with `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line `line` (1-based) without its terminator.
    #[must_use]
    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line.checked_sub(1)?).map(String::as_str)
    }

    /// Byte offset of the 1-based character `column` within `line`. The column
    /// just past the last character is valid.
    fn byte_offset(&self, pos: Position) -> Result<usize, crate::errors::EditError> {
        let out_of_range = crate::errors::EditError::OutOfRange {
            line: pos.line,
            column: pos.column,
        };
        let line = self.line(pos.line).ok_or(out_of_range.clone())?;
        let char_idx = pos.column.checked_sub(1).ok_or(out_of_range.clone())?;

        line.char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(line.len()))
            .nth(char_idx)
            .ok_or(out_of_range)
    }

    /// The text covered by `range`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::OutOfRange`](crate::errors::EditError::OutOfRange)
    /// if either end lies outside the document.
    pub fn text_in(&self, range: TextRange) -> Result<String, crate::errors::EditError> {
        let (start, end) = (range.start(), range.end());
        let start_offset = self.byte_offset(start)?;
        let end_offset = self.byte_offset(end)?;

        if start.line == end.line {
            return Ok(self.lines[start.line - 1][start_offset..end_offset].to_owned());
        }

        let mut out = String::new();
        out.push_str(&self.lines[start.line - 1][start_offset..]);
        for line in &self.lines[start.line..end.line - 1] {
            out.push('\n');
            out.push_str(line);
        }
        out.push('\n');
        out.push_str(&self.lines[end.line - 1][..end_offset]);
        Ok(out)
    }

    /// Applies every edit of one event and reports a delta per edit, in the
    /// order the edits were given.
    ///
    /// Edits are applied bottom-up so that each range stays valid against the
    /// pre-event text. Nothing is modified if any edit is rejected.
    ///
    /// # Errors
    ///
    /// - [`EditError::OutOfRange`](crate::errors::EditError::OutOfRange) if a
    ///   range lies outside the document.
    /// - [`EditError::Overlapping`](crate::errors::EditError::Overlapping) if
    ///   two ranges overlap.
    pub fn apply_edits(
        &mut self,
        edits: &[TextEdit],
    ) -> Result<Vec<EditDelta>, crate::errors::EditError> {
        let mut resolved = Vec::with_capacity(edits.len());
        for edit in edits {
            let start = self.byte_offset(edit.range.start())?;
            let end = self.byte_offset(edit.range.end())?;
            resolved.push((edit, start, end));
        }

        // At a shared start the wider range goes first, so an insertion there
        // is applied after the text behind it has been replaced.
        resolved.sort_by_key(|(edit, _, _)| {
            (
                std::cmp::Reverse(edit.range.start()),
                std::cmp::Reverse(edit.range.end()),
            )
        });
        // Each edit must end at or before the start of the one applied just
        // before it; that keeps every precomputed offset valid.
        if resolved
            .windows(2)
            .any(|pair| pair[1].0.range.end() > pair[0].0.range.start())
        {
            return Err(crate::errors::EditError::Overlapping);
        }

        for (edit, start_offset, end_offset) in resolved {
            let start_idx = edit.range.start().line - 1;
            let end_idx = edit.range.end().line - 1;

            let mut joined = String::with_capacity(edit.text.len() + 16);
            joined.push_str(&self.lines[start_idx][..start_offset]);
            joined.push_str(&edit.text);
            joined.push_str(&self.lines[end_idx][end_offset..]);

            let replacement: Vec<String> = editor_core::lines::split_lines(&joined)
                .map(str::to_owned)
                .collect();
            self.lines.splice(start_idx..=end_idx, replacement);
        }

        Ok(edits.iter().map(TextEdit::delta).collect())
    }
}
