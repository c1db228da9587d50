use editor_core::analyzer::{AnalyzerRegistry, Symbol};
use editor_core::bookmarks::{BookmarkSet, Direction, EditDelta};
use editor_core::encoding::TextEncoding;
use editor_core::position::{LineSpan, TextRange};
use editor_core::transform::CaseConversion;

use crate::decorations::{DecorationCache, DecorationKind};
use crate::document::{Document, TextEdit};
use crate::errors::{SessionError, SessionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Single,
    Comparison,
}

/// Stable identifier of a buffer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BufferId {
    /// The only buffer in single mode.
    Primary,
    /// Left side in comparison mode. Never holds bookmarks.
    Original,
    /// Right side in comparison mode.
    Modified,
}

/// The slots of the active mode. The other mode's slots do not exist.
#[derive(Debug)]
pub(crate) enum Layout {
    Single { primary: Document },
    Comparison { original: Document, modified: Document },
}

/// All mutable workbench state for one editing session.
///
/// Every trigger (edit, toggle, load, save) is one `&mut self` call that runs
/// to completion, so bookmarks, documents and decorations are never observed
/// half-updated.
#[derive(Debug)]
pub struct Session {
    pub(crate) layout: Layout,
    /// Original-side text kept while in single mode, restored on re-entry.
    pub(crate) memorized_original: String,
    pub(crate) bookmarks: BookmarkSet,
    pub(crate) language: String,
    pub(crate) encoding: TextEncoding,
    pub(crate) file_name: Option<String>,
    /// Side that last had focus in comparison mode.
    pub(crate) focused: Option<BufferId>,
    pub(crate) decorations: DecorationCache,
    pub(crate) registry: AnalyzerRegistry,
}

/*

==================================
===== CREATION & INSPECTION =====
==================================

*/

impl Session {
    /// An empty single-mode session using the built-in analyzers.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in analyzer pattern fails to compile.
    pub fn new() -> SessionResult<Self> {
        Ok(Self::with_registry(AnalyzerRegistry::builtin()?))
    }

    #[must_use]
    pub fn with_registry(registry: AnalyzerRegistry) -> Self {
        let mut session = Self {
            layout: Layout::Single {
                primary: Document::default(),
            },
            memorized_original: String::new(),
            bookmarks: BookmarkSet::new(),
            language: editor_core::language::PLAIN_TEXT.to_owned(),
            encoding: TextEncoding::Utf8,
            file_name: None,
            focused: None,
            decorations: DecorationCache::default(),
            registry,
        };
        session.sync_decorations();
        session
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> Mode {
        match self.layout {
            Layout::Single { .. } => Mode::Single,
            Layout::Comparison { .. } => Mode::Comparison,
        }
    }

    #[must_use]
    pub fn live_buffers(&self) -> &'static [BufferId] {
        match self.layout {
            Layout::Single { .. } => &[BufferId::Primary],
            Layout::Comparison { .. } => &[BufferId::Original, BufferId::Modified],
        }
    }

    #[must_use]
    pub fn document(&self, buffer: BufferId) -> Option<&Document> {
        match (&self.layout, buffer) {
            (Layout::Single { primary }, BufferId::Primary) => Some(primary),
            (Layout::Comparison { original, .. }, BufferId::Original) => Some(original),
            (Layout::Comparison { modified, .. }, BufferId::Modified) => Some(modified),
            _ => None,
        }
    }

    fn document_mut(&mut self, buffer: BufferId) -> Option<&mut Document> {
        match (&mut self.layout, buffer) {
            (Layout::Single { primary }, BufferId::Primary) => Some(primary),
            (Layout::Comparison { original, .. }, BufferId::Original) => Some(original),
            (Layout::Comparison { modified, .. }, BufferId::Modified) => Some(modified),
            _ => None,
        }
    }

    /// Full text of `buffer`, or `None` if it is not part of the current mode.
    #[must_use]
    pub fn text(&self, buffer: BufferId) -> Option<String> {
        self.document(buffer).map(Document::text)
    }

    /// The buffer bookmarks belong to in the current mode.
    #[inline]
    #[must_use]
    pub fn bookmark_owner(&self) -> BufferId {
        match self.layout {
            Layout::Single { .. } => BufferId::Primary,
            Layout::Comparison { .. } => BufferId::Modified,
        }
    }

    #[must_use]
    pub fn bookmarks(&self) -> &BookmarkSet {
        &self.bookmarks
    }

    #[must_use]
    pub fn decorations(&self) -> &DecorationCache {
        &self.decorations
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Selects the encoding used by the next single-mode save.
    pub fn set_encoding(&mut self, encoding: TextEncoding) {
        self.encoding = encoding;
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Records that `buffer` received focus.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::BufferNotLive`] if `buffer` is not part of the
    /// current mode.
    pub fn focus(&mut self, buffer: BufferId) -> SessionResult<()> {
        if self.document(buffer).is_none() {
            return Err(SessionError::BufferNotLive(buffer));
        }
        self.focused = Some(buffer);
        Ok(())
    }

    /// The buffer commands act on: the primary in single mode, otherwise the
    /// last focused side (modified if neither has been focused).
    #[must_use]
    pub fn target_buffer(&self) -> BufferId {
        match self.layout {
            Layout::Single { .. } => BufferId::Primary,
            Layout::Comparison { .. } => self.focused.unwrap_or(BufferId::Modified),
        }
    }
}

/*

=======================
===== TRANSITIONS =====
=======================

*/

impl Session {
    /// Switches between single and comparison mode and returns the new mode.
    ///
    /// Entering comparison mode makes the current text the modified side and
    /// restores the memorized original. Leaving it memorizes the original side
    /// and keeps the modified text. Bookmarks follow the text they were set on.
    pub fn toggle_mode(&mut self) -> Mode {
        let layout = std::mem::replace(
            &mut self.layout,
            Layout::Single {
                primary: Document::default(),
            },
        );

        self.layout = match layout {
            Layout::Single { primary } => Layout::Comparison {
                original: Document::new(&self.memorized_original),
                modified: primary,
            },
            Layout::Comparison { original, modified } => {
                self.memorized_original = original.text();
                Layout::Single { primary: modified }
            }
        };

        self.focused = None;
        self.sync_decorations();
        tracing::info!(mode = ?self.mode(), "mode toggled");
        self.mode()
    }

    /// Exchanges the text of both comparison sides and clears bookmarks.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotInComparisonMode`] in single mode.
    pub fn swap_sides(&mut self) -> SessionResult<()> {
        let Layout::Comparison { original, modified } = &mut self.layout else {
            return Err(SessionError::NotInComparisonMode);
        };
        std::mem::swap(original, modified);

        self.bookmarks.clear();
        self.redecorate(BufferId::Original);
        self.redecorate(BufferId::Modified);
        tracing::info!("comparison sides swapped");
        Ok(())
    }

    /// Changes the language of every buffer and re-derives decorations.
    pub fn set_language(&mut self, language: &str) {
        if self.language != language {
            tracing::debug!(from = %self.language, to = language, "language changed");
            self.language = language.to_owned();
        }
        self.sync_decorations();
    }

    /// Applies one edit event to `buffer` and keeps bookmarks and decorations
    /// in step with the new text.
    ///
    /// # Errors
    ///
    /// - [`SessionError::BufferNotLive`] if `buffer` is not part of the
    ///   current mode.
    /// - [`SessionError::Edit`] if an edit is out of range or edits overlap;
    ///   the buffer is left untouched.
    pub fn apply_edits(
        &mut self,
        buffer: BufferId,
        edits: &[TextEdit],
    ) -> SessionResult<Vec<EditDelta>> {
        let owner = self.bookmark_owner();
        let document = self
            .document_mut(buffer)
            .ok_or(SessionError::BufferNotLive(buffer))?;
        let deltas = document.apply_edits(edits)?;
        let line_count = document.line_count();

        if buffer == owner && !self.bookmarks.is_empty() {
            let mut updated = editor_core::bookmarks::reconcile_event(&self.bookmarks, &deltas);
            updated.clamp_to(line_count);
            self.bookmarks = updated;
        }

        self.redecorate(buffer);
        Ok(deltas)
    }

    /// Rewrites the text in `range` of `buffer` with `conversion`.
    ///
    /// # Errors
    ///
    /// Same as [`Session::apply_edits`].
    pub fn convert_case(
        &mut self,
        buffer: BufferId,
        range: TextRange,
        conversion: CaseConversion,
    ) -> SessionResult<Vec<EditDelta>> {
        let current = self
            .document(buffer)
            .ok_or(SessionError::BufferNotLive(buffer))?
            .text_in(range)?;
        let converted = conversion.apply(&current);
        if converted == current {
            return Ok(Vec::new());
        }
        self.apply_edits(buffer, &[TextEdit::new(range, converted)])
    }

    /// Replaces the text of every live buffer, e.g. after a load, and drops
    /// all bookmarks.
    pub(crate) fn replace_layout(&mut self, layout: Layout) {
        self.layout = layout;
        self.focused = None;
        self.bookmarks.clear();
        self.sync_decorations();
    }
}

/*

=====================
===== BOOKMARKS =====
=====================

*/

impl Session {
    fn target_owns_bookmarks(&self) -> bool {
        self.target_buffer() == self.bookmark_owner()
    }

    /// Flips the bookmark on `line` of the target buffer.
    ///
    /// Returns whether the line is now marked, or `None` when the target is
    /// the original side or `line` does not exist.
    pub fn toggle_bookmark(&mut self, line: usize) -> Option<bool> {
        if !self.target_owns_bookmarks() {
            return None;
        }
        let owner = self.bookmark_owner();
        let line_count = self.document(owner)?.line_count();
        if line == 0 || line > line_count {
            return None;
        }

        let marked = self.bookmarks.toggle(line);
        self.redecorate(owner);
        Some(marked)
    }

    /// The bookmark to jump to from `current_line`, wrapping around.
    #[must_use]
    pub fn next_bookmark(&self, current_line: usize, direction: Direction) -> Option<usize> {
        if !self.target_owns_bookmarks() {
            return None;
        }
        self.bookmarks.next_from(current_line, direction)
    }

    pub fn clear_bookmarks(&mut self) {
        self.bookmarks.clear();
        self.redecorate(self.bookmark_owner());
    }
}

/*

====================
===== ANALYSIS =====
====================

*/

impl Session {
    /// Symbols of `buffer`, in source order. Empty when the language has no
    /// analyzer or the buffer is not live.
    #[must_use]
    pub fn symbols(&self, buffer: BufferId) -> Vec<Symbol> {
        let (Some(analyzer), Some(document)) =
            (self.registry.analyzer(&self.language), self.document(buffer))
        else {
            return Vec::new();
        };
        let mut symbols = analyzer.document_symbols(&document.text());
        symbols.sort_by_key(|symbol| symbol.decl_range.line);
        symbols
    }

    #[must_use]
    pub fn definition(&self, buffer: BufferId, line: usize) -> Option<LineSpan> {
        let analyzer = self.registry.analyzer(&self.language)?;
        analyzer.definition(&self.document(buffer)?.text(), line)
    }

    #[must_use]
    pub fn references(&self, buffer: BufferId, line: usize) -> Vec<LineSpan> {
        match (self.registry.analyzer(&self.language), self.document(buffer)) {
            (Some(analyzer), Some(document)) => analyzer.references(&document.text(), line),
            _ => Vec::new(),
        }
    }

    /// Recomputes both decoration layers of `buffer` from scratch.
    fn redecorate(&mut self, buffer: BufferId) {
        let Some(document) = self.document(buffer) else {
            self.decorations.remove(buffer);
            return;
        };
        let separators = self
            .registry
            .separator_lines(&self.language, &document.text());
        let bookmarks = if buffer == self.bookmark_owner() {
            self.bookmarks.sorted()
        } else {
            Vec::new()
        };

        tracing::debug!(
            ?buffer,
            separators = separators.len(),
            bookmarks = bookmarks.len(),
            "decorations recomputed"
        );
        self.decorations
            .replace(buffer, DecorationKind::FunctionSeparator, separators);
        self.decorations
            .replace(buffer, DecorationKind::Bookmark, bookmarks);
    }

    /// Drops decorations of discarded buffers and recomputes the live ones.
    fn sync_decorations(&mut self) {
        let live = self.live_buffers();
        self.decorations.retain_buffers(live);
        for &buffer in live {
            self.redecorate(buffer);
        }
    }
}
