use std::collections::HashMap;

use crate::session::BufferId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DecorationKind {
    /// Whole-line rule above a callable declaration.
    FunctionSeparator,
    /// Gutter glyph on a bookmarked line.
    Bookmark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Decoration {
    pub line: usize,
    pub kind: DecorationKind,
}

/// The markers currently applied to each live buffer.
///
/// Every recompute replaces a whole layer (all decorations of one kind on one
/// buffer); entries are never merged, so nothing stale survives a recompute.
#[derive(Debug, Default)]
pub struct DecorationCache {
    entries: HashMap<BufferId, HashMap<DecorationKind, Vec<usize>>>,
}

impl DecorationCache {
    /// Replaces every `kind` decoration on `buffer` with `lines`.
    pub fn replace(
        &mut self,
        buffer: BufferId,
        kind: DecorationKind,
        lines: impl IntoIterator<Item = usize>,
    ) {
        let mut lines: Vec<usize> = lines.into_iter().collect();
        lines.sort_unstable();
        lines.dedup();
        self.entries.entry(buffer).or_default().insert(kind, lines);
    }

    /// Forgets everything applied to `buffer`.
    pub fn remove(&mut self, buffer: BufferId) {
        self.entries.remove(&buffer);
    }

    /// Drops entries of buffers not in `live`.
    pub fn retain_buffers(&mut self, live: &[BufferId]) {
        self.entries.retain(|buffer, _| live.contains(buffer));
    }

    /// Lines carrying a `kind` decoration on `buffer`, ascending.
    #[must_use]
    pub fn lines(&self, buffer: BufferId, kind: DecorationKind) -> &[usize] {
        self.entries
            .get(&buffer)
            .and_then(|layers| layers.get(&kind))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All decorations on `buffer`, ordered by line then kind.
    #[must_use]
    pub fn get(&self, buffer: BufferId) -> Vec<Decoration> {
        let mut all: Vec<Decoration> = self
            .entries
            .get(&buffer)
            .into_iter()
            .flat_map(|layers| {
                layers.iter().flat_map(|(kind, lines)| {
                    lines.iter().map(|&line| Decoration { line, kind: *kind })
                })
            })
            .collect();
        all.sort_unstable();
        all
    }

    pub fn buffers(&self) -> impl Iterator<Item = BufferId> + '_ {
        self.entries.keys().copied()
    }
}
