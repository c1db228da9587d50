use std::collections::HashSet;

/// One text mutation, in line terms.
///
/// Lines `start_line..=end_line` (1-based) were replaced by text containing
/// `inserted_line_count` newlines. A plain insertion without a newline is
/// `(l, l, 0)`; pressing Enter on line `l` is `(l, l, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditDelta {
    pub start_line: usize,
    pub end_line: usize,
    pub inserted_line_count: usize,
}

impl EditDelta {
    /// Builds a delta, normalising a reversed range.
    #[must_use]
    pub fn new(start_line: usize, end_line: usize, inserted_line_count: usize) -> Self {
        Self {
            start_line: start_line.min(end_line),
            end_line: start_line.max(end_line),
            inserted_line_count,
        }
    }

    /// Where a line that sat at `line` before the edit ends up afterwards, or
    /// `None` if it was deleted.
    #[must_use]
    pub fn shift(&self, line: usize) -> Option<usize> {
        if line < self.start_line {
            return Some(line);
        }
        let removed = self.end_line - self.start_line;
        let grown = line.saturating_add(self.inserted_line_count);
        (grown > removed).then(|| grown - removed)
    }
}

/// Bookmarked line numbers of the buffer that currently owns bookmarking.
///
/// Members are 1-based and deduplicated; the set itself carries no order,
/// use [`BookmarkSet::sorted`] when one is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkSet {
    lines: HashSet<usize>,
}

impl BookmarkSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, line: usize) -> bool {
        self.lines.contains(&line)
    }

    /// Adds `line`; zero is not a line number and is ignored.
    pub fn insert(&mut self, line: usize) -> bool {
        line > 0 && self.lines.insert(line)
    }

    pub fn remove(&mut self, line: usize) -> bool {
        self.lines.remove(&line)
    }

    /// Flips the bookmark on `line`. Returns whether the line is now marked.
    pub fn toggle(&mut self, line: usize) -> bool {
        if self.lines.remove(&line) {
            false
        } else {
            self.insert(line)
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Drops every member beyond `line_count`.
    pub fn clamp_to(&mut self, line_count: usize) {
        self.lines.retain(|&line| line <= line_count);
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.iter().copied()
    }

    /// Members in ascending order.
    #[must_use]
    pub fn sorted(&self) -> Vec<usize> {
        let mut lines: Vec<usize> = self.lines.iter().copied().collect();
        lines.sort_unstable();
        lines
    }

    /// The bookmark to jump to from `current_line`.
    ///
    /// Forward picks the nearest bookmark below the cursor and wraps to the
    /// first one; backward picks the nearest above and wraps to the last.
    #[must_use]
    pub fn next_from(&self, current_line: usize, direction: Direction) -> Option<usize> {
        let sorted = self.sorted();
        match direction {
            Direction::Forward => sorted
                .iter()
                .copied()
                .find(|&line| line > current_line)
                .or_else(|| sorted.first().copied()),
            Direction::Backward => sorted
                .iter()
                .rev()
                .copied()
                .find(|&line| line < current_line)
                .or_else(|| sorted.last().copied()),
        }
    }
}

impl FromIterator<usize> for BookmarkSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = BookmarkSet::new();
        for line in iter {
            set.insert(line);
        }
        set
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Rewrites `bookmarks` after a single edit.
///
/// Lines before `start_line` are kept, everything from `start_line` on moves
/// by the net line-count change, and lines pushed to zero or below are dropped.
#[must_use]
pub fn reconcile(bookmarks: &BookmarkSet, delta: EditDelta) -> BookmarkSet {
    bookmarks.iter().filter_map(|line| delta.shift(line)).collect()
}

/// Rewrites `bookmarks` after an edit event carrying several ranges.
///
/// Each delta is applied to the same pre-event snapshot and the results are
/// unioned, so the outcome does not depend on the order the ranges were
/// reported in.
#[must_use]
pub fn reconcile_event(bookmarks: &BookmarkSet, deltas: &[EditDelta]) -> BookmarkSet {
    match deltas {
        [] => bookmarks.clone(),
        [delta] => reconcile(bookmarks, *delta),
        _ => deltas
            .iter()
            .flat_map(|delta| reconcile(bookmarks, *delta).lines)
            .collect(),
    }
}
