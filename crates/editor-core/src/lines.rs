//! Newline scanning shared by the document model and the analyzers.

/// Number of lines in `text`. An empty text is one empty line, and a trailing
/// newline opens one more.
#[inline]
#[must_use]
pub fn line_count(text: &str) -> usize {
    memchr::memchr_iter(b'\n', text.as_bytes()).count() + 1
}

/// Splits on `\n` only, keeping any `\r`. Yields [`line_count`] items.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> + '_ {
    let bytes = text.as_bytes();
    let mut start = 0;
    memchr::memchr_iter(b'\n', bytes)
        .chain(std::iter::once(bytes.len()))
        .map(move |end| {
            let line = &text[start..end];
            start = end + 1;
            line
        })
}

/// Lines as an editor displays them: split on `\n` with a trailing `\r`
/// removed.
pub fn display_lines(text: &str) -> impl Iterator<Item = &str> + '_ {
    split_lines(text).map(|line| line.strip_suffix('\r').unwrap_or(line))
}
