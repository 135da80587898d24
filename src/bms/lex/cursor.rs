use std::ops::Range;

/// Walks the source line by line, keeping the byte index of each line.
pub(crate) struct Cursor<'a> {
    /// The line position, starts with 1.
    line: usize,
    /// The index position.
    index: usize,
    /// The source str.
    source: &'a str,
}

impl<'a> Cursor<'a> {
    pub(crate) const fn new(source: &'a str) -> Self {
        Self {
            line: 0,
            index: 0,
            source,
        }
    }

    pub(crate) const fn is_end(&self) -> bool {
        self.index >= self.source.len()
    }

    /// Returns the line number of the last line returned, starts with 1.
    pub(crate) const fn line(&self) -> usize {
        self.line
    }

    /// Determine the end of the current line and handle CRLF (\r\n) correctly.
    ///
    /// Returns `(next_index, line_end_index)`: where the next line starts, and where the content of
    /// the current line ends, without the line feed nor the carriage return before it.
    fn current_line_bounds(&self) -> (usize, usize) {
        let rest = &self.source[self.index..];
        match rest.find('\n') {
            Some(lf) => {
                let content = &rest[..lf];
                let content_len = content.strip_suffix('\r').map_or(lf, str::len);
                (self.index + lf + 1, self.index + content_len)
            }
            None => (self.source.len(), self.source.len()),
        }
    }

    /// Move cursor through the current line, and return it with its byte range.
    pub(crate) fn next_line_with_range(&mut self) -> Option<(Range<usize>, &'a str)> {
        if self.is_end() {
            return None;
        }
        let (next_index, line_end) = self.current_line_bounds();
        let range = self.index..line_end;
        let line = &self.source[range.clone()];
        self.index = next_index;
        self.line += 1;
        Some((range, line))
    }
}
