/// Hands out the lines of a file one at a time, so that block handlers can
/// consume more lines than the one they were triggered on.
pub(crate) struct SourceLines<'a> {
    lines: std::str::Lines<'a>,
    line_number: usize,
}

impl<'a> SourceLines<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines(),
            line_number: 0,
        }
    }

    /// The next line without its line ending (`\n` or `\r\n`).
    pub fn next_line(&mut self) -> Option<&'a str> {
        let line = self.lines.next()?;
        self.line_number += 1;
        Some(line)
    }

    /// 1-based number of the line last returned by [`SourceLines::next_line`].
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}
