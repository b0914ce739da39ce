//! Fixed-width line buffers.

use crate::hal::{Display, Row, LINE_WIDTH};

/// One 16-character LCD line built left to right.
///
/// Writes past the last column are dropped. Unwritten cells stay blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBuffer {
    cells: [u8; LINE_WIDTH],
    position: usize,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self {
            cells: [b' '; LINE_WIDTH],
            position: 0,
        }
    }
}

impl LineBuffer {
    /// Create a blank line with the cursor in column 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a line holding `text` from column 1.
    pub fn from_text(text: &str) -> Self {
        let mut line = Self::new();
        line.push_str(text);
        line
    }

    /// Append one character. Non-ASCII characters are shown as `?`.
    pub fn push(&mut self, c: char) -> &mut Self {
        if let Some(cell) = self.cells.get_mut(self.position) {
            *cell = if c.is_ascii() { c as u8 } else { b'?' };
        }
        self.position = (self.position + 1).min(LINE_WIDTH);
        self
    }

    /// Append a string.
    pub fn push_str(&mut self, text: &str) -> &mut Self {
        for c in text.chars() {
            self.push(c);
        }
        self
    }

    /// Append `value` as two zero-padded digits (tens, ones).
    pub fn push_decimal2(&mut self, value: u8) -> &mut Self {
        let value = value % 100;
        self.push(char::from(b'0' + value / 10));
        self.push(char::from(b'0' + value % 10))
    }

    /// Append a single decimal digit.
    pub fn push_digit(&mut self, digit: u8) -> &mut Self {
        self.push(char::from(b'0' + digit % 10))
    }

    /// Move the cursor to a 1-based column.
    pub fn move_to(&mut self, col: u8) -> &mut Self {
        self.position = (col.max(1) as usize - 1).min(LINE_WIDTH);
        self
    }

    /// 1-based column the next character lands in.
    pub fn column(&self) -> u8 {
        self.position as u8 + 1
    }

    /// The full 16-character line.
    pub fn as_str(&self) -> &str {
        // Only ASCII is ever stored
        std::str::from_utf8(&self.cells).unwrap_or_default()
    }

    /// The line without trailing blanks.
    pub fn trimmed(&self) -> &str {
        self.as_str().trim_end()
    }
}

impl std::fmt::Display for LineBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete contents of the two-line display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    lines: [LineBuffer; 2],
    /// Underline cursor position, if shown.
    pub cursor: Option<(Row, u8)>,
}

impl Frame {
    /// Create a blank frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a frame from two plain texts.
    pub fn text(first: &str, second: &str) -> Self {
        Self {
            lines: [LineBuffer::from_text(first), LineBuffer::from_text(second)],
            cursor: None,
        }
    }

    /// Borrow a line.
    pub fn line(&self, row: Row) -> &LineBuffer {
        &self.lines[row.index()]
    }

    /// Borrow a line for writing.
    pub fn line_mut(&mut self, row: Row) -> &mut LineBuffer {
        &mut self.lines[row.index()]
    }

    /// Replace a line.
    pub fn set_line(&mut self, row: Row, line: LineBuffer) {
        self.lines[row.index()] = line;
    }

    /// Push the frame to a display.
    pub fn flush<D: Display + ?Sized>(&self, display: &mut D) {
        display.clear();
        for row in Row::ALL {
            display.write_line(row, 1, self.line(row).as_str());
        }
        display.set_cursor(self.cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::SharedDisplay;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_builder() {
        let mut line = LineBuffer::new();
        line.push_str("Stored Tests:").push_decimal2(7);
        assert_eq!(line.as_str(), "Stored Tests:07 ");
        assert_eq!(line.trimmed(), "Stored Tests:07");
        assert_eq!(line.column(), 16);
    }

    #[test]
    fn test_line_truncates() {
        let line = LineBuffer::from_text("0123456789abcdefXYZ");
        assert_eq!(line.as_str(), "0123456789abcdef");
        assert_eq!(line.column(), 17);
    }

    #[test]
    fn test_move_to() {
        let mut line = LineBuffer::from_text("Std Power");
        line.move_to(11).push_str("Mrtr-M");
        assert_eq!(line.as_str(), "Std Power Mrtr-M");
    }

    #[test]
    fn test_non_ascii_replaced() {
        assert_eq!(LineBuffer::from_text("5°").trimmed(), "5?");
    }

    #[test]
    fn test_frame_flush() {
        let handle = SharedDisplay::new();
        let mut lcd = handle.clone();
        let mut frame = Frame::text("Set Clock", "01/02/03 04:05A");
        frame.cursor = Some((Row::Second, 2));
        frame.flush(&mut lcd);
        assert_eq!(handle.text(Row::First), "Set Clock");
        assert_eq!(handle.text(Row::Second), "01/02/03 04:05A");
        assert_eq!(handle.cursor(), Some((Row::Second, 2)));
    }
}
