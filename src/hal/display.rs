//! Two-line character LCD.

use parking_lot::RwLock;
use std::sync::Arc;

/// Characters per LCD line.
pub const LINE_WIDTH: usize = 16;

/// LCD line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Row {
    /// Top line.
    First = 1,
    /// Bottom line.
    Second = 2,
}

impl Row {
    /// Both rows, top first.
    pub const ALL: [Row; 2] = [Row::First, Row::Second];

    /// Zero-based line index.
    pub fn index(&self) -> usize {
        *self as usize - 1
    }
}

/// Character display. All operations block until the controller is ready.
#[cfg_attr(test, mockall::automock)]
pub trait Display {
    /// Blank both lines and home the cursor.
    fn clear(&mut self);

    /// Write `text` on `row` starting at 1-based column `col`.
    fn write_line(&mut self, row: Row, col: u8, text: &str);

    /// Show the underline cursor at a 1-based column, or hide it.
    fn set_cursor(&mut self, position: Option<(Row, u8)>) {
        let _ = position;
    }
}

impl<T: Display + ?Sized> Display for Box<T> {
    fn clear(&mut self) {
        (**self).clear()
    }

    fn write_line(&mut self, row: Row, col: u8, text: &str) {
        (**self).write_line(row, col, text)
    }

    fn set_cursor(&mut self, position: Option<(Row, u8)>) {
        (**self).set_cursor(position)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LcdState {
    cells: [[u8; LINE_WIDTH]; 2],
    cursor: Option<(Row, u8)>,
    writes: usize,
}

impl Default for LcdState {
    fn default() -> Self {
        Self {
            cells: [[b' '; LINE_WIDTH]; 2],
            cursor: None,
            writes: 0,
        }
    }
}

/// In-memory LCD whose contents can be inspected through any clone.
#[derive(Debug, Clone, Default)]
pub struct SharedDisplay {
    state: Arc<RwLock<LcdState>>,
}

impl SharedDisplay {
    /// Create a blank display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Full 16-character contents of a line.
    pub fn line(&self, row: Row) -> String {
        let state = self.state.read();
        String::from_utf8_lossy(&state.cells[row.index()]).into_owned()
    }

    /// Contents of a line without trailing blanks.
    pub fn text(&self, row: Row) -> String {
        self.line(row).trim_end().to_string()
    }

    /// Current cursor position, if shown.
    pub fn cursor(&self) -> Option<(Row, u8)> {
        self.state.read().cursor
    }

    /// Number of `write_line` calls so far.
    pub fn write_count(&self) -> usize {
        self.state.read().writes
    }
}

impl Display for SharedDisplay {
    fn clear(&mut self) {
        let mut state = self.state.write();
        state.cells = [[b' '; LINE_WIDTH]; 2];
    }

    fn write_line(&mut self, row: Row, col: u8, text: &str) {
        let mut state = self.state.write();
        state.writes += 1;
        let start = (col.max(1) - 1) as usize;
        let line = &mut state.cells[row.index()];
        for (cell, byte) in line.iter_mut().skip(start).zip(text.bytes()) {
            *cell = byte;
        }
    }

    fn set_cursor(&mut self, position: Option<(Row, u8)>) {
        self.state.write().cursor = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_display_write() {
        let handle = SharedDisplay::new();
        let mut lcd = handle.clone();
        lcd.write_line(Row::First, 1, "Std Power");
        lcd.write_line(Row::First, 11, "Mrtr-M");
        assert_eq!(handle.line(Row::First), "Std Power Mrtr-M");
        assert_eq!(handle.text(Row::Second), "");
        assert_eq!(handle.write_count(), 2);
    }

    #[test]
    fn test_shared_display_truncates() {
        let mut lcd = SharedDisplay::new();
        lcd.write_line(Row::Second, 10, "0123456789");
        assert_eq!(lcd.line(Row::Second), "         0123456");
    }

    #[test]
    fn test_shared_display_clear_keeps_cursor() {
        let mut lcd = SharedDisplay::new();
        lcd.write_line(Row::First, 1, "Calibrate");
        lcd.set_cursor(Some((Row::Second, 2)));
        lcd.clear();
        assert_eq!(lcd.text(Row::First), "");
        assert_eq!(lcd.cursor(), Some((Row::Second, 2)));
    }
}
