//! Character- and line-level edits at the cursor.
//!
//! Every operation here is total: when a capacity ceiling gets in the way the edit is simply
//! not made. Only line deletion reports to the status line.

use super::Editor;
use crate::types::Pos;

impl Editor {
    /// Insert `c` at the cursor and step past it. No-op on a full line.
    pub fn insert_char(&mut self, c: char) {
        if self.buf.insert_char(self.cursor, c) {
            self.cursor.x += 1;
            self.mark_redraw();
        } else {
            tracing::debug!(target: "edit", row = self.cursor.y, "line full, char dropped");
        }
    }

    /// Delete-key behavior:
    /// - within the line, delete the character under the cursor
    /// - at end of line, pull the next line up onto this one
    pub fn delete_char_forward(&mut self) {
        let changed = if self.cursor.x < self.buf.line_len_chars(self.cursor.y) {
            self.buf.remove_char(self.cursor)
        } else {
            self.buf.join_with_next(self.cursor.y)
        };
        if changed {
            self.mark_redraw();
        }
    }

    /// Enter in Insert mode: move everything after the cursor onto a new line below.
    ///
    /// At the end of a line this opens an empty line. Nothing happens if the document is full.
    pub fn split_line_at_cursor(&mut self) {
        if !self.buf.has_room() {
            tracing::debug!(target: "edit", "document full, line not split");
            return;
        }
        let tail = self.buf.split_off(self.cursor);
        self.buf.insert_line_after(self.cursor.y, tail);
        self.cursor = Pos { y: self.cursor.y + 1, x: 0 };
        self.mark_redraw();
    }

    /// Backspace behavior:
    /// - if `x > 0`, delete the previous character
    /// - at the start of a line (other than the first), merge it into the previous line
    pub fn backspace(&mut self) {
        if self.cursor.x > 0 {
            let before = Pos { y: self.cursor.y, x: self.cursor.x - 1 };
            if self.buf.remove_char(before) {
                self.cursor = before;
                self.mark_redraw();
            }
        } else if self.cursor.y > 0 {
            let prev = self.cursor.y - 1;
            let prev_len = self.buf.line_len_chars(prev);
            if self.buf.join_with_next(prev) {
                self.cursor = Pos { y: prev, x: prev_len };
                self.mark_redraw();
            }
        }
    }

    /// Remove the cursor line (or clear it if it is the only one) and report it.
    pub fn delete_current_line(&mut self) {
        let removed = self.buf.delete_line(self.cursor.y);
        if self.cursor.y == self.buf.line_count() {
            self.cursor.y -= 1;
        }
        self.cursor.x = 0;
        if removed {
            self.set_status(format!("Deleted line {}", self.cursor.y + 1));
        } else {
            self.set_status("Deleted line content");
        }
        tracing::debug!(target: "edit", row = self.cursor.y, removed, "delete_line");
    }
}
