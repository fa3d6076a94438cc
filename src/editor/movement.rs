//! Cursor movement and keeping the cursor inside the viewport.

use super::Editor;
use std::cmp::min;

impl Editor {
    pub fn move_left(&mut self) {
        self.cursor.x = self.cursor.x.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor.x < self.buf.line_len_chars(self.cursor.y) {
            self.cursor.x += 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor.y > 0 {
            self.cursor.y -= 1;
            self.clamp_column();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor.y + 1 < self.buf.line_count() {
            self.cursor.y += 1;
            self.clamp_column();
        }
    }

    /// Pull the column back onto the current line (it may be shorter than the last one).
    pub(crate) fn clamp_column(&mut self) {
        self.cursor.x = min(self.cursor.x, self.buf.line_len_chars(self.cursor.y));
    }

    /// Update `scroll_y` so the cursor row is on screen.
    pub fn ensure_visible(&mut self) {
        self.cursor = self.buf.clamp_pos(self.cursor);
        let old_scroll_y = self.scroll_y;

        if self.cursor.y < self.scroll_y {
            self.scroll_y = self.cursor.y;
        } else if self.cursor.y >= self.scroll_y + self.visible_rows {
            self.scroll_y = self.cursor.y + 1 - self.visible_rows;
        }

        if old_scroll_y != self.scroll_y {
            self.mark_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::editor::Editor;
    use crate::types::Pos;

    fn editor(text: &str, rows: usize) -> Editor {
        Editor::from_text(text, &Config::default(), rows)
    }

    #[test]
    fn horizontal_moves_stop_at_line_bounds() {
        let mut ed = editor("ab", 5);
        ed.move_left();
        assert_eq!(ed.cursor.x, 0);
        ed.move_right();
        ed.move_right();
        ed.move_right();
        assert_eq!(ed.cursor.x, 2);
    }

    #[test]
    fn vertical_moves_clamp_column() {
        let mut ed = editor("long line\nab\nlonger", 5);
        ed.cursor = Pos { y: 0, x: 7 };
        ed.move_down();
        assert_eq!(ed.cursor, Pos { y: 1, x: 2 });
        ed.move_down();
        ed.move_down();
        assert_eq!(ed.cursor, Pos { y: 2, x: 2 });
        ed.move_up();
        ed.move_up();
        ed.move_up();
        assert_eq!(ed.cursor, Pos { y: 0, x: 2 });
    }

    #[test]
    fn viewport_follows_cursor_both_ways() {
        let text: String = (0..20).map(|i| format!("line {i}\n")).collect();
        let mut ed = editor(&text, 5);
        for _ in 0..7 {
            ed.move_down();
            ed.ensure_visible();
        }
        assert_eq!(ed.cursor.y, 7);
        assert_eq!(ed.scroll_y, 3);

        for _ in 0..6 {
            ed.move_up();
            ed.ensure_visible();
        }
        assert_eq!(ed.cursor.y, 1);
        assert_eq!(ed.scroll_y, 1);
    }

    #[test]
    fn ensure_visible_repairs_out_of_range_cursor() {
        let mut ed = editor("a\nb", 5);
        ed.cursor = Pos { y: 9, x: 9 };
        ed.ensure_visible();
        assert_eq!(ed.cursor, Pos { y: 1, x: 1 });
    }
}
