//! Rendering: drawing the editor UI to the terminal.

use super::highlight::class_color;
use super::Editor;
use crate::types::Mode;
use anyhow::Result;
use crossterm::{
    cursor,
    style::{self, Color},
    terminal::{self, ClearType},
    QueueableCommand,
};
use std::io::Write;
use unicode_width::UnicodeWidthChar;

/// Width of the line-number column, not counting the space after it.
const LINE_NUMBER_WIDTH: usize = 4;
/// Columns taken by the line number and its trailing space.
const GUTTER: usize = LINE_NUMBER_WIDTH + 1;
/// Columns reserved on the right of the navigation bar for mode and position.
const NAV_RIGHT: usize = 40;

/// Display width of a char as drawn. Control chars are drawn as a single space.
fn char_width(ch: char) -> usize {
    if ch.is_control() {
        1
    } else {
        UnicodeWidthChar::width(ch).unwrap_or(1)
    }
}

fn printable(ch: char) -> char {
    if ch.is_control() {
        ' '
    } else {
        ch
    }
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

impl Editor {
    /// Render the entire UI into a `width` x `height` screen.
    ///
    /// Does nothing if no state changed since the last call.
    pub fn render<W: Write>(&mut self, out: &mut W, width: u16, height: u16) -> Result<()> {
        if !self.needs_redraw {
            return Ok(());
        }
        self.needs_redraw = false;

        let width = usize::from(width);
        let height = usize::from(height);
        let nav_y = height.saturating_sub(2);
        let status_y = height.saturating_sub(1);

        out.queue(cursor::Hide)?;
        out.queue(style::ResetColor)?;

        for row in 0..nav_y {
            out.queue(cursor::MoveTo(0, to_u16(row)))?;
            out.queue(terminal::Clear(ClearType::CurrentLine))?;
            let y = self.scroll_y + row;
            if row < self.visible_rows && y < self.buf.line_count() {
                self.render_line(out, y, width)?;
            }
        }

        self.render_nav_bar(out, nav_y, width)?;
        self.render_status_line(out, status_y, width)?;

        let (cx, cy) = self.screen_cursor(status_y);
        out.queue(cursor::MoveTo(to_u16(cx.min(width.saturating_sub(1))), to_u16(cy)))?;
        out.queue(cursor::Show)?;
        out.flush()?;
        Ok(())
    }

    /// Line number in green, then the highlighted text cut to the screen width.
    fn render_line<W: Write>(&self, out: &mut W, y: usize, width: usize) -> Result<()> {
        out.queue(style::SetForegroundColor(Color::Green))?;
        out.queue(style::Print(format!("{:>w$} ", y + 1, w = LINE_NUMBER_WIDTH)))?;
        out.queue(style::ResetColor)?;

        let avail = width.saturating_sub(GUTTER);
        let mut used = 0;
        'segments: for (class, run) in self.highlighter.segments(self.buf.line(y)) {
            match class {
                Some(c) => out.queue(style::SetForegroundColor(class_color(c)))?,
                None => out.queue(style::ResetColor)?,
            };
            let mut visible = String::with_capacity(run.len());
            for ch in run.chars() {
                let w = char_width(ch);
                if used + w > avail {
                    out.queue(style::Print(&visible))?;
                    break 'segments;
                }
                used += w;
                visible.push(printable(ch));
            }
            out.queue(style::Print(&visible))?;
        }
        out.queue(style::ResetColor)?;
        Ok(())
    }

    /// File name on the left; mode and 1-based position on the right.
    fn render_nav_bar<W: Write>(&self, out: &mut W, y: usize, width: usize) -> Result<()> {
        let left_w = width.saturating_sub(NAV_RIGHT);
        let name = self.file_path.display().to_string();
        let name: String = name.chars().take(left_w).collect();
        let right = format!("{} | {},{}", self.mode.label(), self.cursor.y + 1, self.cursor.x + 1);
        let mut bar = format!("{name:<left_w$}{right}");
        let bar_len = bar.chars().count();
        if bar_len < width {
            bar.push_str(&" ".repeat(width - bar_len));
        }
        let bar: String = bar.chars().take(width).collect();

        out.queue(cursor::MoveTo(0, to_u16(y)))?;
        out.queue(style::SetBackgroundColor(Color::Yellow))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(style::Print(bar))?;
        out.queue(style::ResetColor)?;
        Ok(())
    }

    /// The status text, or the `:` prompt while the command line is open.
    fn render_status_line<W: Write>(&self, out: &mut W, y: usize, width: usize) -> Result<()> {
        let text = match &self.prompt {
            Some(p) => format!(":{}", p.input),
            None => self.status().to_string(),
        };
        let text: String = text.chars().map(printable).take(width).collect();

        out.queue(cursor::MoveTo(0, to_u16(y)))?;
        out.queue(terminal::Clear(ClearType::CurrentLine))?;
        out.queue(style::SetForegroundColor(Color::Green))?;
        out.queue(style::Print(text))?;
        out.queue(style::ResetColor)?;
        Ok(())
    }

    /// Where the terminal cursor goes: end of the prompt, or the document cursor past the gutter.
    fn screen_cursor(&self, status_y: usize) -> (usize, usize) {
        if self.mode == Mode::CommandLine {
            let input_w: usize = self.prompt.as_ref().map_or(0, |p| p.input.chars().map(char_width).sum());
            return (1 + input_w, status_y);
        }
        let col: usize = self.buf.line(self.cursor.y).chars().take(self.cursor.x).map(char_width).sum();
        (GUTTER + col, self.cursor.y.saturating_sub(self.scroll_y))
    }
}
