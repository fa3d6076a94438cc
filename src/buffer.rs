//! The document buffer: stores lines of text and provides editing operations.

use crate::types::{LineEnding, Pos}; // core editor types
use crate::utils::{char_to_byte_index, truncate_chars}; // utf-8 index conversion
use std::cmp::min; // comparison helpers
use std::fs; // file system access
use std::io::{self, Write}; // streaming save
use std::path::Path; // file path handling

/// Capacity ceilings for a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Most lines the document may hold.
    pub max_lines: usize,
    /// Most chars a single line may hold.
    pub max_line_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_lines: 1000, max_line_len: 1000 }
    }
}

/// The document buffer: a list of lines (each line is a `String`) with a fixed capacity.
///
/// A `Vec<String>` keeps the model simple; the capacity ceiling bounds its cost. Every growth
/// path checks the ceiling and refuses (returns `false`) instead of truncating.
///
/// There is always at least one line: an empty document is a single empty line.
#[derive(Debug, Clone)]
pub struct Buffer {
    lines: Vec<String>,
    pub line_ending: LineEnding,
    limits: Limits,
}

impl Buffer {
    /// Create a new empty buffer with a single empty line and default to LF.
    pub fn new(limits: Limits) -> Self {
        Self {
            lines: vec![String::new()],
            line_ending: LineEnding::LF,
            limits,
        }
    }

    /// Build a buffer from on-disk text, detecting and honoring line endings.
    ///
    /// A final terminator does not start another line. Lines past `max_lines` are dropped and
    /// overlong lines are cut to `max_line_len`.
    ///
    /// The buffer has one line ending. Any `"\r\n"` in the input makes it CRLF, so a file with
    /// mixed endings is saved back with CRLF on every line.
    pub fn from_string(s: &str, limits: Limits) -> Self {
        let line_ending = if s.contains("\r\n") {
            LineEnding::CRLF
        } else {
            LineEnding::LF
        };

        let body = s.strip_suffix('\n').unwrap_or(s);
        let mut lines: Vec<String> = Vec::new();
        let mut truncated = 0usize;
        if !s.is_empty() {
            for record in body.split('\n') {
                if lines.len() == limits.max_lines {
                    break;
                }
                let mut line = record.strip_suffix('\r').unwrap_or(record).to_string();
                if line.chars().count() > limits.max_line_len {
                    truncate_chars(&mut line, limits.max_line_len);
                    truncated += 1;
                }
                lines.push(line);
            }
        }

        let total = if s.is_empty() { 0 } else { body.split('\n').count() };
        if total > lines.len() || truncated > 0 {
            tracing::warn!(
                target: "io",
                dropped_lines = total - lines.len(),
                truncated_lines = truncated,
                "document exceeds capacity"
            );
        }

        if lines.is_empty() {
            lines.push(String::new());
        }

        Self { lines, line_ending, limits }
    }

    /// Read a file into a buffer.
    ///
    /// Never fails: if the file can't be read the result is an empty document, and bytes that
    /// aren't valid UTF-8 are replaced.
    pub fn load(path: &Path, limits: Limits) -> Self {
        match fs::read(path) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                let buf = Self::from_string(&text, limits);
                tracing::debug!(
                    target: "io",
                    file = %path.display(),
                    size_bytes = bytes.len(),
                    line_count = buf.line_count(),
                    "file_read_ok"
                );
                buf
            }
            Err(e) => {
                tracing::warn!(target: "io", file = %path.display(), error = %e, "file_open_error");
                Self::new(limits)
            }
        }
    }

    /// Stream the buffer to `w`, every line followed by the line terminator.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        let eol = self.line_ending.as_str();
        for line in &self.lines {
            w.write_all(line.as_bytes())?;
            w.write_all(eol.as_bytes())?;
        }
        w.flush()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, y: usize) -> &str {
        self.lines.get(y).map_or("", String::as_str)
    }

    pub fn line_len_chars(&self, y: usize) -> usize {
        self.lines.get(y).map_or(0, |l| l.chars().count())
    }

    /// Whether another line fits.
    pub fn has_room(&self) -> bool {
        self.lines.len() < self.limits.max_lines
    }

    /// Clamp a position to a valid line and a valid column within that line.
    pub fn clamp_pos(&self, mut p: Pos) -> Pos {
        p.y = min(p.y, self.lines.len() - 1);
        p.x = min(p.x, self.line_len_chars(p.y));
        p
    }

    /// Insert a single character at a position.
    ///
    /// Returns `false` (and leaves the line alone) when the line is already full.
    pub fn insert_char(&mut self, p: Pos, ch: char) -> bool {
        if self.line_len_chars(p.y) >= self.limits.max_line_len {
            return false;
        }
        let Some(line) = self.lines.get_mut(p.y) else { return false; };
        let bi = char_to_byte_index(line, p.x);
        line.insert(bi, ch);
        true
    }

    /// Remove the character at a position. Returns `false` if there is none.
    pub fn remove_char(&mut self, p: Pos) -> bool {
        let Some(line) = self.lines.get_mut(p.y) else { return false; };
        if p.x >= line.chars().count() {
            return false;
        }
        let bi = char_to_byte_index(line, p.x);
        line.remove(bi);
        true
    }

    /// Cut line `y` at char `x`, returning the tail.
    pub fn split_off(&mut self, p: Pos) -> String {
        match self.lines.get_mut(p.y) {
            Some(line) => {
                let bi = char_to_byte_index(line, p.x);
                line.split_off(bi)
            }
            None => String::new(),
        }
    }

    /// Insert a new line right after `row`, shifting later lines down.
    ///
    /// `text` is cut to `max_line_len`. Returns `false` when the document is full.
    pub fn insert_line_after(&mut self, row: usize, mut text: String) -> bool {
        if !self.has_room() {
            return false;
        }
        text.retain(|c| c != '\n');
        truncate_chars(&mut text, self.limits.max_line_len);
        let at = min(row + 1, self.lines.len());
        self.lines.insert(at, text);
        true
    }

    /// Remove line `row`, shifting later lines up.
    ///
    /// The last remaining line is cleared instead of removed. Returns `true` if a line was
    /// actually removed.
    pub fn delete_line(&mut self, row: usize) -> bool {
        if row >= self.lines.len() {
            return false;
        }
        if self.lines.len() == 1 {
            self.lines[0].clear();
            return false;
        }
        self.lines.remove(row);
        true
    }

    /// Append line `row + 1` onto line `row` and remove it.
    ///
    /// Returns `false` if there is no next line or the merged line would not fit.
    pub fn join_with_next(&mut self, row: usize) -> bool {
        if row + 1 >= self.lines.len() {
            return false;
        }
        if self.line_len_chars(row) + self.line_len_chars(row + 1) > self.limits.max_line_len {
            return false;
        }
        let next = self.lines.remove(row + 1);
        self.lines[row].push_str(&next);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn buf(s: &str) -> Buffer {
        Buffer::from_string(s, Limits::default())
    }

    fn saved(b: &Buffer) -> String {
        let mut out = Vec::new();
        b.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    // ==================== Buffer creation tests ====================

    #[test]
    fn new_buffer_has_one_empty_line() {
        let b = Buffer::new(Limits::default());
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line(0), "");
        assert_eq!(b.line_ending, LineEnding::LF);
    }

    #[test]
    fn from_string_empty() {
        let b = buf("");
        assert_eq!(b.lines(), [""]);
    }

    #[test]
    fn from_string_trailing_newline_is_a_terminator() {
        assert_eq!(buf("a\nb\n").lines(), ["a", "b"]);
        assert_eq!(buf("a\nb").lines(), ["a", "b"]);
        assert_eq!(buf("\n").lines(), [""]);
        assert_eq!(buf("a\n\n").lines(), ["a", ""]);
    }

    #[test]
    fn from_string_crlf_lines() {
        let b = buf("line1\r\nline2\r\n");
        assert_eq!(b.lines(), ["line1", "line2"]);
        assert_eq!(b.line_ending, LineEnding::CRLF);
    }

    #[test]
    fn mixed_line_endings_are_saved_as_crlf() {
        let b = buf("a\r\nb\nc\n");
        assert_eq!(b.lines(), ["a", "b", "c"]);
        assert_eq!(saved(&b), "a\r\nb\r\nc\r\n");
    }

    #[test]
    fn from_string_respects_capacity() {
        let limits = Limits { max_lines: 2, max_line_len: 3 };
        let b = Buffer::from_string("abcdef\nxy\nz\n", limits);
        assert_eq!(b.lines(), ["abc", "xy"]);
    }

    // ==================== Load / save tests ====================

    #[test]
    fn load_missing_file_gives_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let b = Buffer::load(&dir.path().join("nope.txt"), Limits::default());
        assert_eq!(b.lines(), [""]);
    }

    #[test]
    fn load_then_save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        for content in ["one\ntwo\n\nfour\n", "a\r\nb\r\n", "\n"] {
            let path = dir.path().join("doc.txt");
            fs::write(&path, content).unwrap();
            let b = Buffer::load(&path, Limits::default());
            assert_eq!(saved(&b), content);
        }
    }

    #[test]
    fn save_terminates_the_last_line() {
        assert_eq!(saved(&buf("a\nb")), "a\nb\n");
        assert_eq!(saved(&buf("")), "\n");
    }

    #[test]
    fn load_replaces_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.txt");
        fs::write(&path, b"ok\n\xff\n").unwrap();
        let b = Buffer::load(&path, Limits::default());
        assert_eq!(b.lines(), ["ok", "\u{fffd}"]);
    }

    // ==================== Char tests ====================

    #[test]
    fn insert_char_unicode() {
        let mut b = buf("hllo");
        assert!(b.insert_char(Pos { y: 0, x: 1 }, 'é'));
        assert_eq!(b.line(0), "héllo");
    }

    #[test]
    fn insert_char_refuses_full_line() {
        let mut b = Buffer::from_string("abc", Limits { max_lines: 10, max_line_len: 3 });
        assert!(!b.insert_char(Pos { y: 0, x: 1 }, 'z'));
        assert_eq!(b.line(0), "abc");
    }

    #[test]
    fn remove_char_past_end_is_noop() {
        let mut b = buf("ab");
        assert!(!b.remove_char(Pos { y: 0, x: 2 }));
        assert!(b.remove_char(Pos { y: 0, x: 0 }));
        assert_eq!(b.line(0), "b");
    }

    #[test]
    fn split_off_returns_tail() {
        let mut b = buf("hello world");
        assert_eq!(b.split_off(Pos { y: 0, x: 5 }), " world");
        assert_eq!(b.line(0), "hello");
    }

    // ==================== Line tests ====================

    #[test]
    fn insert_line_after_shifts_down() {
        let mut b = buf("a\nc");
        assert!(b.insert_line_after(0, "b".into()));
        assert_eq!(b.lines(), ["a", "b", "c"]);
        assert!(b.insert_line_after(2, "d".into()));
        assert_eq!(b.lines(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn insert_line_after_refuses_when_full() {
        let mut b = Buffer::from_string("a\nb", Limits { max_lines: 2, max_line_len: 10 });
        assert!(!b.insert_line_after(0, String::new()));
        assert_eq!(b.line_count(), 2);
    }

    #[test]
    fn delete_line_shifts_up() {
        let mut b = buf("a\nb\nc");
        assert!(b.delete_line(1));
        assert_eq!(b.lines(), ["a", "c"]);
    }

    #[test]
    fn delete_sole_line_clears_it() {
        let mut b = buf("x");
        assert!(!b.delete_line(0));
        assert_eq!(b.lines(), [""]);
    }

    #[test]
    fn join_with_next_merges() {
        let mut b = buf("line1\nline2\nline3");
        assert!(b.join_with_next(0));
        assert_eq!(b.lines(), ["line1line2", "line3"]);
        assert!(!b.join_with_next(1));
    }

    #[test]
    fn join_with_next_respects_line_capacity() {
        let mut b = Buffer::from_string("abc\nde", Limits { max_lines: 10, max_line_len: 4 });
        assert!(!b.join_with_next(0));
        assert_eq!(b.lines(), ["abc", "de"]);
    }

    #[test]
    fn clamp_pos_works() {
        let b = buf("short\nlonger line");
        assert_eq!(b.clamp_pos(Pos { y: 100, x: 0 }).y, 1);
        assert_eq!(b.clamp_pos(Pos { y: 0, x: 100 }).x, 5);
    }

    proptest! {
        #[test]
        fn saving_a_loaded_document_round_trips(lines in prop::collection::vec("[a-z \\t]{0,12}", 1..20)) {
            let text: String = lines.iter().map(|l| format!("{l}\n")).collect();
            let b = buf(&text);
            prop_assert_eq!(b.line_count(), lines.len());
            prop_assert_eq!(saved(&b), text);
        }

        #[test]
        fn line_count_never_drops_to_zero(n in 1usize..8, deletes in prop::collection::vec(0usize..10, 0..20)) {
            let text = vec!["x"; n].join("\n");
            let mut b = buf(&text);
            for row in deletes {
                b.delete_line(row);
                prop_assert!(b.line_count() >= 1);
            }
        }
    }
}
