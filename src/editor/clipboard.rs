//! Clipboard operations: copy a line range, paste it below the cursor.

use super::Editor; // main editor logic
use std::cmp::min; // comparison helpers

/// The single clipboard slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEntry {
    /// The copied lines joined with `'\n'`.
    pub text: String,
    /// 0-based inclusive source range, kept for reporting.
    pub start: usize,
    pub end: usize,
}

impl ClipboardEntry {
    fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

impl Editor {
    /// Copy lines `start..=end` (0-based) into the clipboard.
    ///
    /// Indices are clamped to the document and swapped if reversed.
    pub fn copy_range(&mut self, start: usize, end: usize) {
        let last = self.buf.line_count() - 1;
        let (mut start, mut end) = (min(start, last), min(end, last));
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }

        let text = self.buf.lines()[start..=end].join("\n");
        if let Some(cb) = &mut self.system_clipboard {
            cb.set_text(text.clone()).ok();
        }
        self.clipboard = Some(ClipboardEntry { text, start, end });
        tracing::debug!(target: "edit", start, end, "copy");
        self.set_status(format!("Copied lines {} to {}", start + 1, end + 1));
    }

    /// Insert the clipboard lines below the cursor, in order, moving the cursor onto each.
    ///
    /// Stops early if the document fills up; the status reports what actually went in.
    pub fn paste_after_cursor(&mut self) {
        let Some(entry) = self.clipboard.take() else {
            self.set_status("Nothing to paste");
            return;
        };

        let mut pasted = 0usize;
        for line in entry.lines() {
            if !self.buf.insert_line_after(self.cursor.y, line.to_string()) {
                break;
            }
            self.cursor.y += 1;
            pasted += 1;
        }
        self.clamp_column();
        tracing::debug!(target: "edit", pasted, from = entry.start, to = entry.end, "paste");
        self.clipboard = Some(entry);
        self.set_status(format!("Pasted {pasted} lines"));
    }
}
