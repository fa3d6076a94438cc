//! Editor: the session state and the key-driven event loop.

mod clipboard;
mod edit;
mod file_ops;
mod highlight;
mod input;
mod movement;
mod render;

use crate::buffer::Buffer;
use crate::config::Config;
use crate::terminal::{escape_follow, KeySource};
use crate::types::{Flow, Key, Mode, Pos, Prompt};
use anyhow::Result;
use clipboard::ClipboardEntry;
use highlight::Highlighter;
use std::path::PathBuf;
use std::time::Duration;

/// The top-level application state.
///
/// Think of `Editor` as "the session": it owns the document, the cursor and viewport, the
/// mode, the clipboard and the status line. Nothing in here is global, so any number of
/// editors can live side by side (the tests rely on that).
pub struct Editor {
    /// The editable document (lines of text).
    pub buf: Buffer,
    /// Cursor position in the buffer.
    pub cursor: Pos,
    /// First document line shown on screen.
    pub scroll_y: usize,
    /// How many document lines fit on screen.
    pub(crate) visible_rows: usize,
    /// Path we load from and save to. Fixed for the whole session.
    pub file_path: PathBuf,
    /// Current mode.
    pub mode: Mode,
    /// Command-line input while `mode == Mode::CommandLine`.
    pub(crate) prompt: Option<Prompt>,
    /// Outcome of the last operation that reported one.
    pub(crate) status: String,
    /// Most recent copy, if any.
    pub(crate) clipboard: Option<ClipboardEntry>,
    /// Best-effort mirror of copies into the OS clipboard.
    pub(crate) system_clipboard: Option<arboard::Clipboard>,
    /// Syntax classes for rendering.
    pub(crate) highlighter: Highlighter,
    /// Whether the screen needs to be redrawn.
    pub(crate) needs_redraw: bool,
    /// Lookahead window for the double-Escape gesture.
    escape_timeout: Duration,
}

impl Editor {
    /// Create an editor for `path`, loading it if it exists.
    ///
    /// `visible_rows` is the number of document lines the screen can show.
    pub fn new(path: PathBuf, config: &Config, visible_rows: usize) -> Self {
        let buf = Buffer::load(&path, config.limits());
        tracing::info!(
            target: "runtime",
            file = %path.display(),
            line_count = buf.line_count(),
            "session_start"
        );
        Self::with_buffer(buf, path, config, visible_rows)
    }

    fn with_buffer(buf: Buffer, file_path: PathBuf, config: &Config, visible_rows: usize) -> Self {
        Self {
            buf,
            cursor: Pos::default(),
            scroll_y: 0,
            visible_rows: visible_rows.max(1),
            file_path,
            mode: Mode::Navigate,
            prompt: None,
            status: String::new(),
            clipboard: None,
            system_clipboard: None,
            highlighter: Highlighter::new(),
            needs_redraw: true,
            escape_timeout: config.escape_timeout(),
        }
    }

    /// Connect the OS clipboard. `arboard` can fail in headless / unusual terminals, in which
    /// case copies simply stay inside the editor.
    pub fn attach_system_clipboard(&mut self) {
        self.system_clipboard = arboard::Clipboard::new().ok();
        if self.system_clipboard.is_none() {
            tracing::debug!(target: "runtime", "system clipboard unavailable");
        }
    }

    /// Drive the editor until an exit key: redraw, read a key, dispatch it, repeat.
    pub fn run<K, F>(&mut self, keys: &mut K, mut redraw: F) -> Result<()>
    where
        K: KeySource + ?Sized,
        F: FnMut(&mut Self) -> Result<()>,
    {
        loop {
            redraw(self)?;
            let key = keys.read_key()?;
            let flow = if key == Key::Escape {
                let follow = escape_follow(keys, self.escape_timeout)?;
                self.handle_escape(follow)
            } else {
                self.handle_key(key)
            };
            if flow == Flow::Exit {
                tracing::info!(target: "runtime", "session_end");
                return Ok(());
            }
        }
    }

    /// Mark that the screen needs to be redrawn.
    pub fn mark_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Replace the status line text.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
        self.mark_redraw();
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Called when the terminal is resized: two rows go to the navigation bar and status line.
    pub fn on_resize(&mut self, rows: u16) {
        self.visible_rows = usize::from(rows).saturating_sub(2).max(1);
        self.ensure_visible();
        self.mark_redraw();
    }
}

#[cfg(test)]
impl Editor {
    /// An editor over in-memory text; the path is only used if a test saves.
    pub(crate) fn from_text(text: &str, config: &Config, visible_rows: usize) -> Self {
        let buf = Buffer::from_string(text, config.limits());
        Self::with_buffer(buf, PathBuf::from("untitled.txt"), config, visible_rows)
    }
}
