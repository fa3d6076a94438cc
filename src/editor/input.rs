//! Input handling: the mode state machine.
//!
//! Navigate is the home state. `d` parks in PendingDelete until the next key, `:` opens the
//! command line, `i` enters Insert; all three come back to Navigate.

use super::Editor;
use crate::commands::{self, LineCommand};
use crate::types::{EscapeFollow, Flow, Key, Mode, Prompt};

impl Editor {
    /// Top-level key handler.
    ///
    /// A `Key::Escape` passed here is a plain, single Escape; the event loop sorts out double
    /// Escapes through [`Editor::handle_escape`].
    pub fn handle_key(&mut self, key: Key) -> Flow {
        if let Key::Resize { rows, .. } = key {
            self.on_resize(rows);
            return Flow::Continue;
        }

        let flow = match self.mode {
            Mode::Navigate => self.navigate_key(key),
            Mode::PendingDelete => self.pending_delete_key(key),
            Mode::Insert => {
                self.insert_key(key);
                Flow::Continue
            }
            Mode::CommandLine => self.command_line_key(key),
        };
        self.ensure_visible();
        self.mark_redraw();
        flow
    }

    /// Handle an Escape once we know what followed it.
    ///
    /// With the command line open every Escape gesture just cancels the prompt, so leaving it
    /// can never save or quit.
    pub fn handle_escape(&mut self, follow: EscapeFollow) -> Flow {
        if self.mode == Mode::CommandLine {
            self.close_prompt();
            self.mark_redraw();
            return Flow::Continue;
        }
        match follow {
            EscapeFollow::Timeout => self.handle_key(Key::Escape),
            EscapeFollow::Repeated => {
                tracing::info!(target: "input", "double escape, exiting without save");
                Flow::Exit
            }
            EscapeFollow::Other(key) => {
                tracing::debug!(target: "input", ?key, "escape sequence discarded");
                Flow::Continue
            }
        }
    }

    fn navigate_key(&mut self, key: Key) -> Flow {
        match key {
            Key::Char('i') => {
                self.mode = Mode::Insert;
                self.set_status("--+ LODGE +--");
            }
            // h/k are left/right and u/j are up/down.
            Key::Char('h') | Key::Left => self.move_left(),
            Key::Char('k') | Key::Right => self.move_right(),
            Key::Char('u') | Key::Up => self.move_up(),
            Key::Char('j') | Key::Down => self.move_down(),
            Key::Char(':') => {
                self.mode = Mode::CommandLine;
                self.prompt = Some(Prompt::default());
            }
            Key::Char('d') => self.mode = Mode::PendingDelete,
            Key::Escape => return self.exit_with_save(),
            _ => {}
        }
        Flow::Continue
    }

    fn pending_delete_key(&mut self, key: Key) -> Flow {
        self.mode = Mode::Navigate;
        if key == Key::Char('d') {
            self.delete_current_line();
            Flow::Continue
        } else {
            self.navigate_key(key)
        }
    }

    fn insert_key(&mut self, key: Key) {
        match key {
            Key::Escape => {
                self.mode = Mode::Navigate;
                self.set_status("");
                self.move_left();
            }
            Key::Enter => self.split_line_at_cursor(),
            Key::Backspace => self.backspace(),
            Key::Delete => self.delete_char_forward(),
            Key::Left => self.move_left(),
            Key::Right => self.move_right(),
            Key::Up => self.move_up(),
            Key::Down => self.move_down(),
            Key::Char(c) if !c.is_control() => self.insert_char(c),
            _ => {}
        }
    }

    /// Handle keys while the `:` prompt is open.
    fn command_line_key(&mut self, key: Key) -> Flow {
        let Some(prompt) = &mut self.prompt else {
            self.mode = Mode::Navigate;
            return Flow::Continue;
        };

        match key {
            Key::Enter => {
                let input = std::mem::take(&mut prompt.input);
                self.close_prompt();
                return self.run_command_line(&input);
            }
            Key::Escape => self.close_prompt(),
            Key::Backspace => {
                if prompt.input.pop().is_none() {
                    self.close_prompt();
                }
            }
            Key::Char(c) if !c.is_control() => prompt.input.push(c),
            _ => {}
        }
        Flow::Continue
    }

    fn close_prompt(&mut self) {
        self.prompt = None;
        self.mode = Mode::Navigate;
    }

    /// Execute one submitted command line. Unknown commands are ignored.
    fn run_command_line(&mut self, input: &str) -> Flow {
        match commands::parse(input) {
            Some(LineCommand::Write) => {
                self.save();
            }
            Some(LineCommand::Quit) => {
                tracing::info!(target: "input", "quit without save");
                return Flow::Exit;
            }
            Some(LineCommand::Copy(Some((start, end)))) => {
                self.copy_range(start.saturating_sub(1), end.saturating_sub(1));
            }
            Some(LineCommand::Copy(None)) => self.copy_range(self.cursor.y, self.cursor.y),
            Some(LineCommand::Paste) => self.paste_after_cursor(),
            None => tracing::debug!(target: "input", input, "unrecognized command ignored"),
        }
        Flow::Continue
    }

    /// Plain Escape in Navigate: save, then leave. A failed save keeps the editor open so the
    /// edits aren't lost, and the status line says so.
    fn exit_with_save(&mut self) -> Flow {
        if self.save() {
            Flow::Exit
        } else {
            self.set_status("error: save unsuccessful, not exiting");
            Flow::Continue
        }
    }
}
