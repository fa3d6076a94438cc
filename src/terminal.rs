//! Terminal setup and teardown, and turning terminal events into editor keys.

use crate::types::{EscapeFollow, Key};
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style,
    terminal::{self, ClearType},
    ExecutableCommand,
};
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

/// RAII guard for terminal state.
///
/// In Rust, "RAII" means you acquire a resource in `new()` and release it in `Drop`.
/// That guarantees cleanup even if the function returns early.
pub struct TerminalGuard {
    /// Whether we pushed keyboard enhancement flags that must be popped again.
    enhanced_keys: bool,
}

impl TerminalGuard {
    /// Enable raw mode and the alternate screen.
    ///
    /// Where the terminal speaks the kitty keyboard protocol, Escape is also switched to an
    /// unambiguous encoding. Legacy terminals send a bare ESC byte, and crossterm folds two ESC
    /// bytes arriving in one read into a single Escape event.
    pub fn new(stdout: &mut Stdout) -> Result<Self> {
        terminal::enable_raw_mode().context("enable_raw_mode failed")?;
        stdout.execute(terminal::EnterAlternateScreen)?;
        stdout.execute(terminal::Clear(ClearType::All))?;

        let enhanced_keys = matches!(terminal::supports_keyboard_enhancement(), Ok(true));
        if enhanced_keys {
            stdout.execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES))?;
        }
        tracing::debug!(target: "runtime", enhanced_keys, "terminal ready");

        stdout.flush()?;
        Ok(Self { enhanced_keys })
    }
}

impl Drop for TerminalGuard {
    /// Always restore terminal state when exiting the editor.
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if self.enhanced_keys {
            let _ = stdout.execute(PopKeyboardEnhancementFlags);
        }
        let _ = stdout.execute(style::ResetColor);
        let _ = stdout.execute(cursor::Show);
        let _ = stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
    }
}

/// Anything that can hand the editor keys: the real terminal, or a script in tests.
pub trait KeySource {
    /// Block until the next key.
    fn read_key(&mut self) -> Result<Key>;

    /// Wait at most `timeout` for a key. `Ok(None)` means nothing arrived.
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<Key>>;
}

/// Decide what an Escape was: alone, doubled, or the start of something else.
///
/// This is the only read that does not block indefinitely.
pub fn escape_follow<K: KeySource + ?Sized>(keys: &mut K, timeout: Duration) -> Result<EscapeFollow> {
    Ok(match keys.poll_key(timeout)? {
        None => EscapeFollow::Timeout,
        Some(Key::Escape) => EscapeFollow::Repeated,
        Some(other) => EscapeFollow::Other(other),
    })
}

/// Raw terminal events, before they become keys.
pub trait EventSource {
    /// Wait at most `timeout` for an event to become available.
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Block until the next event.
    fn read(&mut self) -> io::Result<Event>;
}

/// The process terminal, through crossterm's global event reader.
pub struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        event::read()
    }
}

/// Keys decoded from crossterm events.
pub struct CrosstermKeys<E = TerminalEvents> {
    events: E,
}

impl<E: EventSource> CrosstermKeys<E> {
    pub fn new(events: E) -> Self {
        Self { events }
    }
}

impl<E: EventSource> KeySource for CrosstermKeys<E> {
    fn read_key(&mut self) -> Result<Key> {
        loop {
            let ev = self.events.read().context("reading terminal event")?;
            if let Some(key) = translate(&ev) {
                return Ok(key);
            }
        }
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<Key>> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !self.events.poll(remaining).context("polling terminal events")? {
                return Ok(None);
            }
            if let Some(key) = translate(&self.events.read().context("reading terminal event")?) {
                return Ok(Some(key));
            }
            if remaining.is_zero() {
                return Ok(None);
            }
        }
    }
}

/// Map a crossterm event to an editor key. Events the editor doesn't care about map to `None`.
fn translate(ev: &Event) -> Option<Key> {
    match ev {
        Event::Key(key) => translate_key(key),
        Event::Resize(cols, rows) => Some(Key::Resize { cols: *cols, rows: *rows }),
        _ => None,
    }
}

fn translate_key(key: &KeyEvent) -> Option<Key> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    Some(match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Escape,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        _ => return None,
    })
}

/// Events with arrival gaps, for driving [`CrosstermKeys`] without a terminal.
///
/// Each entry is `(gap, event)`: the event turns up `gap` after the previous one was taken.
/// Polling consumes the waited time from the gap instead of sleeping.
#[cfg(test)]
pub(crate) struct TimedEvents(pub std::collections::VecDeque<(Duration, Event)>);

#[cfg(test)]
impl EventSource for TimedEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        match self.0.front_mut() {
            Some((gap, _)) if *gap <= timeout => Ok(true),
            Some((gap, _)) => {
                *gap -= timeout;
                Ok(false)
            }
            None => Ok(false),
        }
    }

    fn read(&mut self) -> io::Result<Event> {
        self.0
            .pop_front()
            .map(|(_, ev)| ev)
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more events"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::collections::VecDeque;

    struct Queue(VecDeque<Key>);

    impl KeySource for Queue {
        fn read_key(&mut self) -> Result<Key> {
            self.0.pop_front().context("no more keys")
        }

        fn poll_key(&mut self, _timeout: Duration) -> Result<Option<Key>> {
            Ok(self.0.pop_front())
        }
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn translates_named_keys() {
        assert_eq!(translate(&press(KeyCode::Char('a'))), Some(Key::Char('a')));
        assert_eq!(translate(&press(KeyCode::Enter)), Some(Key::Enter));
        assert_eq!(translate(&press(KeyCode::Esc)), Some(Key::Escape));
        assert_eq!(translate(&press(KeyCode::Delete)), Some(Key::Delete));
        assert_eq!(translate(&press(KeyCode::Up)), Some(Key::Up));
        assert_eq!(translate(&Event::Resize(80, 24)), Some(Key::Resize { cols: 80, rows: 24 }));
    }

    #[test]
    fn skips_unmapped_and_modified_keys() {
        assert_eq!(translate(&press(KeyCode::Tab)), None);
        assert_eq!(translate(&press(KeyCode::F(1))), None);
        let ctrl_s = Event::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(translate(&ctrl_s), None);
        assert_eq!(translate(&Event::FocusGained), None);
    }

    #[test]
    fn escape_follow_discriminates() {
        let timeout = Duration::from_millis(1);

        let mut none = Queue(VecDeque::new());
        assert_eq!(escape_follow(&mut none, timeout).unwrap(), EscapeFollow::Timeout);

        let mut twice = Queue(VecDeque::from([Key::Escape]));
        assert_eq!(escape_follow(&mut twice, timeout).unwrap(), EscapeFollow::Repeated);

        let mut other = Queue(VecDeque::from([Key::Char('x')]));
        assert_eq!(escape_follow(&mut other, timeout).unwrap(), EscapeFollow::Other(Key::Char('x')));
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn timed(events: &[(u64, Event)]) -> CrosstermKeys<TimedEvents> {
        CrosstermKeys::new(TimedEvents(events.iter().map(|(gap, ev)| (ms(*gap), ev.clone())).collect()))
    }

    #[test]
    fn two_separate_escape_presses_are_a_double_escape() {
        let timeout = Config::default().escape_timeout();
        // Typed by hand: two reads, well apart.
        let mut keys = timed(&[(0, press(KeyCode::Esc)), (120, press(KeyCode::Esc))]);
        assert_eq!(keys.read_key().unwrap(), Key::Escape);
        assert_eq!(escape_follow(&mut keys, timeout).unwrap(), EscapeFollow::Repeated);
    }

    #[test]
    fn disambiguated_escape_burst_is_a_double_escape() {
        let timeout = Config::default().escape_timeout();
        let release = Event::Key(KeyEvent::new_with_kind(KeyCode::Esc, KeyModifiers::NONE, KeyEventKind::Release));
        let mut keys = timed(&[(0, press(KeyCode::Esc)), (0, release), (0, press(KeyCode::Esc))]);
        assert_eq!(keys.read_key().unwrap(), Key::Escape);
        assert_eq!(escape_follow(&mut keys, timeout).unwrap(), EscapeFollow::Repeated);
    }

    #[test]
    fn lone_escape_times_out_and_keeps_the_next_key() {
        let timeout = Config::default().escape_timeout();
        let mut keys = timed(&[(0, press(KeyCode::Esc)), (1000, press(KeyCode::Char('j')))]);
        assert_eq!(keys.read_key().unwrap(), Key::Escape);
        assert_eq!(escape_follow(&mut keys, timeout).unwrap(), EscapeFollow::Timeout);
        assert_eq!(keys.read_key().unwrap(), Key::Char('j'));
    }

    #[test]
    fn poll_skips_events_that_are_not_keys() {
        let mut keys = timed(&[(0, Event::FocusLost), (10, press(KeyCode::Char('x')))]);
        assert_eq!(keys.poll_key(ms(50)).unwrap(), Some(Key::Char('x')));
        assert_eq!(keys.poll_key(ms(50)).unwrap(), None);
    }
}
