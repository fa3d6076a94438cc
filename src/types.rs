//! Common types used throughout the editor.

/// A position in the document.
///
/// - `y`: line index (0-based)
/// - `x`: **char index** within that line (0-based). This is *not* a byte index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub y: usize,
    pub x: usize, // char index within line
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// The editor mode.
///
/// `PendingDelete` is Navigate with one `d` already typed; `CommandLine` is the `:` prompt.
/// Both are only entered from `Navigate` and always fall back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    PendingDelete,
    Insert,
    CommandLine,
}

impl Mode {
    /// Label shown in the navigation bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Insert => "LODGE",
            Self::Navigate | Self::PendingDelete | Self::CommandLine => "EDEN",
        }
    }
}

/// A key event as the editor core sees it.
///
/// The terminal layer turns raw terminal events into these; everything else about the
/// terminal stays out of the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Escape,
    Left,
    Right,
    Up,
    Down,
    Resize { cols: u16, rows: u16 },
}

/// What followed an Escape within the lookahead window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeFollow {
    /// Nothing arrived: a plain Escape.
    Timeout,
    /// A second Escape: the "abort" gesture.
    Repeated,
    /// Some other key arrived right behind the Escape.
    Other(Key),
}

/// What the event loop should do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Command-line prompt state (what the user is typing after `:`).
#[derive(Debug, Clone, Default)]
pub struct Prompt {
    pub input: String,
}

/// The character sequence used to separate lines in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// Unix line ending: `\n` (LF)
    LF,
    /// Windows line ending: `\r\n` (CRLF)
    CRLF,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LF => "\n",
            Self::CRLF => "\r\n",
        }
    }
}

/// Token classes produced by the highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Keyword,
    Type,
    Number,
    Str,
    Comment,
    Preprocessor,
}

/// A highlighted span within a line.
#[derive(Debug, Clone)]
pub struct HighlightSpan {
    /// Start char index (inclusive).
    pub start: usize,
    /// End char index (exclusive).
    pub end: usize,
    pub class: TokenClass,
    /// Priority (for overlapping spans).
    pub priority: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pos_orders_by_line_then_column() {
        assert!(Pos { y: 0, x: 9 } < Pos { y: 1, x: 0 });
        assert!(Pos { y: 2, x: 1 } < Pos { y: 2, x: 3 });
    }

    #[test]
    fn mode_labels() {
        assert_eq!(Mode::Navigate.label(), "EDEN");
        assert_eq!(Mode::PendingDelete.label(), "EDEN");
        assert_eq!(Mode::CommandLine.label(), "EDEN");
        assert_eq!(Mode::Insert.label(), "LODGE");
    }
}
