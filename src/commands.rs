//! Command-line grammar: what the user can type after `:`.

/// A parsed command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCommand {
    /// `w`
    Write,
    /// `q`
    Quit,
    /// `c` or `c<start> <end>` (1-based, inclusive). `None` means the cursor line.
    Copy(Option<(usize, usize)>),
    /// `v`
    Paste,
}

/// Parse one line of command input.
///
/// Returns `None` for anything that isn't a known command; callers ignore those.
///
/// Any input starting with `c` is a copy. If the first two whitespace-separated tokens after
/// the `c` are numbers they form the range, otherwise the cursor line is copied.
pub fn parse(input: &str) -> Option<LineCommand> {
    let input = input.trim();
    match input {
        "w" => return Some(LineCommand::Write),
        "q" => return Some(LineCommand::Quit),
        "v" => return Some(LineCommand::Paste),
        _ => {}
    }

    let rest = input.strip_prefix('c')?;
    let mut nums = rest.split_whitespace().map(str::parse::<usize>);
    let range = match (nums.next(), nums.next()) {
        (Some(Ok(start)), Some(Ok(end))) => Some((start, end)),
        _ => None,
    };
    Some(LineCommand::Copy(range))
}
