//! `hi` — a tiny modal terminal text editor.
//!
//! ## Reading guide (high level architecture)
//! - **`main()` / `run()`**: checks arguments, sets up logging and the terminal, runs the loop.
//! - **`terminal`**: raw mode + alternate screen guard, and the key source that turns terminal
//!   events into editor keys.
//! - **`buffer::Buffer`**: the document model (a capacity-bounded `Vec<String>` of lines).
//! - **`editor::Editor`**: the session: cursor, viewport, modes, clipboard, status, rendering.
//! - **`commands`**: the grammar of the `:` command line.
//! - **`config`**: optional `hi.toml` settings.

mod buffer;
mod commands;
mod config;
mod editor;
mod terminal;
mod types;
mod utils;

use anyhow::{Context, Result};
use config::{default_config_paths, Config};
use editor::Editor;
use std::io;
use std::path::PathBuf;
use terminal::{CrosstermKeys, TerminalEvents, TerminalGuard};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const BANNER: &str = r"     ___
    /\  \
    \:\  \      ___       Commands:           Navigation:
     \:\  \    /\__\        :q  quit
 ___ /::\  \  /:/__/        :w  write            u
/\  /:/\:\__\/::\  \        :c  copy line      h   k  or arrow keys
\:\/:/  \/__/\/\:\  \__     :cN M copy N..M      j
 \::/__/      ~~\:\/\__\    :v  paste below
  \:\  \         \::/  /    dd  delete line
   \:\__\        /:/  /     esc exit lodge
    \/__/        \/__/      esc save+exit     esc esc abort

  Welcome to the HI TE      Modes:
                              eden: command/normal mode
                              lodge: insert/write mode
";

/// Program entry point.
fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [file] = args.as_slice() else {
        print!("{BANNER}");
        std::process::exit(1);
    };

    if let Err(e) = run(PathBuf::from(file)) {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}

/// Runs the editor:
/// - loads configuration and starts logging
/// - sets up the terminal (raw mode + alternate screen)
/// - loops: render → read a key → update state, until an exit key
fn run(path: PathBuf) -> Result<()> {
    let config = Config::load(&default_config_paths())?;
    let _log_guard = init_logging(&config)?;

    let mut stdout = io::stdout();
    let _term = TerminalGuard::new(&mut stdout)?;

    let (_, rows) = crossterm::terminal::size().context("reading terminal size")?;
    let mut editor = Editor::new(path, &config, usize::from(rows).saturating_sub(2));
    if config.system_clipboard {
        editor.attach_system_clipboard();
    }

    editor.run(&mut CrosstermKeys::new(TerminalEvents), |ed| {
        let (cols, rows) = crossterm::terminal::size()?;
        ed.render(&mut stdout, cols, rows)
    })
}

/// Send `tracing` output to a file; the terminal belongs to the editor.
///
/// `HI_LOG` overrides the configured filter. The returned guard flushes the writer on drop.
fn init_logging(config: &Config) -> Result<Option<WorkerGuard>> {
    let path = config.log_path();
    let dir = path.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(std::path::Path::new("."));
    let file_name = path.file_name().context("log_file has no file name")?;

    let filter = EnvFilter::try_from_env("HI_LOG")
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .with_context(|| format!("Invalid log filter '{}'", config.log_filter))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Ok(Some(guard)),
        // A subscriber is already installed; keep using it.
        Err(_) => Ok(None),
    }
}
