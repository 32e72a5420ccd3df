//! Interactive pause between feeds.
//!
//! The run loop only sees [`LineReader`]; [`TerminalReader`] is the real
//! implementation.  It puts the terminal in raw mode so the keypresses are
//! not echoed, and restores it on every exit path through [`RawModeGuard`].

use std::io::{self, IsTerminal, Write};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::error::RunError;

/// Wait used when no input can be read.
pub const FALLBACK_WAIT: Duration = Duration::from_secs(10);

const PROMPT: &str = "Press 'Return' key when ready to continue...";

/// A blocking "wait for one line" capability.
pub trait LineReader {
    /// Block until the user finishes a line.  The content is discarded.
    ///
    /// An [`io::ErrorKind::Interrupted`] error means the user asked to stop;
    /// any other error means input is unavailable.
    fn read_line(&mut self) -> io::Result<()>;
}

/// Reads from the controlling terminal without echo.
#[derive(Debug, Default)]
pub struct TerminalReader;

impl LineReader for TerminalReader {
    fn read_line(&mut self) -> io::Result<()> {
        if !io::stdin().is_terminal() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "stdin is not a terminal",
            ));
        }

        let _raw = RawModeGuard::enable()?;
        loop {
            if let Event::Key(key) = event::read()? {
                if let Some(outcome) = handle_key_event(key) {
                    return outcome;
                }
            }
        }
    }
}

/// Raw mode for as long as the guard lives.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Map one key event to the end of the read, if it is one.
///
/// Only press events count, so a key release does not end a second pause.
fn handle_key_event(key: KeyEvent) -> Option<io::Result<()>> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Some(Ok(())),
        // Raw mode swallows SIGINT; surface it instead.
        KeyCode::Char('c') if ctrl => Some(Err(io::ErrorKind::Interrupted.into())),
        KeyCode::Char('d') if ctrl => Some(Err(io::ErrorKind::UnexpectedEof.into())),
        _ => None,
    }
}

/// Prompt, then block on `reader`; falls back to sleeping `fallback` when
/// input cannot be read.
pub fn wait_for_user(
    reader: &mut dyn LineReader,
    out: &mut dyn Write,
    fallback: Duration,
) -> Result<(), RunError> {
    write!(out, "{PROMPT}")?;
    out.flush()?;

    let read = reader.read_line();
    writeln!(out)?;

    match read {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::Interrupted => return Err(RunError::Interrupted),
        Err(e) => {
            tracing::warn!(error = %e, "reading input failed");
            writeln!(
                out,
                "Reading input failed! Sleeping {} seconds.",
                fallback.as_secs()
            )?;
            out.flush()?;
            thread::sleep(fallback);
        }
    }

    writeln!(out)?;
    Ok(())
}
