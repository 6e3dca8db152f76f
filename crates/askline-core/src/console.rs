//! Console capability traits, terminal-state guards and error types.
//!
//! The terminal boundary is split into three narrow capabilities so each
//! operation depends only on what it actually uses: key-event driven
//! operations read through [`KeyInput`], buffered prompting reads through
//! [`LineSource`], and everything renders through [`ConsoleOutput`].

use crate::KeyEvent;
use std::fmt;
use std::io;

/// Result type for console operations.
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Errors that can occur at the terminal boundary.
#[derive(Debug)]
pub enum ConsoleError {
    Io(io::Error),
    /// The standard streams are not attached to a terminal
    NotATty,
    /// Feature not available on this platform
    Unsupported(&'static str),
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::Io(e) => write!(f, "I/O error: {}", e),
            ConsoleError::NotATty => write!(f, "not attached to a terminal"),
            ConsoleError::Unsupported(s) => write!(f, "unsupported: {}", s),
        }
    }
}

impl std::error::Error for ConsoleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConsoleError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ConsoleError {
    fn from(e: io::Error) -> Self {
        ConsoleError::Io(e)
    }
}

/// Key-event input capability.
///
/// Reads input one key event at a time, which lets the caller control
/// echoing; a terminal normally echoes what is typed, so masked input has
/// to suspend that default and substitute its own glyphs.
pub trait KeyInput: Send {
    /// Put the terminal into raw mode (no line buffering, no echo).
    ///
    /// The returned guard restores the previous mode when dropped, so raw
    /// mode cannot leak past the operation that requested it, on any exit
    /// path.
    fn enable_raw_mode(&self) -> ConsoleResult<RawModeGuard>;

    /// Block until one key event is available and return it.
    ///
    /// Returns `Ok(None)` once the input stream is exhausted (for example
    /// when input is redirected from a file that has been fully consumed).
    fn read_key(&self) -> ConsoleResult<Option<KeyEvent>>;
}

/// Buffered line input capability.
///
/// The terminal's own line editing and echo apply; the read completes when
/// the user presses Enter.
pub trait LineSource: Send {
    /// Block until a full line is available and return it without its
    /// trailing line terminator.
    ///
    /// Returns `Ok(None)` once the input stream is exhausted.
    fn read_line(&self) -> ConsoleResult<Option<String>>;
}

/// Console output capability: the write, column-zero and cursor-visibility
/// surface the prompt operations render through.
pub trait ConsoleOutput: Send {
    /// Write text at the current cursor position.
    fn write_text(&self, text: &str) -> ConsoleResult<()>;

    /// Move the cursor back to the start of the current line so the next
    /// write overwrites it in place.
    fn move_to_line_start(&self) -> ConsoleResult<()>;

    /// Show or hide the cursor.
    fn set_cursor_visible(&self, visible: bool) -> ConsoleResult<()>;

    /// Flush buffered output to the terminal.
    fn flush(&self) -> ConsoleResult<()>;

    /// Write text followed by a line break. `\r\n` is emitted so the break
    /// renders correctly in raw mode as well as cooked mode.
    fn write_line(&self, text: &str) -> ConsoleResult<()> {
        self.write_text(text)?;
        self.write_text("\r\n")?;
        self.flush()
    }
}

/// The full console surface; what the platform factory hands out.
pub trait Console: KeyInput + LineSource + ConsoleOutput {}

impl<T: KeyInput + LineSource + ConsoleOutput> Console for T {}

/// RAII guard for terminal raw mode.
///
/// Restores the saved terminal mode when dropped. `restore` can be called
/// to restore eagerly and surface the fact that restoration has happened.
pub struct RawModeGuard {
    restore_fn: Option<Box<dyn FnOnce() + Send>>,
}

impl RawModeGuard {
    pub fn new<F>(restore_fn: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            restore_fn: Some(Box::new(restore_fn)),
        }
    }

    /// Restore the terminal mode now instead of at drop time.
    pub fn restore(mut self) {
        if let Some(restore_fn) = self.restore_fn.take() {
            restore_fn();
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Some(restore_fn) = self.restore_fn.take() {
            restore_fn();
        }
    }
}

/// Scoped cursor-visibility suppression.
///
/// Hides the cursor on construction and shows it again when dropped, so an
/// in-place redraw loop can never leave the cursor hidden, whichever way it
/// exits.
pub struct CursorGuard<'a, O: ConsoleOutput + ?Sized> {
    output: &'a O,
}

impl<'a, O: ConsoleOutput + ?Sized> CursorGuard<'a, O> {
    pub fn hide(output: &'a O) -> ConsoleResult<Self> {
        output.set_cursor_visible(false)?;
        Ok(Self { output })
    }
}

impl<O: ConsoleOutput + ?Sized> Drop for CursorGuard<'_, O> {
    fn drop(&mut self) {
        let _ = self.output.set_cursor_visible(true);
        let _ = self.output.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_raw_mode_guard_restores_on_drop() {
        let restored = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&restored);
        {
            let _guard = RawModeGuard::new(move || flag.store(true, Ordering::Relaxed));
            assert!(!restored.load(Ordering::Relaxed));
        }
        assert!(restored.load(Ordering::Relaxed));
    }

    #[test]
    fn test_raw_mode_guard_eager_restore_runs_once() {
        let count = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let guard = RawModeGuard::new(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        guard.restore();
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }
}
