//! Platform console backends for askline.
//!
//! Provides the concrete implementations of the core console capabilities:
//! - `UnixConsole` (POSIX/VT, via termios and ANSI sequences)
//! - `WindowsConsole` (Win32 console API)
//! - `ScriptedConsole` (scripted input and recorded output, for tests)

// Re-export core types and traits
pub use askline_core::{
    Console, ConsoleError, ConsoleOutput, ConsoleResult, CursorGuard, Key, KeyEvent, KeyInput,
    KeyParser, LineSource, RawModeGuard,
};

pub mod mock;
pub use mock::{ConsoleOp, ScriptedConsole};

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::UnixConsole;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsConsole;

/// Create the console implementation for the current platform.
pub fn create_console() -> ConsoleResult<Box<dyn Console>> {
    #[cfg(unix)]
    {
        let console = UnixConsole::new()?;
        Ok(Box::new(console))
    }

    #[cfg(windows)]
    {
        let console = WindowsConsole::new()?;
        Ok(Box::new(console))
    }

    #[cfg(not(any(unix, windows)))]
    {
        Err(ConsoleError::Unsupported("no console backend for this platform"))
    }
}
