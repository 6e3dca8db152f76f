//! Error types for prompt operations.

use askline_core::ConsoleError;
use std::fmt;

/// Errors a prompt operation can surface.
///
/// Invalid input is not an error: validation failures are handled by the
/// retry loop. These variants cover the terminal boundary failing, the input
/// stream ending, and the user interrupting a raw-mode read.
#[derive(Debug)]
pub enum PromptError {
    /// I/O or terminal-state failure at the console boundary
    Console(ConsoleError),
    /// The input stream ended before the operation could complete (for
    /// example, input redirected from an exhausted file)
    Eof,
    /// The user interrupted the operation (Ctrl+C during a raw-mode read)
    Interrupted,
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::Console(e) => write!(f, "console error: {}", e),
            PromptError::Eof => write!(f, "input stream ended"),
            PromptError::Interrupted => write!(f, "interrupted"),
        }
    }
}

impl std::error::Error for PromptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PromptError::Console(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConsoleError> for PromptError {
    fn from(e: ConsoleError) -> Self {
        PromptError::Console(e)
    }
}

/// Result type for prompt operations.
pub type PromptResult<T> = Result<T, PromptError>;
