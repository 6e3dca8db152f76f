//! # Askline: Terminal Input Helpers
//!
//! Askline is a small library of blocking terminal input helpers:
//!
//! - [`TextPrompt`]: prompted line input with validation and retry
//! - [`MaskedPrompt`]: password-style input with controlled echo
//! - [`SelectMenu`]: arrow-key driven single-line menu selection
//! - [`pause::wait_for_key`]: "press any key" pause
//!
//! ## Quick Start
//!
//! ```no_run
//! use askline::prelude::*;
//!
//! let name = TextPrompt::new()
//!     .with_label("Name: ")
//!     .with_fail_message("A name is required.")
//!     .require_non_empty()
//!     .read()?;
//!
//! let secret = MaskedPrompt::new()
//!     .with_label("Password: ")
//!     .with_mask_char('*')
//!     .read()?;
//!
//! let choice = SelectMenu::new(["yes", "no"]).select_label()?;
//! # Ok::<(), askline::PromptError>(())
//! ```
//!
//! ## Architecture
//!
//! Askline is organized into three layers:
//!
//! - **Core primitives** (`askline-core`): key definitions, the byte-level
//!   key parser, and the console capability traits
//! - **Platform I/O** (`askline-io`): Unix and Windows console backends,
//!   plus a scripted console for tests
//! - **High-level API** (`askline`): the prompt operations (this crate)
//!
//! Every operation also has a `*_from` form taking any console
//! implementation, which is how the test suite drives the prompts through
//! the scripted backend.
//!
//! ## Blocking model
//!
//! All operations are synchronous and block the calling thread until input
//! arrives; there are no timeouts and no cancellation. The terminal is
//! treated as exclusively owned for the duration of each call. Operations
//! that change terminal state (raw mode, cursor visibility) restore it on
//! every exit path, including errors and interrupts.

// Re-export core primitives
pub use askline_core::{
    is_control_char, Console, ConsoleError, ConsoleOutput, ConsoleResult, CursorGuard, Key,
    KeyEvent, KeyInput, KeyParser, LineSource, RawModeGuard,
};

// High-level components
pub mod error;
pub mod masked;
pub mod menu;
pub mod pause;
pub mod text;
pub mod validate;

pub use error::{PromptError, PromptResult};
pub use masked::{MaskEcho, MaskedPrompt};
pub use menu::SelectMenu;
pub use text::TextPrompt;
pub use validate::{NonEmpty, Validate};

/// Convenient re-exports for common usage patterns.
///
/// Import everything you need with `use askline::prelude::*;`
pub mod prelude {
    pub use crate::error::{PromptError, PromptResult};
    pub use crate::masked::{MaskEcho, MaskedPrompt};
    pub use crate::menu::SelectMenu;
    pub use crate::pause::{wait_for_key, wait_for_key_from};
    pub use crate::text::TextPrompt;
    pub use crate::validate::{NonEmpty, Validate};

    pub use askline_core::{Key, KeyEvent};
}

/// One-line entry points for the common cases, each running on the
/// platform console.
pub mod convenience {
    use crate::error::PromptResult;
    use crate::masked::MaskedPrompt;
    use crate::menu::SelectMenu;
    use crate::text::TextPrompt;

    /// Read a line with no validation.
    pub fn input(label: &str) -> PromptResult<String> {
        TextPrompt::new().with_label(label).read()
    }

    /// Read a line, re-prompting with `fail_message` until it is non-empty.
    pub fn non_empty_input(label: &str, fail_message: &str) -> PromptResult<String> {
        TextPrompt::new()
            .with_label(label)
            .with_fail_message(fail_message)
            .require_non_empty()
            .read()
    }

    /// Read a line with fully hidden echo.
    pub fn password(label: &str) -> PromptResult<String> {
        MaskedPrompt::new().with_label(label).read()
    }

    /// Select among `options`, returning the chosen index.
    pub fn select<I, S>(options: I) -> PromptResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SelectMenu::new(options).select()
    }

    /// Select among `options`, returning the chosen option text.
    pub fn select_label<I, S>(options: I) -> PromptResult<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SelectMenu::new(options).select_label()
    }

    /// Wait for any single keypress.
    pub fn pause(label: &str) -> PromptResult<()> {
        crate::pause::wait_for_key(label)
    }
}
