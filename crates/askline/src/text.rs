//! Validated line input.
//!
//! The prompt writes its label, reads one buffered line (the terminal's own
//! echo and line editing apply), runs the validator set, and either returns
//! the line or writes the failure message and starts over. There is no
//! retry limit: the loop runs until input validates or the stream ends.

use askline_core::{ConsoleOutput, LineSource};

use crate::error::{PromptError, PromptResult};
use crate::validate::{accepts_all, NonEmpty, Validate};

/// Validated line input prompt.
///
/// All configuration is optional: the label and failure message default to
/// empty strings and the validator set defaults to empty (accept
/// everything).
///
/// # Examples
///
/// ```
/// use askline::TextPrompt;
/// use askline_io::ScriptedConsole;
///
/// let console = ScriptedConsole::new();
/// console.push_line("Alice");
///
/// let name = TextPrompt::new()
///     .with_label("Name: ")
///     .read_from(&console)
///     .unwrap();
/// assert_eq!(name, "Alice");
/// ```
pub struct TextPrompt {
    label: String,
    fail_message: String,
    validators: Vec<Box<dyn Validate>>,
}

impl TextPrompt {
    pub fn new() -> Self {
        Self {
            label: String::new(),
            fail_message: String::new(),
            validators: Vec::new(),
        }
    }

    /// Set the label written before each read.
    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }

    /// Set the message written after each rejected read.
    pub fn with_fail_message<S: Into<String>>(mut self, fail_message: S) -> Self {
        self.fail_message = fail_message.into();
        self
    }

    /// Add a validator. All added validators must accept for input to be
    /// returned.
    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: Validate + 'static,
    {
        self.validators.push(Box::new(validator));
        self
    }

    /// Add the built-in non-empty validator.
    pub fn require_non_empty(self) -> Self {
        self.with_validator(NonEmpty)
    }

    /// Prompt on the platform console until a line validates.
    pub fn read(&self) -> PromptResult<String> {
        let console = askline_io::create_console()?;
        self.read_from(console.as_ref())
    }

    /// Prompt on the given console until a line validates.
    ///
    /// Blocks indefinitely; returns [`PromptError::Eof`] if the input
    /// stream ends first.
    pub fn read_from<C>(&self, console: &C) -> PromptResult<String>
    where
        C: LineSource + ConsoleOutput + ?Sized,
    {
        loop {
            console.write_text(&self.label)?;
            console.flush()?;

            let line = console.read_line()?.ok_or(PromptError::Eof)?;
            if accepts_all(&self.validators, &line) {
                return Ok(line);
            }

            log::debug!("line input rejected by validator");
            console.write_line(&self.fail_message)?;
        }
    }
}

impl Default for TextPrompt {
    fn default() -> Self {
        Self::new()
    }
}
