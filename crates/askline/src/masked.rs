//! Masked line input.
//!
//! Reads one key event at a time in raw mode so the terminal's default echo
//! is suspended and the prompt controls what appears: one mask glyph per
//! accepted character, or nothing at all in hidden mode. Control characters
//! (C0 and C1 ranges) are never accumulated and never echo. There is no
//! editing support: backspace and the navigation keys are ignored.

use askline_core::{is_control_char, ConsoleOutput, Key, KeyInput};

use crate::error::{PromptError, PromptResult};
use crate::validate::{accepts_all, NonEmpty, Validate};

/// What a typed character looks like on screen during masked input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskEcho {
    /// Suppress echo entirely: typing produces no visible output.
    #[default]
    Hidden,
    /// Write this glyph once per accepted character.
    Glyph(char),
}

/// Masked line input prompt.
///
/// Defaults: empty label and failure message, no validators, and
/// [`MaskEcho::Hidden`] (fully invisible input).
///
/// # Examples
///
/// ```
/// use askline::{MaskEcho, MaskedPrompt};
/// use askline_io::{Key, ScriptedConsole};
///
/// let console = ScriptedConsole::new();
/// console.push_text("secret");
/// console.push_key(Key::Enter);
///
/// let value = MaskedPrompt::new()
///     .with_label("Password: ")
///     .with_mask_char('*')
///     .read_from(&console)
///     .unwrap();
/// assert_eq!(value, "secret");
/// ```
pub struct MaskedPrompt {
    label: String,
    fail_message: String,
    echo: MaskEcho,
    validators: Vec<Box<dyn Validate>>,
}

impl MaskedPrompt {
    pub fn new() -> Self {
        Self {
            label: String::new(),
            fail_message: String::new(),
            echo: MaskEcho::Hidden,
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

    /// Echo `mask` once per accepted character instead of hiding input.
    pub fn with_mask_char(mut self, mask: char) -> Self {
        self.echo = MaskEcho::Glyph(mask);
        self
    }

    /// Set the echo mode directly.
    pub fn with_echo(mut self, echo: MaskEcho) -> Self {
        self.echo = echo;
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

    /// Prompt on the platform console until the input validates.
    pub fn read(&self) -> PromptResult<String> {
        let console = askline_io::create_console()?;
        self.read_from(console.as_ref())
    }

    /// Prompt on the given console until the input validates.
    ///
    /// Raw mode is held for the whole operation and restored on every exit
    /// path. Enter ends a read without being appended; Ctrl+C returns
    /// [`PromptError::Interrupted`]; end of input returns
    /// [`PromptError::Eof`].
    pub fn read_from<C>(&self, console: &C) -> PromptResult<String>
    where
        C: KeyInput + ConsoleOutput + ?Sized,
    {
        let _raw = console.enable_raw_mode()?;

        loop {
            console.write_text(&self.label)?;
            console.flush()?;

            let value = self.read_masked_line(console)?;
            if accepts_all(&self.validators, &value) {
                return Ok(value);
            }

            log::debug!("masked input rejected by validator");
            console.write_line(&self.fail_message)?;
        }
    }

    fn read_masked_line<C>(&self, console: &C) -> PromptResult<String>
    where
        C: KeyInput + ConsoleOutput + ?Sized,
    {
        let mut value = String::new();
        loop {
            let event = console.read_key()?.ok_or(PromptError::Eof)?;
            match event.key {
                Key::Enter => {
                    console.write_text("\r\n")?;
                    console.flush()?;
                    return Ok(value);
                }
                Key::ControlC => return Err(PromptError::Interrupted),
                _ => {
                    let Some(text) = event.text else { continue };
                    for c in text.chars() {
                        if is_control_char(c) {
                            continue;
                        }
                        value.push(c);
                        if let MaskEcho::Glyph(mask) = self.echo {
                            let mut buf = [0u8; 4];
                            console.write_text(mask.encode_utf8(&mut buf))?;
                            console.flush()?;
                        }
                    }
                }
            }
        }
    }
}

impl Default for MaskedPrompt {
    fn default() -> Self {
        Self::new()
    }
}
