//! Arrow-key menu selector.
//!
//! Renders every option on a single line with the highlighted option in
//! brackets, then redraws that line in place as Left/Right move the
//! highlight. The cursor is hidden for the duration so the redraw does not
//! flicker, and shown again before returning.

use askline_core::{ConsoleOutput, CursorGuard, Key, KeyInput};

use crate::error::{PromptError, PromptResult};

/// Single-line menu selector driven by Left/Right/Enter.
///
/// # Examples
///
/// ```
/// use askline::SelectMenu;
/// use askline_io::{Key, ScriptedConsole};
///
/// let console = ScriptedConsole::new();
/// console.push_key(Key::Right);
/// console.push_key(Key::Enter);
///
/// let menu = SelectMenu::new(["yes", "no"]);
/// assert_eq!(menu.select_from(&console).unwrap(), 1);
/// ```
pub struct SelectMenu {
    options: Vec<String>,
}

impl SelectMenu {
    /// Create a selector over `options`.
    ///
    /// The option set must be non-empty by the time a selection runs; an
    /// empty set is a caller bug, not a recoverable condition.
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// The configured options.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Run the selector on the platform console and return the selected
    /// index.
    pub fn select(&self) -> PromptResult<usize> {
        let console = askline_io::create_console()?;
        self.select_from(console.as_ref())
    }

    /// Run the selector on the platform console and return the selected
    /// option text.
    pub fn select_label(&self) -> PromptResult<String> {
        let console = askline_io::create_console()?;
        self.select_label_from(console.as_ref())
    }

    /// Run the selector on the given console and return the selected index.
    ///
    /// The highlight starts at 0; Left and Right move it, clamped at the
    /// ends (no wraparound); Enter confirms; every other key is ignored.
    /// Ctrl+C returns [`PromptError::Interrupted`], end of input
    /// [`PromptError::Eof`]; raw mode and cursor visibility are restored
    /// on every exit path.
    ///
    /// # Panics
    ///
    /// Panics if the option set is empty.
    pub fn select_from<C>(&self, console: &C) -> PromptResult<usize>
    where
        C: KeyInput + ConsoleOutput + ?Sized,
    {
        assert!(!self.options.is_empty(), "menu options must be non-empty");

        let _raw = console.enable_raw_mode()?;
        let _cursor = CursorGuard::hide(console)?;

        let mut selected = 0usize;
        loop {
            console.write_text(&selection_line(&self.options, selected))?;
            console.flush()?;

            let event = console.read_key()?.ok_or(PromptError::Eof)?;
            match event.key {
                Key::Left => selected = selected.saturating_sub(1),
                Key::Right => selected = (selected + 1).min(self.options.len() - 1),
                Key::Enter => {
                    console.write_text("\r\n")?;
                    console.flush()?;
                    return Ok(selected);
                }
                Key::ControlC => return Err(PromptError::Interrupted),
                _ => {}
            }

            console.move_to_line_start()?;
        }
    }

    /// Run the selector on the given console and return the selected option
    /// text.
    pub fn select_label_from<C>(&self, console: &C) -> PromptResult<String>
    where
        C: KeyInput + ConsoleOutput + ?Sized,
    {
        let index = self.select_from(console)?;
        Ok(self.options[index].clone())
    }
}

/// Render one menu line: options space-separated, the selected one wrapped
/// in brackets.
fn selection_line(options: &[String], selected: usize) -> String {
    let mut line = String::new();
    for (i, option) in options.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        if i == selected {
            line.push('[');
            line.push_str(option);
            line.push(']');
        } else {
            line.push_str(option);
        }
    }
    line
}
