//! Keypress pause.
//!
//! Writes a label and blocks until one key event of any kind arrives. The
//! key is read in raw mode, so it is consumed without being echoed, and it
//! is discarded.

use askline_core::{ConsoleOutput, KeyInput};

use crate::error::{PromptError, PromptResult};

/// Write `label` to the platform console and wait for any single keypress.
pub fn wait_for_key(label: &str) -> PromptResult<()> {
    let console = askline_io::create_console()?;
    wait_for_key_from(console.as_ref(), label)
}

/// Write `label` to the given console and wait for any single keypress.
///
/// Returns after exactly one key event, whichever key it is. Returns
/// [`PromptError::Eof`] if the input stream ends before a key arrives.
pub fn wait_for_key_from<C>(console: &C, label: &str) -> PromptResult<()>
where
    C: KeyInput + ConsoleOutput + ?Sized,
{
    console.write_text(label)?;
    console.flush()?;

    let _raw = console.enable_raw_mode()?;
    match console.read_key()? {
        Some(_) => Ok(()),
        None => Err(PromptError::Eof),
    }
}
