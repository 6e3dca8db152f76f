//! Scripted console implementation for testing.
//!
//! Input is scripted up front (key events and lines), output is recorded as
//! a sequence of operations that tests can assert on. Clones share state, so
//! a test can keep one handle and pass another into the code under test.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use askline_core::{ConsoleOutput, ConsoleResult, Key, KeyEvent, KeyInput, LineSource,
                   RawModeGuard};

/// A recorded console operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleOp {
    Write(String),
    MoveToLineStart,
    SetCursorVisible(bool),
    EnterRawMode,
    LeaveRawMode,
}

/// Scripted console for tests.
///
/// `read_key` and `read_line` pop from their scripted queues and report
/// end-of-stream once the script runs out, which is exactly the exhausted
/// redirected-input case the real backends report.
#[derive(Clone, Default)]
pub struct ScriptedConsole {
    keys: Arc<Mutex<VecDeque<KeyEvent>>>,
    lines: Arc<Mutex<VecDeque<String>>>,
    ops: Arc<Mutex<Vec<ConsoleOp>>>,
    raw_mode: Arc<AtomicBool>,
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a key event.
    pub fn push_event(&self, event: KeyEvent) {
        self.keys.lock().unwrap().push_back(event);
    }

    /// Queue a key with no text content.
    pub fn push_key(&self, key: Key) {
        self.push_event(KeyEvent::simple(key, vec![]));
    }

    /// Queue each character of `text` as a printable key event.
    pub fn push_text(&self, text: &str) {
        let mut keys = self.keys.lock().unwrap();
        for c in text.chars() {
            keys.push_back(KeyEvent::from_char(c));
        }
    }

    /// Queue a line for `read_line`.
    pub fn push_line(&self, line: &str) {
        self.lines.lock().unwrap().push_back(line.to_string());
    }

    /// All recorded operations so far.
    pub fn ops(&self) -> Vec<ConsoleOp> {
        self.ops.lock().unwrap().clone()
    }

    /// Everything written to the terminal, concatenated.
    pub fn visible_output(&self) -> String {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| match op {
                ConsoleOp::Write(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of times `needle` was written, counted across the whole
    /// output stream.
    pub fn count_written(&self, needle: &str) -> usize {
        self.visible_output().matches(needle).count()
    }

    /// Whether raw mode is currently active (i.e. a guard is live).
    pub fn raw_mode_active(&self) -> bool {
        self.raw_mode.load(Ordering::Relaxed)
    }

    /// Cursor visibility implied by the recorded operations (visible until
    /// the first toggle).
    pub fn cursor_visible(&self) -> bool {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|op| match op {
                ConsoleOp::SetCursorVisible(v) => Some(*v),
                _ => None,
            })
            .unwrap_or(true)
    }

    fn record(&self, op: ConsoleOp) {
        self.ops.lock().unwrap().push(op);
    }
}

impl KeyInput for ScriptedConsole {
    fn enable_raw_mode(&self) -> ConsoleResult<RawModeGuard> {
        self.record(ConsoleOp::EnterRawMode);
        self.raw_mode.store(true, Ordering::Relaxed);

        let ops = Arc::clone(&self.ops);
        let raw_mode = Arc::clone(&self.raw_mode);
        Ok(RawModeGuard::new(move || {
            ops.lock().unwrap().push(ConsoleOp::LeaveRawMode);
            raw_mode.store(false, Ordering::Relaxed);
        }))
    }

    fn read_key(&self) -> ConsoleResult<Option<KeyEvent>> {
        Ok(self.keys.lock().unwrap().pop_front())
    }
}

impl LineSource for ScriptedConsole {
    fn read_line(&self) -> ConsoleResult<Option<String>> {
        Ok(self.lines.lock().unwrap().pop_front())
    }
}

impl ConsoleOutput for ScriptedConsole {
    fn write_text(&self, text: &str) -> ConsoleResult<()> {
        self.record(ConsoleOp::Write(text.to_string()));
        Ok(())
    }

    fn move_to_line_start(&self) -> ConsoleResult<()> {
        self.record(ConsoleOp::MoveToLineStart);
        Ok(())
    }

    fn set_cursor_visible(&self, visible: bool) -> ConsoleResult<()> {
        self.record(ConsoleOp::SetCursorVisible(visible));
        Ok(())
    }

    fn flush(&self) -> ConsoleResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_keys_pop_in_order() {
        let console = ScriptedConsole::new();
        console.push_text("hi");
        console.push_key(Key::Enter);

        let first = console.read_key().unwrap().unwrap();
        assert_eq!(first.text.as_deref(), Some("h"));
        let second = console.read_key().unwrap().unwrap();
        assert_eq!(second.text.as_deref(), Some("i"));
        let third = console.read_key().unwrap().unwrap();
        assert_eq!(third.key, Key::Enter);
        assert!(console.read_key().unwrap().is_none());
    }

    #[test]
    fn test_raw_mode_guard_toggles_state() {
        let console = ScriptedConsole::new();
        {
            let _guard = console.enable_raw_mode().unwrap();
            assert!(console.raw_mode_active());
        }
        assert!(!console.raw_mode_active());
        assert_eq!(
            console.ops(),
            vec![ConsoleOp::EnterRawMode, ConsoleOp::LeaveRawMode]
        );
    }

    #[test]
    fn test_output_recording() {
        let console = ScriptedConsole::new();
        console.write_text("abc").unwrap();
        console.move_to_line_start().unwrap();
        console.write_text("d").unwrap();
        assert_eq!(console.visible_output(), "abcd");
        assert_eq!(console.count_written("a"), 1);
    }

    #[test]
    fn test_clone_shares_state() {
        let console = ScriptedConsole::new();
        let clone = console.clone();
        clone.push_line("hello");
        assert_eq!(console.read_line().unwrap().as_deref(), Some("hello"));
        clone.write_text("x").unwrap();
        assert_eq!(console.visible_output(), "x");
    }
}
