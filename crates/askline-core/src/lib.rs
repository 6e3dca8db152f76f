//! Askline Core Library
//!
//! Platform-independent machinery for the askline terminal prompt helpers:
//! key definitions, the byte-to-key-event parser, and the console capability
//! traits the platform backends implement. Nothing in this crate touches a
//! real terminal; that lives in `askline-io`.

pub mod console;
pub mod key;
pub mod key_parser;
pub mod sequence_matcher;

// Re-export commonly used types for convenience
pub use console::{
    Console, ConsoleError, ConsoleOutput, ConsoleResult, CursorGuard, KeyInput, LineSource,
    RawModeGuard,
};
pub use key::{is_control_char, Key, KeyEvent};
pub use key_parser::{KeyParser, ParserState};
pub use sequence_matcher::{LongestMatchResult, MatchResult, SequenceMatcher};
