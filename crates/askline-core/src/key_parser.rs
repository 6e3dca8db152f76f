//! State machine-based key parser for handling raw terminal input.
//!
//! The parser maintains state between calls so multi-byte escape sequences
//! and UTF-8 characters that arrive split across reads are handled
//! correctly. Partial sequences are buffered until they can be completed or
//! determined to be invalid.

use crate::key::{Key, KeyEvent};
use crate::sequence_matcher::{MatchResult, SequenceMatcher};

/// Maximum buffer size to prevent unbounded memory growth
const MAX_BUFFER_SIZE: usize = 1024;

/// Parser state for handling different types of input sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Handling plain input and known single-byte sequences
    Normal,
    /// Handling escape sequences that begin with ESC (0x1B)
    EscapeSequence,
    /// Handling Control Sequence Introducer sequences (ESC[)
    CsiSequence,
    /// Accumulating the continuation bytes of a multi-byte UTF-8 character
    Utf8Sequence,
}

/// State machine parser for converting raw terminal input bytes to key events
pub struct KeyParser {
    state: ParserState,
    /// Buffer for accumulating partial sequences
    buffer: Vec<u8>,
    sequence_matcher: SequenceMatcher,
    /// Total length of the UTF-8 character currently being accumulated
    utf8_expected: usize,
}

impl KeyParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Normal,
            buffer: Vec::new(),
            sequence_matcher: SequenceMatcher::new(),
            utf8_expected: 0,
        }
    }

    /// Feed raw bytes to the parser and return any complete key events.
    ///
    /// Partial escape sequences and partial UTF-8 characters are buffered
    /// until a later `feed` completes them (or `flush` gives up on them).
    pub fn feed(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        let mut events = Vec::new();

        for &byte in data {
            if self.buffer.len() >= MAX_BUFFER_SIZE {
                log::trace!("key parser buffer overflow, discarding {} bytes", self.buffer.len());
                events.push(KeyEvent::simple(Key::NotDefined, std::mem::take(&mut self.buffer)));
                self.reset_to_normal();
            }

            match self.state {
                ParserState::Normal => self.handle_normal_byte(byte, &mut events),
                ParserState::EscapeSequence => self.handle_escape_byte(byte, &mut events),
                ParserState::CsiSequence => self.handle_csi_byte(byte, &mut events),
                ParserState::Utf8Sequence => self.handle_utf8_byte(byte, &mut events),
            }
        }

        events
    }

    /// Flush any incomplete sequence and return it as key events.
    ///
    /// Called when input is complete (end of stream) to handle remaining
    /// partial sequences: the longest valid prefix is emitted as its key and
    /// the rest as individual characters.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let mut events = Vec::new();

        if !self.buffer.is_empty() {
            match self.state {
                ParserState::Utf8Sequence => {
                    // An unterminated UTF-8 character cannot be decoded
                    events.push(KeyEvent::simple(Key::NotDefined, self.buffer.clone()));
                }
                _ => {
                    if let Some(longest) = self.sequence_matcher.find_longest_match(&self.buffer) {
                        events.push(KeyEvent::simple(
                            longest.key,
                            self.buffer[..longest.consumed_bytes].to_vec(),
                        ));
                        for &byte in &self.buffer[longest.consumed_bytes..] {
                            events.push(self.create_char_event(byte));
                        }
                    } else {
                        for &byte in &self.buffer {
                            events.push(self.create_char_event(byte));
                        }
                    }
                }
            }
        }

        self.reset();
        events
    }

    /// Reset the parser state and clear the buffer.
    pub fn reset(&mut self) {
        self.state = ParserState::Normal;
        self.buffer.clear();
        self.utf8_expected = 0;
    }

    fn handle_normal_byte(&mut self, byte: u8, events: &mut Vec<KeyEvent>) {
        if byte == 0x1b {
            self.buffer.push(byte);
            self.state = ParserState::EscapeSequence;
            return;
        }

        if let MatchResult::Exact(key) = self.sequence_matcher.match_sequence(&[byte]) {
            events.push(KeyEvent::simple(key, vec![byte]));
            return;
        }

        match utf8_sequence_len(byte) {
            Some(1) => events.push(self.create_char_event(byte)),
            Some(len) => {
                self.buffer.push(byte);
                self.utf8_expected = len;
                self.state = ParserState::Utf8Sequence;
            }
            // Stray continuation byte or a byte that can never start a valid
            // UTF-8 character (this is also where raw C1 bytes land)
            None => events.push(KeyEvent::simple(Key::NotDefined, vec![byte])),
        }
    }

    fn handle_escape_byte(&mut self, byte: u8, events: &mut Vec<KeyEvent>) {
        self.buffer.push(byte);

        if byte == 0x5b {
            // ESC[ - Control Sequence Introducer
            self.state = ParserState::CsiSequence;
            return;
        }

        match self.sequence_matcher.match_sequence(&self.buffer) {
            MatchResult::Exact(key) => {
                events.push(KeyEvent::simple(key, std::mem::take(&mut self.buffer)));
                self.reset_to_normal();
            }
            MatchResult::Prefix => {
                // Continue accumulating
            }
            MatchResult::NoMatch => {
                // Invalid escape sequence: emit ESC and reprocess the byte
                events.push(KeyEvent::simple(Key::Escape, vec![0x1b]));
                self.reset_to_normal();
                self.handle_normal_byte(byte, events);
            }
        }
    }

    fn handle_csi_byte(&mut self, byte: u8, events: &mut Vec<KeyEvent>) {
        self.buffer.push(byte);

        match self.sequence_matcher.match_sequence(&self.buffer) {
            MatchResult::Exact(key) => {
                if key != Key::Ignore {
                    events.push(KeyEvent::simple(key, self.buffer.clone()));
                }
                self.reset_to_normal();
            }
            MatchResult::Prefix => {
                // Continue accumulating
            }
            MatchResult::NoMatch => {
                if is_csi_parameter_byte(byte) {
                    // Continue accumulating parameters
                } else if is_csi_final_byte(byte) {
                    // Complete but unrecognized CSI sequence
                    log::trace!("unrecognized CSI sequence: {:02x?}", self.buffer);
                    events.push(KeyEvent::simple(Key::NotDefined, self.buffer.clone()));
                    self.reset_to_normal();
                } else {
                    // Not a CSI sequence after all: emit ESC, '[' and
                    // reprocess whatever followed
                    events.push(KeyEvent::simple(Key::Escape, vec![0x1b]));
                    events.push(self.create_char_event(0x5b));
                    let remaining: Vec<u8> = self.buffer[2..].to_vec();
                    self.reset_to_normal();
                    for b in remaining {
                        self.handle_normal_byte(b, events);
                    }
                }
            }
        }
    }

    fn handle_utf8_byte(&mut self, byte: u8, events: &mut Vec<KeyEvent>) {
        if (0x80..=0xbf).contains(&byte) {
            self.buffer.push(byte);
            if self.buffer.len() == self.utf8_expected {
                let raw = std::mem::take(&mut self.buffer);
                match std::str::from_utf8(&raw) {
                    Ok(text) => {
                        events.push(KeyEvent::with_text(Key::NotDefined, raw.clone(), text.to_string()))
                    }
                    Err(_) => events.push(KeyEvent::simple(Key::NotDefined, raw)),
                }
                self.reset_to_normal();
            }
        } else {
            // Truncated character: surface what was buffered and reprocess
            events.push(KeyEvent::simple(Key::NotDefined, std::mem::take(&mut self.buffer)));
            self.reset_to_normal();
            self.handle_normal_byte(byte, events);
        }
    }

    fn reset_to_normal(&mut self) {
        self.state = ParserState::Normal;
        self.buffer.clear();
        self.utf8_expected = 0;
    }

    fn create_char_event(&self, byte: u8) -> KeyEvent {
        if byte.is_ascii() && !byte.is_ascii_control() {
            KeyEvent::with_text(Key::NotDefined, vec![byte], (byte as char).to_string())
        } else {
            KeyEvent::simple(Key::NotDefined, vec![byte])
        }
    }
}

impl Default for KeyParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a byte is a CSI parameter byte (digits, semicolon, etc.)
fn is_csi_parameter_byte(byte: u8) -> bool {
    matches!(byte, b'0'..=b'9' | b';' | b':' | b'<' | b'=' | b'>' | b'?')
}

/// Check if a byte is a CSI final byte (letters)
fn is_csi_final_byte(byte: u8) -> bool {
    matches!(byte, b'@'..=b'~')
}

/// Total encoded length of a UTF-8 character starting with `byte`, or `None`
/// if the byte cannot start a character.
fn utf8_sequence_len(byte: u8) -> Option<usize> {
    match byte {
        0x00..=0x7f => Some(1),
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_creation() {
        let parser = KeyParser::new();
        assert_eq!(parser.state, ParserState::Normal);
        assert!(parser.buffer.is_empty());
    }

    #[test]
    fn test_simple_control_characters() {
        let mut parser = KeyParser::new();

        let events = parser.feed(&[0x03]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, Key::ControlC);
        assert_eq!(events[0].raw_bytes, vec![0x03]);
        assert!(events[0].text.is_none());

        let events = parser.feed(&[0x09]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, Key::Tab);
    }

    #[test]
    fn test_cr_and_lf_both_parse_as_enter() {
        let mut parser = KeyParser::new();
        let events = parser.feed(&[0x0d, 0x0a]);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].key, Key::Enter);
        assert_eq!(events[1].key, Key::Enter);
    }

    #[test]
    fn test_printable_ascii() {
        let mut parser = KeyParser::new();
        let events = parser.feed(b"ab");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].key, Key::NotDefined);
        assert_eq!(events[0].text.as_deref(), Some("a"));
        assert_eq!(events[1].text.as_deref(), Some("b"));
    }

    #[test]
    fn test_escape_key_emitted_on_flush() {
        let mut parser = KeyParser::new();

        let events = parser.feed(&[0x1b]);
        assert!(events.is_empty()); // waiting for a possible sequence
        assert_eq!(parser.state, ParserState::EscapeSequence);

        let events = parser.flush();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, Key::Escape);
    }

    #[test]
    fn test_arrow_keys() {
        let mut parser = KeyParser::new();

        let events = parser.feed(&[0x1b, 0x5b, 0x41]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, Key::Up);
        assert_eq!(events[0].raw_bytes, vec![0x1b, 0x5b, 0x41]);
        assert_eq!(parser.state, ParserState::Normal);

        let events = parser.feed(&[0x1b, 0x5b, 0x44]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, Key::Left);
    }

    #[test]
    fn test_sequence_split_across_feeds() {
        let mut parser = KeyParser::new();

        assert!(parser.feed(&[0x1b]).is_empty());
        assert!(parser.feed(&[0x5b]).is_empty());
        let events = parser.feed(&[0x43]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, Key::Right);
    }

    #[test]
    fn test_utf8_multibyte_character() {
        let mut parser = KeyParser::new();
        let events = parser.feed("é".as_bytes());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, Key::NotDefined);
        assert_eq!(events[0].text.as_deref(), Some("é"));
    }

    #[test]
    fn test_utf8_split_across_feeds() {
        let mut parser = KeyParser::new();
        let bytes = "漢".as_bytes();
        assert!(parser.feed(&bytes[..1]).is_empty());
        assert!(parser.feed(&bytes[1..2]).is_empty());
        let events = parser.feed(&bytes[2..]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].text.as_deref(), Some("漢"));
    }

    #[test]
    fn test_raw_c1_byte_has_no_text() {
        let mut parser = KeyParser::new();
        let events = parser.feed(&[0x85]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, Key::NotDefined);
        assert!(events[0].text.is_none());
    }

    #[test]
    fn test_unknown_csi_sequence() {
        let mut parser = KeyParser::new();
        // ESC[99~ is not registered
        let events = parser.feed(&[0x1b, 0x5b, 0x39, 0x39, 0x7e]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, Key::NotDefined);
    }

    #[test]
    fn test_invalid_escape_falls_back_to_text() {
        let mut parser = KeyParser::new();
        // ESC followed by a plain letter that starts no known sequence
        let events = parser.feed(&[0x1b, 0x61]);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].key, Key::Escape);
        assert_eq!(events[1].text.as_deref(), Some("a"));
    }

    #[test]
    fn test_flush_consumes_longest_prefix() {
        let mut parser = KeyParser::new();
        assert!(parser.feed(&[0x1b, 0x5b]).is_empty());
        let events = parser.flush();
        // ESC is the longest valid match; '[' is reprocessed as text
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].key, Key::Escape);
        assert_eq!(events[1].text.as_deref(), Some("["));
    }
}
