//! Key definitions and key event structures for terminal input parsing.
//!
//! The `Key` enum covers every input the sequence table and the platform
//! backends can produce; `KeyEvent` carries the parsed key together with the
//! raw bytes it was decoded from and, for printable input, the text it
//! represents.

/// Key represents the possible key inputs parsed from terminal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape key
    Escape,

    // Control characters. Ctrl-I, Ctrl-J and Ctrl-M are reported as their
    // line-editing aliases `Tab` and `Enter`.
    ControlA,
    ControlB,
    ControlC,
    ControlD,
    ControlE,
    ControlF,
    ControlG,
    ControlH,
    ControlK,
    ControlL,
    ControlN,
    ControlO,
    ControlP,
    ControlQ,
    ControlR,
    ControlS,
    ControlT,
    ControlU,
    ControlV,
    ControlW,
    ControlX,
    ControlY,
    ControlZ,

    // Additional control combinations
    ControlSpace,
    ControlBackslash,
    ControlSquareClose,
    ControlCircumflex,
    ControlUnderscore,

    // Navigation keys (arrow keys)
    Up,
    Down,
    Right,
    Left,

    // Navigation and editing keys
    Home,
    End,
    Delete,
    PageUp,
    PageDown,
    Insert,
    BackTab,
    Backspace,

    // Aliases for common keys
    Tab,
    Enter,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    /// Key which should be ignored (no action should be taken)
    Ignore,
    /// Key is not defined or unknown sequence
    NotDefined,
}

/// KeyEvent represents a parsed key input event.
///
/// Contains the parsed key, the raw bytes that produced it, and the text
/// content for printable input (a single character, or several for pasted
/// byte runs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The parsed key type
    pub key: Key,
    /// The raw bytes that were parsed to produce this key event
    pub raw_bytes: Vec<u8>,
    /// Text content associated with this key event, present for printable
    /// characters
    pub text: Option<String>,
}

impl KeyEvent {
    /// Create a key event without text content.
    pub fn simple(key: Key, raw_bytes: Vec<u8>) -> Self {
        Self {
            key,
            raw_bytes,
            text: None,
        }
    }

    /// Create a key event with text content.
    pub fn with_text(key: Key, raw_bytes: Vec<u8>, text: String) -> Self {
        Self {
            key,
            raw_bytes,
            text: Some(text),
        }
    }

    /// Create a printable-character event, encoding the character as its
    /// UTF-8 bytes. Used by backends that receive decoded characters
    /// (Windows console records, scripted test input).
    pub fn from_char(c: char) -> Self {
        let mut buf = [0u8; 4];
        let encoded = c.encode_utf8(&mut buf);
        Self::with_text(Key::NotDefined, encoded.as_bytes().to_vec(), encoded.to_string())
    }
}

/// Whether `c` is a control character for input-accumulation purposes:
/// the C0 range (U+0000–U+001F) or the C1 range (U+0080–U+00A0).
///
/// Characters in these ranges are never appended to a masked input result
/// and never produce a mask glyph.
pub fn is_control_char(c: char) -> bool {
    c <= '\u{1f}' || ('\u{80}'..='\u{a0}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_char_ranges() {
        assert!(is_control_char('\u{0}'));
        assert!(is_control_char('\u{1}'));
        assert!(is_control_char('\u{1f}'));
        assert!(is_control_char('\t'));
        assert!(is_control_char('\n'));
        assert!(is_control_char('\u{80}'));
        assert!(is_control_char('\u{9c}'));
        assert!(is_control_char('\u{a0}'));
    }

    #[test]
    fn test_printable_chars_are_not_control() {
        assert!(!is_control_char(' '));
        assert!(!is_control_char('a'));
        assert!(!is_control_char('~'));
        assert!(!is_control_char('\u{7f}')); // DEL is outside both ranges
        assert!(!is_control_char('\u{a1}'));
        assert!(!is_control_char('é'));
        assert!(!is_control_char('漢'));
    }

    #[test]
    fn test_from_char_encodes_utf8() {
        let ev = KeyEvent::from_char('a');
        assert_eq!(ev.key, Key::NotDefined);
        assert_eq!(ev.raw_bytes, vec![0x61]);
        assert_eq!(ev.text.as_deref(), Some("a"));

        let ev = KeyEvent::from_char('é');
        assert_eq!(ev.raw_bytes, "é".as_bytes().to_vec());
        assert_eq!(ev.text.as_deref(), Some("é"));
    }

    #[test]
    fn test_simple_has_no_text() {
        let ev = KeyEvent::simple(Key::Enter, vec![0x0d]);
        assert_eq!(ev.key, Key::Enter);
        assert!(ev.text.is_none());
    }
}
