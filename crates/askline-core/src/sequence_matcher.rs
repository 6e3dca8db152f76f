//! Trie-based sequence matcher for key sequence parsing.
//!
//! Maps byte sequences to keys and reports whether a partial sequence could
//! still be the prefix of a longer valid sequence. The parser relies on the
//! prefix information to decide between waiting for more bytes and
//! processing what it already has.

use crate::key::Key;
use std::collections::BTreeMap;

/// A node in the trie structure for sequence matching.
#[derive(Debug, Clone)]
struct TrieNode {
    /// The key associated with this node if it represents a complete sequence
    key: Option<Key>,
    /// Child nodes indexed by the next byte in the sequence
    children: BTreeMap<u8, TrieNode>,
}

impl TrieNode {
    fn new() -> Self {
        Self {
            key: None,
            children: BTreeMap::new(),
        }
    }
}

/// Result of matching a byte sequence against the trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// Found an exact match for the sequence
    Exact(Key),
    /// The sequence is a prefix of one or more longer sequences
    Prefix,
    /// No match possible
    NoMatch,
}

/// Result of finding the longest valid sequence from the start of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongestMatchResult {
    /// The key that was matched
    pub key: Key,
    /// Number of bytes consumed from the input
    pub consumed_bytes: usize,
}

/// Trie-based sequence matcher over the standard VT100/xterm sequences.
pub struct SequenceMatcher {
    root: TrieNode,
}

impl SequenceMatcher {
    /// Create a new matcher with all standard key sequences registered.
    pub fn new() -> Self {
        let mut matcher = Self {
            root: TrieNode::new(),
        };
        matcher.build_standard_sequences();
        matcher
    }

    /// Whether the given bytes are an exact match, a prefix of a longer
    /// sequence, or unmatchable.
    pub fn match_sequence(&self, bytes: &[u8]) -> MatchResult {
        if bytes.is_empty() {
            return MatchResult::NoMatch;
        }

        match self.find_node(bytes) {
            Some(node) => match node.key {
                Some(key) => MatchResult::Exact(key),
                None => MatchResult::Prefix,
            },
            None => MatchResult::NoMatch,
        }
    }

    /// Find the longest valid sequence from the start of `bytes`. Used as a
    /// fallback when a partially accumulated sequence has to be consumed.
    pub fn find_longest_match(&self, bytes: &[u8]) -> Option<LongestMatchResult> {
        let mut longest_match = None;
        let mut current_node = &self.root;

        for (i, &byte) in bytes.iter().enumerate() {
            match current_node.children.get(&byte) {
                Some(child) => {
                    current_node = child;
                    if let Some(key) = current_node.key {
                        longest_match = Some(LongestMatchResult {
                            key,
                            consumed_bytes: i + 1,
                        });
                    }
                }
                None => break,
            }
        }

        longest_match
    }

    fn find_node(&self, bytes: &[u8]) -> Option<&TrieNode> {
        let mut current = &self.root;
        for &byte in bytes {
            current = current.children.get(&byte)?;
        }
        Some(current)
    }

    /// Register a sequence mapping.
    pub fn insert(&mut self, bytes: &[u8], key: Key) {
        let mut current = &mut self.root;
        for &byte in bytes {
            current = current.children.entry(byte).or_insert_with(TrieNode::new);
        }
        current.key = Some(key);
    }

    fn build_standard_sequences(&mut self) {
        // Control characters (single byte). 0x0a and 0x0d both map to Enter
        // so line termination is uniform whether or not the terminal
        // translates CR to LF.
        self.insert(&[0x1b], Key::Escape);
        self.insert(&[0x00], Key::ControlSpace);
        self.insert(&[0x01], Key::ControlA);
        self.insert(&[0x02], Key::ControlB);
        self.insert(&[0x03], Key::ControlC);
        self.insert(&[0x04], Key::ControlD);
        self.insert(&[0x05], Key::ControlE);
        self.insert(&[0x06], Key::ControlF);
        self.insert(&[0x07], Key::ControlG);
        self.insert(&[0x08], Key::ControlH);
        self.insert(&[0x09], Key::Tab);
        self.insert(&[0x0a], Key::Enter);
        self.insert(&[0x0b], Key::ControlK);
        self.insert(&[0x0c], Key::ControlL);
        self.insert(&[0x0d], Key::Enter);
        self.insert(&[0x0e], Key::ControlN);
        self.insert(&[0x0f], Key::ControlO);
        self.insert(&[0x10], Key::ControlP);
        self.insert(&[0x11], Key::ControlQ);
        self.insert(&[0x12], Key::ControlR);
        self.insert(&[0x13], Key::ControlS);
        self.insert(&[0x14], Key::ControlT);
        self.insert(&[0x15], Key::ControlU);
        self.insert(&[0x16], Key::ControlV);
        self.insert(&[0x17], Key::ControlW);
        self.insert(&[0x18], Key::ControlX);
        self.insert(&[0x19], Key::ControlY);
        self.insert(&[0x1a], Key::ControlZ);
        self.insert(&[0x1c], Key::ControlBackslash);
        self.insert(&[0x1d], Key::ControlSquareClose);
        self.insert(&[0x1e], Key::ControlCircumflex);
        self.insert(&[0x1f], Key::ControlUnderscore);
        self.insert(&[0x7f], Key::Backspace);

        // Arrow keys (standard VT100)
        self.insert(&[0x1b, 0x5b, 0x41], Key::Up);
        self.insert(&[0x1b, 0x5b, 0x42], Key::Down);
        self.insert(&[0x1b, 0x5b, 0x43], Key::Right);
        self.insert(&[0x1b, 0x5b, 0x44], Key::Left);

        // Arrow keys (SS3 variants used in application cursor mode)
        self.insert(&[0x1b, 0x4f, 0x41], Key::Up);
        self.insert(&[0x1b, 0x4f, 0x42], Key::Down);
        self.insert(&[0x1b, 0x4f, 0x43], Key::Right);
        self.insert(&[0x1b, 0x4f, 0x44], Key::Left);

        // Home and End keys (multiple variants)
        self.insert(&[0x1b, 0x5b, 0x48], Key::Home);
        self.insert(&[0x1b, 0x5b, 0x46], Key::End);
        self.insert(&[0x1b, 0x5b, 0x31, 0x7e], Key::Home);
        self.insert(&[0x1b, 0x5b, 0x34, 0x7e], Key::End);
        self.insert(&[0x1b, 0x5b, 0x37, 0x7e], Key::Home);
        self.insert(&[0x1b, 0x5b, 0x38, 0x7e], Key::End);

        // Editing and paging keys
        self.insert(&[0x1b, 0x5b, 0x32, 0x7e], Key::Insert);
        self.insert(&[0x1b, 0x5b, 0x33, 0x7e], Key::Delete);
        self.insert(&[0x1b, 0x5b, 0x35, 0x7e], Key::PageUp);
        self.insert(&[0x1b, 0x5b, 0x36, 0x7e], Key::PageDown);
        self.insert(&[0x1b, 0x5b, 0x5a], Key::BackTab);

        // Function keys F1-F4 (standard VT100)
        self.insert(&[0x1b, 0x4f, 0x50], Key::F1);
        self.insert(&[0x1b, 0x4f, 0x51], Key::F2);
        self.insert(&[0x1b, 0x4f, 0x52], Key::F3);
        self.insert(&[0x1b, 0x4f, 0x53], Key::F4);

        // Function keys F1-F4 (rxvt-unicode variants)
        self.insert(&[0x1b, 0x5b, 0x31, 0x31, 0x7e], Key::F1);
        self.insert(&[0x1b, 0x5b, 0x31, 0x32, 0x7e], Key::F2);
        self.insert(&[0x1b, 0x5b, 0x31, 0x33, 0x7e], Key::F3);
        self.insert(&[0x1b, 0x5b, 0x31, 0x34, 0x7e], Key::F4);

        // Function keys F5-F12
        self.insert(&[0x1b, 0x5b, 0x31, 0x35, 0x7e], Key::F5);
        self.insert(&[0x1b, 0x5b, 0x31, 0x37, 0x7e], Key::F6);
        self.insert(&[0x1b, 0x5b, 0x31, 0x38, 0x7e], Key::F7);
        self.insert(&[0x1b, 0x5b, 0x31, 0x39, 0x7e], Key::F8);
        self.insert(&[0x1b, 0x5b, 0x32, 0x30, 0x7e], Key::F9);
        self.insert(&[0x1b, 0x5b, 0x32, 0x31, 0x7e], Key::F10);
        self.insert(&[0x1b, 0x5b, 0x32, 0x33, 0x7e], Key::F11);
        self.insert(&[0x1b, 0x5b, 0x32, 0x34, 0x7e], Key::F12);
    }
}

impl Default for SequenceMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_single_byte_matches() {
        let matcher = SequenceMatcher::new();
        assert_eq!(matcher.match_sequence(&[0x03]), MatchResult::Exact(Key::ControlC));
        assert_eq!(matcher.match_sequence(&[0x09]), MatchResult::Exact(Key::Tab));
        assert_eq!(matcher.match_sequence(&[0x7f]), MatchResult::Exact(Key::Backspace));
    }

    #[test]
    fn test_both_line_terminators_are_enter() {
        let matcher = SequenceMatcher::new();
        assert_eq!(matcher.match_sequence(&[0x0a]), MatchResult::Exact(Key::Enter));
        assert_eq!(matcher.match_sequence(&[0x0d]), MatchResult::Exact(Key::Enter));
    }

    #[test]
    fn test_arrow_sequences() {
        let matcher = SequenceMatcher::new();
        assert_eq!(
            matcher.match_sequence(&[0x1b, 0x5b, 0x44]),
            MatchResult::Exact(Key::Left)
        );
        assert_eq!(
            matcher.match_sequence(&[0x1b, 0x4f, 0x43]),
            MatchResult::Exact(Key::Right)
        );
    }

    #[test]
    fn test_prefix_detection() {
        let matcher = SequenceMatcher::new();
        // ESC alone is a valid key, not just a prefix
        assert_eq!(matcher.match_sequence(&[0x1b]), MatchResult::Exact(Key::Escape));
        // ESC[ must wait for more input
        assert_eq!(matcher.match_sequence(&[0x1b, 0x5b]), MatchResult::Prefix);
        assert_eq!(matcher.match_sequence(&[0x1b, 0x5b, 0x31]), MatchResult::Prefix);
    }

    #[test]
    fn test_no_match() {
        let matcher = SequenceMatcher::new();
        assert_eq!(matcher.match_sequence(&[0x61]), MatchResult::NoMatch);
        assert_eq!(matcher.match_sequence(&[0x1b, 0x5b, 0x7a]), MatchResult::NoMatch);
        assert_eq!(matcher.match_sequence(&[]), MatchResult::NoMatch);
    }

    #[test]
    fn test_longest_match_consumes_prefix() {
        let matcher = SequenceMatcher::new();
        // ESC[ followed by garbage: the longest valid match is ESC itself
        let result = matcher.find_longest_match(&[0x1b, 0x5b]).unwrap();
        assert_eq!(result.key, Key::Escape);
        assert_eq!(result.consumed_bytes, 1);

        // A full arrow sequence followed by a letter consumes three bytes
        let result = matcher.find_longest_match(&[0x1b, 0x5b, 0x41, 0x61]).unwrap();
        assert_eq!(result.key, Key::Up);
        assert_eq!(result.consumed_bytes, 3);
    }

    #[test]
    fn test_custom_sequence_registration() {
        let mut matcher = SequenceMatcher::new();
        matcher.insert(&[0x1b, 0x5b, 0x39, 0x39, 0x7e], Key::Ignore);
        assert_eq!(
            matcher.match_sequence(&[0x1b, 0x5b, 0x39, 0x39, 0x7e]),
            MatchResult::Exact(Key::Ignore)
        );
    }
}
