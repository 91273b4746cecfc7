//! Input cursor over the character stream.
//!
//! [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
//!
//! "Before the tokenization stage, the input stream must be preprocessed by
//! normalizing newlines." CR LF pairs and lone CRs become a single LF here,
//! so the tokenizer never sees U+000D.

use sapling_common::Position;

/// A cursor over the preprocessed input with position tracking and a
/// single character of push-back.
#[derive(Debug, Clone)]
pub struct InputCursor {
    chars: Vec<char>,
    /// Index of the next character `advance` will return.
    index: usize,
    /// Position of the most recently consumed character.
    position: Position,
    /// State before the most recent `advance`, restored by `reconsume`.
    previous: Option<Snapshot>,
    /// Number of characters consumed at least once.
    high_water: usize,
    /// Whether the last `advance` returned a character for the first time.
    fresh: bool,
}

#[derive(Debug, Clone, Copy)]
struct Snapshot {
    index: usize,
    position: Position,
}

impl InputCursor {
    /// Create a cursor over `input`, normalizing newlines.
    ///
    /// Positions, offsets included, refer to the normalized characters.
    #[must_use]
    pub fn new(input: &str) -> Self {
        let mut chars = Vec::with_capacity(input.len());
        let mut iter = input.chars().peekable();
        while let Some(c) = iter.next() {
            if c == '\r' {
                // "replace every U+000D CR U+000A LF code point pair with a
                // single U+000A LF code point, then replace every remaining
                // U+000D CR code point with a U+000A LF code point."
                if iter.peek() == Some(&'\n') {
                    let _ = iter.next();
                }
                chars.push('\n');
            } else {
                chars.push(c);
            }
        }
        Self {
            chars,
            index: 0,
            position: Position::START,
            previous: None,
            high_water: 0,
            fresh: false,
        }
    }

    /// The next character, without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.peek_nth(0)
    }

    /// The character `n` places after the next one, without consuming.
    #[must_use]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.get(self.index + n).copied()
    }

    /// Consume the next character, updating the position.
    ///
    /// Returns `None` at end of input; consuming EOF can be repeated and
    /// reconsumed like any other character.
    pub fn advance(&mut self) -> Option<char> {
        self.previous = Some(Snapshot {
            index: self.index,
            position: self.position,
        });
        let c = self.chars.get(self.index).copied();
        if let Some(c) = c {
            self.index += 1;
            self.position = self.position.advanced_by(c);
            self.fresh = self.index > self.high_water;
            self.high_water = self.high_water.max(self.index);
        } else {
            self.fresh = false;
        }
        c
    }

    /// Push back the most recently consumed character.
    ///
    /// The position returns to where it was before that character was
    /// consumed. Only one character of push-back is kept: a second call
    /// without an intervening `advance` does nothing.
    pub fn reconsume(&mut self) {
        if let Some(snapshot) = self.previous.take() {
            self.index = snapshot.index;
            self.position = snapshot.position;
        }
    }

    /// Whether the last `advance` returned a character that had never been
    /// consumed before (as opposed to one pushed back by `reconsume`).
    #[must_use]
    pub const fn last_was_fresh(&self) -> bool {
        self.fresh
    }

    /// Whether every character has been consumed.
    #[must_use]
    pub fn eof(&self) -> bool {
        self.index >= self.chars.len()
    }

    /// Position of the most recently consumed character.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// "If the next few characters are..." (exact match).
    #[must_use]
    pub fn next_chars_are(&self, target: &str) -> bool {
        target
            .chars()
            .enumerate()
            .all(|(i, expected)| self.peek_nth(i) == Some(expected))
    }

    /// "ASCII case-insensitive match for the word ..."
    #[must_use]
    pub fn next_chars_are_ignore_ascii_case(&self, target: &str) -> bool {
        target.chars().enumerate().all(|(i, expected)| {
            self.peek_nth(i)
                .is_some_and(|c| c.eq_ignore_ascii_case(&expected))
        })
    }

    /// Consume `target`, which the caller has already matched with one of
    /// the `next_chars_are` checks.
    pub fn skip(&mut self, target: &str) {
        for _ in target.chars() {
            let _ = self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_and_lone_cr_become_lf() {
        let mut cursor = InputCursor::new("a\r\nb\rc");
        let consumed: String = std::iter::from_fn(|| cursor.advance()).collect();
        assert_eq!(consumed, "a\nb\nc");
    }

    #[test]
    fn advance_tracks_line_and_column() {
        let mut cursor = InputCursor::new("ab\ncd");
        for _ in 0..4 {
            let _ = cursor.advance();
        }
        assert_eq!(cursor.position(), Position::new(2, 1, 4));
    }

    #[test]
    fn offsets_count_normalized_characters() {
        let mut cursor = InputCursor::new("a\r\nb");
        for _ in 0..3 {
            let _ = cursor.advance();
        }
        assert_eq!(cursor.position(), Position::new(2, 1, 3));
    }

    #[test]
    fn reconsume_restores_position() {
        let mut cursor = InputCursor::new("xy");
        assert_eq!(cursor.advance(), Some('x'));
        let before = cursor.position();
        assert_eq!(cursor.advance(), Some('y'));
        cursor.reconsume();
        assert_eq!(cursor.position(), before);
        assert_eq!(cursor.peek(), Some('y'));
        assert_eq!(cursor.advance(), Some('y'));
        assert!(!cursor.last_was_fresh());
    }

    #[test]
    fn reconsume_only_pushes_back_one_character() {
        let mut cursor = InputCursor::new("abc");
        let _ = cursor.advance();
        let _ = cursor.advance();
        cursor.reconsume();
        cursor.reconsume();
        assert_eq!(cursor.advance(), Some('b'));
    }

    #[test]
    fn eof_can_be_consumed_repeatedly() {
        let mut cursor = InputCursor::new("a");
        assert_eq!(cursor.advance(), Some('a'));
        assert!(cursor.eof());
        assert_eq!(cursor.advance(), None);
        cursor.reconsume();
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.position(), Position::new(1, 1, 1));
    }

    #[test]
    fn lookahead_is_case_insensitive_when_asked() {
        let cursor = InputCursor::new("DocType html");
        assert!(cursor.next_chars_are_ignore_ascii_case("doctype"));
        assert!(!cursor.next_chars_are("doctype"));
        assert!(cursor.next_chars_are("DocT"));
    }
}
