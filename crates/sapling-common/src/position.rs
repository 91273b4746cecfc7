//! Source positions.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! Conformance fixtures report errors by line and column, so every token and
//! every parse error carries the position of the input character that
//! produced it.

use std::fmt;

/// A location in the (newline-normalized) input.
///
/// `line` and `column` are 1-based, `offset` is the 0-based index of the
/// character in the input. Positions only ever move forward while the
/// input is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number, counted in characters.
    pub column: usize,
    /// 0-based character offset from the start of the input.
    ///
    /// Counted after newline normalization: a CRLF pair is one character,
    /// so after any CRLF this is smaller than the offset into the caller's
    /// original string.
    pub offset: usize,
}

impl Position {
    /// The position before any character has been consumed.
    pub const START: Self = Self {
        line: 1,
        column: 0,
        offset: 0,
    };

    /// Create a position from its parts.
    #[must_use]
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// The position after consuming `c` from this position.
    ///
    /// A line feed moves to column 0 of the next line, so the first
    /// character on the new line reports column 1.
    #[must_use]
    pub const fn advanced_by(self, c: char) -> Self {
        if c == '\n' {
            Self {
                line: self.line + 1,
                column: 0,
                offset: self.offset + 1,
            }
        } else {
            Self {
                line: self.line,
                column: self.column + 1,
                offset: self.offset + 1,
            }
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advancing_over_text_moves_column() {
        let pos = Position::START.advanced_by('a').advanced_by('b');
        assert_eq!(pos, Position::new(1, 2, 2));
    }

    #[test]
    fn line_feed_starts_next_line() {
        let pos = Position::START.advanced_by('a').advanced_by('\n');
        assert_eq!(pos, Position::new(2, 0, 2));
        assert_eq!(pos.advanced_by('x'), Position::new(2, 1, 3));
    }

    #[test]
    fn displays_line_and_column() {
        assert_eq!(Position::new(3, 7, 40).to_string(), "3:7");
    }
}
