use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

/// Anything usable as the kind of a token.
///
/// Implemented for every type with the right bounds, so a plain `#[derive(..)]` enum works.
pub trait TokenKind: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static {}

impl<T: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static> TokenKind for T {}

/// A location in the input. `index` is a byte offset, `line` and `column` start at 1.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub index: usize,
    pub line: usize,
    pub column: usize
}

impl Position {
    pub const fn start() -> Position {
        Position {
            index: 0,
            line: 1,
            column: 1
        }
    }

    /// Position after consuming `c`. `line_break` decides whether `c` starts a new line.
    pub fn advance(self, c: char, line_break: char) -> Position {
        if c == line_break {
            Position {
                index: self.index + c.len_utf8(),
                line: self.line + 1,
                column: 1
            }
        } else {
            Position {
                index: self.index + c.len_utf8(),
                column: self.column + 1,
                ..self
            }
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token<K> {
    pub kind: K,
    pub text: String,
    pub position: Position
}

impl<K: TokenKind> Token<K> {
    pub fn new(kind: K, text: impl Into<String>, position: Position) -> Token<K> {
        Token {
            kind,
            text: text.into(),
            position
        }
    }

    /// Position just past the last character of the token, counting `'\n'` as a line break.
    pub fn end(&self) -> Position {
        self.text.chars().fold(self.position, |pos, c| pos.advance(c, '\n'))
    }
}

impl<K: TokenKind> Display for Token<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}:{}", self.kind, self.text)
    }
}
