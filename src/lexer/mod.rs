//! Lexers turn input text into [tokens](crate::token::Token).
//!
//! Two implementations ship with the crate: the hand-built finite state machine
//! ([FsmLexer], assembled with [FsmLexerBuilder]) and the pattern-based [RegexLexer]. The parser
//! only depends on the [Lexer] trait, so any other token source works too.

pub mod builder;
pub mod fsm;
pub mod iterator;
pub mod pattern;

pub use builder::FsmLexerBuilder;
pub use fsm::FsmLexer;
pub use iterator::Tokens;
pub use pattern::{RegexLexer, RegexLexerBuilder};

use std::fmt::Formatter;
use crate::token::{Position, Token, TokenKind};

/// No lexeme could be matched at `position`.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct LexerError {
    /// The character that could not be consumed, `None` if the input ended mid-token.
    pub character: Option<char>,
    pub position: Position,
    /// The full line of input containing `position`, used for display.
    pub line_text: String
}

impl LexerError {
    pub(crate) fn at(input: &str, position: Position) -> LexerError {
        LexerError::at_line(input, position, '\n')
    }

    /// Like [at](Self::at), with lines split at `line_break`.
    pub(crate) fn at_line(input: &str, position: Position, line_break: char) -> LexerError {
        let line_start = input[..position.index].rfind(line_break)
            .map(|i| i + line_break.len_utf8())
            .unwrap_or(0);
        let line_end = input[position.index..].find(line_break)
            .map(|i| i + position.index)
            .unwrap_or(input.len());
        LexerError {
            character: input[position.index..].chars().next(),
            position,
            line_text: input[line_start..line_end].trim_end_matches('\r').to_string()
        }
    }

    /// `position` falls inside a multi-byte character.
    pub(crate) fn misaligned(input: &str, position: Position) -> LexerError {
        let index = (0..position.index).rev()
            .find(|&i| input.is_char_boundary(i))
            .unwrap_or(0);
        LexerError {
            character: input[index..].chars().next(),
            position,
            line_text: String::new()
        }
    }
}

/// Where a run starting at `start` may begin: `Ok(None)` past the end of `input`.
pub(crate) fn checked_start(input: &str, start: Position) -> Result<Option<Position>, LexerError> {
    if start.index >= input.len() {
        Ok(None)
    } else if !input.is_char_boundary(start.index) {
        Err(LexerError::misaligned(input, start))
    } else {
        Ok(Some(start))
    }
}

impl std::fmt::Display for LexerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use colored::Colorize;

        let found = match self.character {
            Some(c) => format!("unexpected character {:?}", c),
            None => "unexpected end of input".to_string()
        };
        write!(
            f,
            "{}\n{}{}\nLexer Error: {} at {}",
            self.line_text,
            " ".repeat(self.position.column.saturating_sub(1)),
            "^".red(),
            found.red(),
            self.position
        )
    }
}

impl std::error::Error for LexerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> { None }
}

/// Anything that can produce tokens from text.
///
/// Implementations are immutable once built, so one lexer can serve many threads at once.
pub trait Lexer<K: TokenKind>: Send + Sync {
    /// Lexes one token starting at `start`.
    ///
    /// Returns the token together with the position right after it, or `Ok(None)` when only
    /// ignored input remains. Nothing is remembered between calls.
    ///
    /// `start.index` should be 0 or a byte offset returned by an earlier run. An offset past
    /// the end of `input` yields `Ok(None)`, one inside a multi-byte character an error.
    fn run(&self, input: &str, start: Position) -> Result<Option<(Token<K>, Position)>, LexerError>;

    fn tokenize(&self, input: &str) -> Result<Vec<Token<K>>, LexerError> {
        let mut result = vec![];
        let mut position = Position::start();
        while let Some((token, next)) = self.run(input, position)? {
            result.push(token);
            position = next;
        }
        Ok(result)
    }

    /// Lazily lexes `input`; see [Tokens].
    fn tokens<'a>(&'a self, input: &'a str) -> Tokens<'a, K, Self> where Self: Sized {
        Tokens::new(self, input)
    }
}
