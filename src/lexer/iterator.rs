use std::marker::PhantomData;
use crate::lexer::{Lexer, LexerError};
use crate::token::{Position, Token, TokenKind};

/// Lazy token stream over a string, driven by [Lexer::run].
///
/// Yields at most one error, after which it is exhausted.
pub struct Tokens<'a, K: TokenKind, L: Lexer<K> + ?Sized> {
    pub(crate) lexer: &'a L,
    pub(crate) input: &'a str,
    pub(crate) position: Position,
    pub(crate) done: bool,
    kind: PhantomData<K>
}

impl<'a, K: TokenKind, L: Lexer<K> + ?Sized> Tokens<'a, K, L> {
    pub fn new(lexer: &'a L, input: &'a str) -> Self {
        Tokens {
            lexer,
            input,
            position: Position::start(),
            done: false,
            kind: PhantomData
        }
    }

    /// Where the next token attempt will start.
    pub fn position(&self) -> Position {
        self.position
    }
}

impl<K: TokenKind, L: Lexer<K> + ?Sized> Iterator for Tokens<'_, K, L> {
    type Item = Result<Token<K>, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.lexer.run(self.input, self.position) {
            Ok(Some((token, next))) => {
                self.position = next;
                Some(Ok(token))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<K: TokenKind, L: Lexer<K> + ?Sized> std::iter::FusedIterator for Tokens<'_, K, L> {}
