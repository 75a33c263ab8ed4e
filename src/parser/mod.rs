//! Predictive recursive-descent parsing over a resolved [Grammar].
//!
//! Alternatives are chosen by looking at one token: the first alternative whose FIRST set holds
//! the next token wins, otherwise the first one that can match nothing. Nothing is ever undone,
//! so the first failure ends the parse.

mod engine;
pub mod result;

pub use result::{ParseResult, SyntaxError};

use engine::Engine;
use crate::grammar::Grammar;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl<K: TokenKind, V, C> Grammar<K, V, C> {
    /// Parses `tokens` starting at rule `start`, threading `context` through every action.
    pub fn parse_tokens(&self, tokens: &[Token<K>], start: &str, context: &mut C) -> ParseResult<K, V> {
        match self.rule_index(start) {
            Some(index) => Engine::new(self, tokens, context).run(index),
            None => ParseResult::failed(SyntaxError::UnknownRule(start.to_string()), 0)
        }
    }
}

/// A grammar paired with the lexer that feeds it and a default start rule.
///
/// Built with [GrammarBuilder::build_parser](crate::grammar::GrammarBuilder::build_parser).
/// Parsing never mutates the parser, so one instance can be shared between threads.
pub struct Parser<K: Ord, V, C = ()> {
    grammar: Grammar<K, V, C>,
    lexer: Box<dyn Lexer<K>>,
    start: String
}

impl<K: TokenKind, V, C> Parser<K, V, C> {
    pub(crate) fn new(grammar: Grammar<K, V, C>, lexer: Box<dyn Lexer<K>>, start: &str) -> Parser<K, V, C> {
        Parser {
            grammar,
            lexer,
            start: start.to_string()
        }
    }

    pub fn grammar(&self) -> &Grammar<K, V, C> {
        &self.grammar
    }

    pub fn lexer(&self) -> &dyn Lexer<K> {
        self.lexer.as_ref()
    }

    pub fn start_rule(&self) -> &str {
        &self.start
    }

    /// Lexes and parses `input` with a fresh default context.
    pub fn parse(&self, input: &str) -> ParseResult<K, V> where C: Default {
        let mut context = C::default();
        self.parse_with_context(input, &mut context)
    }

    pub fn parse_with_context(&self, input: &str, context: &mut C) -> ParseResult<K, V> {
        self.parse_rule(input, &self.start, context)
    }

    /// Like [parse_with_context](Parser::parse_with_context), starting at any rule.
    pub fn parse_rule(&self, input: &str, rule: &str, context: &mut C) -> ParseResult<K, V> {
        match self.lexer.tokenize(input) {
            Ok(tokens) => self.grammar.parse_tokens(&tokens, rule, context),
            Err(error) => ParseResult::failed(SyntaxError::Lexical(error), 0)
        }
    }
}
