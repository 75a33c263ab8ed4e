//! A lexer built from one regular expression per token kind.
//!
//! Every pattern is tried at the current position; the longest match wins and ties go to the
//! lexeme declared first.

use regex::Regex;
use crate::build::{BuildResult, Diagnostic, DiagnosticCode};
use crate::lexer::{checked_start, Lexer, LexerError};
use crate::token::{Position, Token, TokenKind};

struct Lexeme<K> {
    kind: K,
    regex: Regex,
    skip: bool,
    line_ending: bool
}

pub struct RegexLexer<K> {
    lexemes: Vec<Lexeme<K>>
}

pub struct RegexLexerBuilder<K> {
    patterns: Vec<(K, String, bool, bool)>
}

impl<K: TokenKind> Default for RegexLexerBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TokenKind> RegexLexerBuilder<K> {
    pub fn new() -> RegexLexerBuilder<K> {
        RegexLexerBuilder { patterns: vec![] }
    }

    pub fn lexeme(&mut self, kind: K, pattern: &str) -> &mut Self {
        self.patterns.push((kind, pattern.to_string(), false, false));
        self
    }

    /// Matched and consumed, but never emitted.
    pub fn skip(&mut self, kind: K, pattern: &str) -> &mut Self {
        self.patterns.push((kind, pattern.to_string(), true, false));
        self
    }

    /// Each of `\r\n`, `\n` and `\r` inside a match counts as one line break.
    pub fn line_ending(&mut self, kind: K, pattern: &str, skip: bool) -> &mut Self {
        self.patterns.push((kind, pattern.to_string(), skip, true));
        self
    }

    pub fn build(self) -> BuildResult<RegexLexer<K>> {
        let mut diagnostics = vec![];
        let mut lexemes = vec![];

        if self.patterns.is_empty() {
            diagnostics.push(Diagnostic::fatal(DiagnosticCode::NoLexemes, "no lexemes were declared"));
        }

        for (kind, pattern, skip, line_ending) in self.patterns {
            let name = format!("{:?}", kind);
            match Regex::new(&format!("^(?:{})", pattern)) {
                Ok(regex) if regex.is_match("") => {
                    diagnostics.push(
                        Diagnostic::fatal(DiagnosticCode::EmptyPattern, format!("pattern `{}` matches the empty string", pattern))
                            .in_rule(name)
                    );
                }
                Ok(regex) => lexemes.push(Lexeme { kind, regex, skip, line_ending }),
                Err(e) => {
                    diagnostics.push(
                        Diagnostic::fatal(DiagnosticCode::InvalidPattern, format!("pattern `{}` is invalid: {}", pattern, e))
                            .in_rule(name)
                    );
                }
            }
        }

        tracing::debug!(lexemes = lexemes.len(), "built regex lexer");
        BuildResult::new(RegexLexer { lexemes }, diagnostics)
    }
}

fn advance_line_endings(mut position: Position, text: &str) -> Position {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        position.index += c.len_utf8();
        match c {
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => {
                position.line += 1;
                position.column = 1;
            }
            _ => position.column += 1
        }
    }
    position
}

impl<K: TokenKind> Lexer<K> for RegexLexer<K> {
    fn run(&self, input: &str, start: Position) -> Result<Option<(Token<K>, Position)>, LexerError> {
        let mut position = match checked_start(input, start)? {
            Some(position) => position,
            None => return Ok(None)
        };
        while position.index < input.len() {
            let rest = &input[position.index..];
            let mut longest: Option<(&Lexeme<K>, usize)> = None;
            for lexeme in &self.lexemes {
                // Zero-width matches never make progress.
                if let Some(m) = lexeme.regex.find(rest).filter(|m| m.end() > 0) {
                    match longest {
                        Some((_, len)) if len >= m.end() => {}
                        _ => longest = Some((lexeme, m.end()))
                    }
                }
            }

            let (lexeme, len) = match longest {
                Some(found) => found,
                None => return Err(LexerError::at(input, position))
            };
            let text = &rest[..len];
            let next = if lexeme.line_ending {
                advance_line_endings(position, text)
            } else {
                text.chars().fold(position, |p, c| p.advance(c, '\n'))
            };

            if !lexeme.skip {
                return Ok(Some((Token::new(lexeme.kind, text, position), next)));
            }
            position = next;
        }
        Ok(None)
    }
}
