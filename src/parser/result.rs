use std::fmt::Formatter;
use crate::error::Error;
use crate::grammar::FirstSet;
use crate::lexer::LexerError;
use crate::token::{Position, Token, TokenKind};
use crate::tree::SyntaxNode;

/// Why parsing stopped.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SyntaxError<K> {
    /// `found` is not one of the `expected` kinds.
    UnexpectedToken {
        expected: Vec<K>,
        found: Token<K>,
        rule: String
    },
    /// The tokens ran out while `rule` still expected one of `expected`.
    UnexpectedEnd {
        expected: Vec<K>,
        position: Position,
        rule: String
    },
    /// The input could not be tokenized.
    Lexical(LexerError),
    UnknownRule(String)
}

impl<K: TokenKind> SyntaxError<K> {
    pub(crate) fn unexpected(expected: &FirstSet<K>, found: Option<&Token<K>>, end: Position, rule: &str) -> SyntaxError<K> {
        match found {
            Some(token) => SyntaxError::UnexpectedToken {
                expected: expected.to_vec(),
                found: token.clone(),
                rule: rule.to_string()
            },
            None => SyntaxError::UnexpectedEnd {
                expected: expected.to_vec(),
                position: end,
                rule: rule.to_string()
            }
        }
    }

    /// Where the error happened, if it points into the input.
    pub fn position(&self) -> Option<Position> {
        match self {
            SyntaxError::UnexpectedToken { found, .. } => Some(found.position),
            SyntaxError::UnexpectedEnd { position, .. } => Some(*position),
            SyntaxError::Lexical(error) => Some(error.position),
            SyntaxError::UnknownRule(_) => None
        }
    }

    pub fn expected(&self) -> &[K] {
        match self {
            SyntaxError::UnexpectedToken { expected, .. } | SyntaxError::UnexpectedEnd { expected, .. } => expected,
            _ => &[]
        }
    }

    /// The message followed by the offending line of `input` with a caret under the error.
    ///
    /// Lines are split at `'\n'`; see [render_with_line_break](Self::render_with_line_break).
    pub fn render(&self, input: &str) -> String {
        self.render_with_line_break(input, '\n')
    }

    /// Like [render](Self::render), for input lexed with a custom line break character.
    pub fn render_with_line_break(&self, input: &str, line_break: char) -> String {
        use colored::Colorize;

        match self.position() {
            Some(position) if !matches!(self, SyntaxError::Lexical(_)) => {
                let line = input.split(line_break)
                    .nth(position.line.saturating_sub(1))
                    .unwrap_or("")
                    .trim_end_matches('\r');
                format!(
                    "{}\n{}{}\n{}",
                    line,
                    " ".repeat(position.column.saturating_sub(1)),
                    "^".red(),
                    self
                )
            }
            _ => self.to_string()
        }
    }
}

fn expected_list<K: TokenKind>(expected: &[K]) -> String {
    match expected {
        [] => "nothing".to_string(),
        [only] => format!("{:?}", only),
        _ => format!("one of {}", expected.iter().map(|k| format!("{:?}", k)).collect::<Vec<_>>().join(", "))
    }
}

impl<K: TokenKind> std::fmt::Display for SyntaxError<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use colored::Colorize;

        match self {
            SyntaxError::UnexpectedToken { expected, found, rule } => write!(
                f,
                "Syntax Error: {} at {} while parsing {}; expected {}",
                format!("unexpected {:?} `{}`", found.kind, found.text).red(),
                found.position,
                rule.bright_blue(),
                expected_list(expected)
            ),
            SyntaxError::UnexpectedEnd { expected, position, rule } => write!(
                f,
                "Syntax Error: {} at {} while parsing {}; expected {}",
                "unexpected end of input".red(),
                position,
                rule.bright_blue(),
                expected_list(expected)
            ),
            SyntaxError::Lexical(error) => write!(f, "{}", error),
            SyntaxError::UnknownRule(rule) => write!(f, "Syntax Error: {} `{}`", "no rule named".red(), rule)
        }
    }
}

impl<K: TokenKind> std::error::Error for SyntaxError<K> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyntaxError::Lexical(error) => Some(error),
            _ => None
        }
    }
}

/// Outcome of one parse.
///
/// `is_ended` and [is_error](ParseResult::is_error) are independent: a parse can succeed
/// without consuming every token.
#[derive(Debug)]
pub struct ParseResult<K, V> {
    pub root: Option<SyntaxNode<K, V>>,
    pub errors: Vec<SyntaxError<K>>,
    /// Index of the first token not consumed.
    pub ending_position: usize,
    /// Whether the start rule consumed every token.
    pub is_ended: bool
}

impl<K: TokenKind, V> ParseResult<K, V> {
    pub(crate) fn failed(error: SyntaxError<K>, ending_position: usize) -> ParseResult<K, V> {
        ParseResult {
            root: None,
            errors: vec![error],
            ending_position,
            is_ended: false
        }
    }

    pub fn is_error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The value computed for the start rule.
    pub fn value(&self) -> Option<&V> {
        self.root.as_ref().and_then(SyntaxNode::value)
    }

    /// The tree, if parsing succeeded and consumed every token.
    pub fn into_result(mut self) -> Result<SyntaxNode<K, V>, Error> {
        if !self.errors.is_empty() {
            return Err(Error::Parse(Box::new(self.errors.remove(0))));
        }
        match self.root {
            Some(root) if self.is_ended => Ok(root),
            _ => Err(Error::Incomplete(self.ending_position))
        }
    }
}
