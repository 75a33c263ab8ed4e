use std::sync::Arc;
use tinyvec::TinyVec;
use crate::lexer::{checked_start, Lexer, LexerError};
use crate::token::{Position, Token, TokenKind};

/// Pure transformation applied to every token emitted by a terminal state.
pub type Callback<K> = Arc<dyn Fn(Token<K>) -> Token<K> + Send + Sync>;

/// Which characters a transition accepts.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum CharTest {
    Char(char),
    /// Inclusive on both ends.
    Range(char, char),
    Except(Vec<char>),
    #[default]
    Any
}

impl CharTest {
    pub fn accepts(&self, c: char) -> bool {
        match self {
            CharTest::Char(expected) => c == *expected,
            CharTest::Range(low, high) => (*low..=*high).contains(&c),
            CharTest::Except(excluded) => !excluded.contains(&c),
            CharTest::Any => true
        }
    }

    /// Lower is tested first.
    pub(crate) fn priority(&self) -> u8 {
        match self {
            CharTest::Char(_) => 0,
            CharTest::Range(..) => 1,
            CharTest::Except(_) => 2,
            CharTest::Any => 3
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Transition {
    pub test: CharTest,
    pub target: usize
}

pub(crate) struct End<K> {
    pub kind: K,
    pub skip: bool,
    pub callback: Option<Callback<K>>
}

pub(crate) struct State<K> {
    pub name: Option<String>,
    pub transitions: TinyVec<[Transition; 4]>,
    pub end: Option<End<K>>
}

impl<K> State<K> {
    pub(crate) fn new(name: Option<String>) -> State<K> {
        State {
            name,
            transitions: TinyVec::new(),
            end: None
        }
    }

    fn step(&self, c: char) -> Option<usize> {
        self.transitions.iter()
            .find(|t| t.test.accepts(c))
            .map(|t| t.target)
    }
}

/// A deterministic character automaton producing one token per run.
///
/// Built with [FsmLexerBuilder](crate::lexer::FsmLexerBuilder). The machine itself is never
/// mutated by lexing, so it can be shared freely.
pub struct FsmLexer<K> {
    pub(crate) states: Vec<State<K>>,
    pub(crate) ignored: Vec<char>,
    pub(crate) ignore_eol: bool,
    pub(crate) line_break: char
}

impl<K: TokenKind> FsmLexer<K> {
    const START: usize = 0;

    fn is_ignored(&self, c: char) -> bool {
        self.ignored.contains(&c)
            || (self.ignore_eol && (c == self.line_break || c == '\r'))
    }

    fn skip_ignored(&self, input: &str, mut position: Position) -> Position {
        for c in input[position.index..].chars() {
            if !self.is_ignored(c) {
                break;
            }
            position = position.advance(c, self.line_break);
        }
        position
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Looks up a named state. The start state is always index 0.
    pub fn state(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|s| s.name.as_deref() == Some(name))
    }
}

impl<K: TokenKind> Lexer<K> for FsmLexer<K> {
    fn run(&self, input: &str, start: Position) -> Result<Option<(Token<K>, Position)>, LexerError> {
        let mut position = match checked_start(input, start)? {
            Some(position) => position,
            None => return Ok(None)
        };
        loop {
            position = self.skip_ignored(input, position);
            if position.index >= input.len() {
                return Ok(None);
            }

            let mut state = Self::START;
            let mut cursor = position;
            for c in input[position.index..].chars() {
                match self.states[state].step(c) {
                    Some(next) => {
                        state = next;
                        cursor = cursor.advance(c, self.line_break);
                    }
                    None => break
                }
            }

            let end = match &self.states[state].end {
                Some(end) if cursor.index > position.index => end,
                _ => return Err(LexerError::at_line(input, cursor, self.line_break))
            };
            if end.skip {
                position = cursor;
                continue;
            }

            let token = Token::new(end.kind, &input[position.index..cursor.index], position);
            let token = match &end.callback {
                Some(callback) => callback(token),
                None => token
            };
            tracing::trace!(kind = ?token.kind, text = %token.text, "fsm token");
            return Ok(Some((token, cursor)));
        }
    }
}

impl<K: TokenKind> std::fmt::Debug for FsmLexer<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for (i, state) in self.states.iter().enumerate() {
            let name = state.name.clone().unwrap_or_else(|| format!("#{}", i));
            let end = state.end.as_ref().map(|e| e.kind);
            let targets: Vec<_> = state.transitions.iter().map(|t| (&t.test, t.target)).collect();
            list.entry(&(name, end, targets));
        }
        list.finish()
    }
}
