//! Fluent construction of [FsmLexer]s.
//!
//! The builder always has a *current state*. Plain transitions create a fresh state and move
//! there; the `*_to` variants link the current state to an existing named state and move there.
//! `end` makes the current state terminal.
//!
//! ```
//! use descent::lexer::{FsmLexerBuilder, Lexer};
//!
//! #[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
//! enum Tok { Int, Plus }
//!
//! let mut builder = FsmLexerBuilder::new();
//! builder.ignore_ws().white_space(' ');
//! builder.mark("start");
//! builder.range_transition('0', '9').mark("int").range_transition_to('0', '9', "int").end(Tok::Int);
//! builder.goto("start").transition('+').end(Tok::Plus);
//!
//! let lexer = builder.build().value.unwrap();
//! let tokens = lexer.tokenize("12 + 3").unwrap();
//! assert_eq!(tokens.len(), 3);
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use crate::build::{BuildResult, Diagnostic, DiagnosticCode};
use crate::lexer::fsm::{CharTest, End, FsmLexer, State, Transition};
use crate::token::{Token, TokenKind};

pub struct FsmLexerBuilder<K> {
    states: Vec<State<K>>,
    marks: HashMap<String, usize>,
    current: Option<usize>,
    ignore_ws: bool,
    white_space: Vec<char>,
    ignore_eol: bool,
    line_break: char,
    diagnostics: Vec<Diagnostic>
}

impl<K: TokenKind> Default for FsmLexerBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TokenKind> FsmLexerBuilder<K> {
    pub fn new() -> FsmLexerBuilder<K> {
        FsmLexerBuilder {
            states: vec![State::new(None)],
            marks: HashMap::new(),
            current: Some(0),
            ignore_ws: false,
            white_space: vec![],
            ignore_eol: false,
            line_break: '\n',
            diagnostics: vec![]
        }
    }

    /// Skip white space between tokens. Defaults to space and tab unless
    /// [white_space](Self::white_space) names the characters.
    pub fn ignore_ws(&mut self) -> &mut Self {
        self.ignore_ws = true;
        self
    }

    pub fn white_space(&mut self, c: char) -> &mut Self {
        if !self.white_space.contains(&c) {
            self.white_space.push(c);
        }
        self
    }

    /// Skip line breaks (and carriage returns) between tokens. They still count toward line numbers.
    pub fn ignore_eol(&mut self) -> &mut Self {
        self.ignore_eol = true;
        self
    }

    pub fn line_break(&mut self, c: char) -> &mut Self {
        self.line_break = c;
        self
    }

    /// Names the current state.
    pub fn mark(&mut self, name: &str) -> &mut Self {
        let current = match self.current {
            Some(c) => c,
            None => return self
        };
        match self.marks.get(name) {
            Some(&existing) if existing != current => {
                self.diagnostics.push(
                    Diagnostic::fatal(DiagnosticCode::DuplicateState, format!("state `{}` is already defined", name))
                        .in_rule(name)
                );
            }
            _ => {
                self.marks.insert(name.to_string(), current);
                self.states[current].name = Some(name.to_string());
            }
        }
        self
    }

    /// Makes a named state current.
    pub fn goto(&mut self, name: &str) -> &mut Self {
        self.current = self.lookup(name);
        self
    }

    pub fn transition(&mut self, c: char) -> &mut Self {
        self.add(CharTest::Char(c), None)
    }

    pub fn transition_to(&mut self, c: char, mark: &str) -> &mut Self {
        self.add(CharTest::Char(c), Some(mark))
    }

    pub fn range_transition(&mut self, low: char, high: char) -> &mut Self {
        self.add(CharTest::Range(low, high), None)
    }

    pub fn range_transition_to(&mut self, low: char, high: char, mark: &str) -> &mut Self {
        self.add(CharTest::Range(low, high), Some(mark))
    }

    pub fn except_transition(&mut self, excluded: &[char]) -> &mut Self {
        self.add(CharTest::Except(excluded.to_vec()), None)
    }

    pub fn except_transition_to(&mut self, excluded: &[char], mark: &str) -> &mut Self {
        self.add(CharTest::Except(excluded.to_vec()), Some(mark))
    }

    pub fn any_transition(&mut self) -> &mut Self {
        self.add(CharTest::Any, None)
    }

    pub fn any_transition_to(&mut self, mark: &str) -> &mut Self {
        self.add(CharTest::Any, Some(mark))
    }

    /// Makes the current state terminal, emitting `kind`.
    pub fn end(&mut self, kind: K) -> &mut Self {
        self.set_end(kind, false)
    }

    /// Like [end](Self::end), but the token is consumed without being emitted.
    pub fn end_skipped(&mut self, kind: K) -> &mut Self {
        self.set_end(kind, true)
    }

    /// Attaches a transformation to the current terminal state.
    pub fn callback(&mut self, callback: impl Fn(Token<K>) -> Token<K> + Send + Sync + 'static) -> &mut Self {
        if let Some(current) = self.current {
            match &mut self.states[current].end {
                Some(end) => end.callback = Some(Arc::new(callback)),
                None => self.diagnostics.push(
                    Diagnostic::fatal(DiagnosticCode::UnknownState, "callback on a state that is not terminal")
                        .in_rule(self.state_name(current))
                )
            }
        }
        self
    }

    pub fn build(self) -> BuildResult<FsmLexer<K>> {
        let mut diagnostics = self.diagnostics;
        for (i, state) in self.states.iter().enumerate() {
            if state.transitions.is_empty() && state.end.is_none() {
                let name = state.name.clone().unwrap_or_else(|| format!("#{}", i));
                diagnostics.push(
                    Diagnostic::warning(DiagnosticCode::DeadEndState, "state has no transitions and is not terminal")
                        .in_rule(name)
                );
            }
        }

        let ignored = match (self.ignore_ws, self.white_space.is_empty()) {
            (false, _) => vec![],
            (true, true) => vec![' ', '\t'],
            (true, false) => self.white_space
        };

        for d in diagnostics.iter().filter(|d| !d.is_fatal()) {
            tracing::warn!("{}", d);
        }
        tracing::debug!(states = self.states.len(), "built fsm lexer");

        BuildResult::new(
            FsmLexer {
                states: self.states,
                ignored,
                ignore_eol: self.ignore_eol,
                line_break: self.line_break
            },
            diagnostics
        )
    }

    fn lookup(&mut self, name: &str) -> Option<usize> {
        let found = self.marks.get(name).copied();
        if found.is_none() {
            self.diagnostics.push(
                Diagnostic::fatal(DiagnosticCode::UnknownState, format!("no state is marked `{}`", name))
                    .in_rule(name)
            );
        }
        found
    }

    fn add(&mut self, test: CharTest, mark: Option<&str>) -> &mut Self {
        let from = match self.current {
            Some(c) => c,
            None => return self
        };
        let target = match mark {
            Some(name) => match self.lookup(name) {
                Some(t) => t,
                None => {
                    self.current = None;
                    return self;
                }
            },
            None => {
                self.states.push(State::new(None));
                self.states.len() - 1
            }
        };

        // stable: same-priority transitions keep declaration order
        let transitions = &mut self.states[from].transitions;
        let index = transitions.iter()
            .position(|t| t.test.priority() > test.priority())
            .unwrap_or(transitions.len());
        transitions.insert(index, Transition { test, target });

        self.current = Some(target);
        self
    }

    fn set_end(&mut self, kind: K, skip: bool) -> &mut Self {
        if let Some(current) = self.current {
            match &self.states[current].end {
                Some(existing) if existing.kind != kind => {
                    self.diagnostics.push(
                        Diagnostic::fatal(
                            DiagnosticCode::DuplicateEnd,
                            format!("state already ends with {:?}, cannot also end with {:?}", existing.kind, kind)
                        ).in_rule(self.state_name(current))
                    );
                }
                _ => {
                    self.states[current].end = Some(End {
                        kind,
                        skip,
                        callback: None
                    });
                }
            }
        }
        self
    }

    fn state_name(&self, index: usize) -> String {
        self.states[index].name.clone().unwrap_or_else(|| format!("#{}", index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::Severity;
    use crate::lexer::Lexer;
    use crate::token::Position;

    #[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
    enum Json {
        String,
        Int,
        Double,
        Open,
        Close,
        Colon,
        Comma
    }

    fn json_lexer() -> FsmLexer<Json> {
        let mut builder = FsmLexerBuilder::new();
        builder.ignore_ws().white_space(' ').white_space('\t').ignore_eol();
        builder.mark("start");

        builder.transition('"')
            .mark("in_string")
            .except_transition_to(&['"', '\\'], "in_string")
            .transition('\\')
            .mark("escape")
            .any_transition_to("in_string")
            .transition('"')
            .end(Json::String);

        builder.goto("start").transition('{').end(Json::Open);
        builder.goto("start").transition('}').end(Json::Close);
        builder.goto("start").transition(':').end(Json::Colon);
        builder.goto("start").transition(',').end(Json::Comma);

        builder.goto("start")
            .range_transition('0', '9')
            .mark("in_int")
            .range_transition_to('0', '9', "in_int")
            .end(Json::Int)
            .transition('.')
            .mark("start_double")
            .range_transition('0', '9')
            .mark("in_double")
            .range_transition_to('0', '9', "in_double")
            .end(Json::Double);

        let result = builder.build();
        assert!(!result.is_error(), "{:?}", result.diagnostics);
        result.value.unwrap()
    }

    #[test]
    fn lexes_json_object() {
        let lexer = json_lexer();
        let tokens = lexer.tokenize("{\n\"d\" : 42.42 ,\n\"i\" : 42 }").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![
            Json::Open, Json::String, Json::Colon, Json::Double, Json::Comma,
            Json::String, Json::Colon, Json::Int, Json::Close
        ]);
        assert_eq!(tokens[3].text, "42.42");
        assert_eq!(tokens[5].position, Position { index: 16, line: 3, column: 1 });
    }

    #[test]
    fn escapes_stay_in_string() {
        let lexer = json_lexer();
        let tokens = lexer.tokenize(r#""a\"b""#).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, r#""a\"b""#);
    }

    #[test]
    fn stuck_in_non_terminal_state() {
        let lexer = json_lexer();
        let error = lexer.tokenize("12.x").unwrap_err();
        assert_eq!(error.character, Some('x'));
        assert_eq!(error.position.column, 4);
    }

    #[test]
    fn unknown_character() {
        let lexer = json_lexer();
        let error = lexer.tokenize("{ ? }").unwrap_err();
        assert_eq!(error.character, Some('?'));
        assert_eq!(error.position, Position { index: 2, line: 1, column: 3 });
    }

    #[test]
    fn callback_rewrites_token() {
        let mut builder = FsmLexerBuilder::new();
        builder.range_transition('a', 'z')
            .mark("word")
            .range_transition_to('a', 'z', "word")
            .end('w')
            .callback(|token| Token { text: token.text.to_uppercase(), ..token });
        let lexer = builder.build().value.unwrap();
        let tokens = lexer.tokenize("abc").unwrap();
        assert_eq!(tokens[0].text, "ABC");
    }

    #[test]
    fn skipped_end_consumes_comment() {
        let mut builder = FsmLexerBuilder::new();
        builder.mark("start");
        builder.transition('#').mark("comment").except_transition_to(&['\n'], "comment").end_skipped('#');
        builder.goto("start").transition('\n').end_skipped('\n');
        builder.goto("start").transition('x').end('x');
        let lexer = builder.build().value.unwrap();
        let tokens = lexer.tokenize("# note\nx").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].position, Position { index: 7, line: 2, column: 1 });
    }

    #[test]
    fn unknown_mark_is_fatal() {
        let mut builder = FsmLexerBuilder::<char>::new();
        builder.transition('a').transition_to('b', "nowhere").end('a');
        let result = builder.build();
        assert!(result.is_error());
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::UnknownState);
    }

    #[test]
    fn dead_end_is_warning() {
        let mut builder = FsmLexerBuilder::<char>::new();
        builder.mark("start");
        builder.transition('a').end('a');
        builder.goto("start").transition('b');
        let result = builder.build();
        assert!(!result.is_error());
        assert_eq!(result.diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn conflicting_end_is_fatal() {
        let mut builder = FsmLexerBuilder::new();
        builder.transition('a').end('a').end('b');
        assert!(builder.build().is_error());
    }

    #[test]
    fn run_outside_input() {
        let lexer = json_lexer();
        let past = Position { index: 12, line: 1, column: 13 };
        assert_eq!(lexer.run("{}", past), Ok(None));
        assert!(lexer.run("\"\u{e9}\"", Position { index: 2, line: 1, column: 3 }).is_err());
    }

    #[test]
    fn custom_line_break() {
        let mut builder = FsmLexerBuilder::new();
        builder.line_break(';').ignore_eol();
        builder.mark("start").transition('a').end(Json::Int);
        let lexer = builder.build().value.unwrap();

        let tokens = lexer.tokenize("a;;a").unwrap();
        assert_eq!(tokens[1].position, Position { index: 3, line: 3, column: 1 });
        let error = lexer.tokenize("a;b;a").unwrap_err();
        assert_eq!(error.line_text, "b");
    }
}
