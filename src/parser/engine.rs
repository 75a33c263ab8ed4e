//! The matching engine: one token of lookahead, no backtracking.

use std::sync::Arc;
use crate::grammar::{Clause, FirstSet, Grammar};
use crate::parser::result::{ParseResult, SyntaxError};
use crate::token::{Position, Token, TokenKind};
use crate::tree::{NonTerminalNode, SyntaxNode};

type Outcome<K, V> = Result<SyntaxNode<K, V>, SyntaxError<K>>;

pub(crate) struct Engine<'g, 't, 'c, K: Ord, V, C> {
    grammar: &'g Grammar<K, V, C>,
    tokens: &'t [Token<K>],
    cursor: usize,
    context: &'c mut C
}

impl<'g, 't, 'c, K: TokenKind, V, C> Engine<'g, 't, 'c, K, V, C> {
    pub fn new(grammar: &'g Grammar<K, V, C>, tokens: &'t [Token<K>], context: &'c mut C) -> Self {
        Engine {
            grammar,
            tokens,
            cursor: 0,
            context
        }
    }

    /// Matches rule `start` against a prefix of the tokens.
    pub fn run(mut self, start: usize) -> ParseResult<K, V> {
        match self.rule(start) {
            Ok(root) => ParseResult {
                root: Some(root),
                errors: vec![],
                ending_position: self.cursor,
                is_ended: self.cursor == self.tokens.len()
            },
            Err(error) => {
                tracing::debug!(cursor = self.cursor, "parse failed: {}", error);
                ParseResult::failed(error, self.cursor)
            }
        }
    }

    fn lookahead(&self) -> Option<K> {
        self.tokens.get(self.cursor).map(|t| t.kind)
    }

    fn fail(&self, expected: &FirstSet<K>, rule: &str) -> SyntaxError<K> {
        let end = self.tokens.last().map_or(Position::start(), Token::end);
        SyntaxError::unexpected(expected, self.tokens.get(self.cursor), end, rule)
    }

    fn rule(&mut self, index: usize) -> Outcome<K, V> {
        let grammar = self.grammar;
        let rule = &grammar.rules[index];
        let lookahead = self.lookahead();

        let chosen = rule.alternatives.iter()
            .position(|a| lookahead.map_or(false, |k| a.first.contains(&k)))
            .or_else(|| rule.alternatives.iter().position(|a| a.may_be_empty));
        let number = match chosen {
            Some(number) => number,
            None => return Err(self.fail(&rule.first, &rule.name))
        };
        tracing::trace!(rule = %rule.name, alternative = number, cursor = self.cursor, "enter");

        let alternative = &rule.alternatives[number];
        let mut children = Vec::with_capacity(alternative.clauses.len());
        for clause in &alternative.clauses {
            children.push(self.clause(clause, &rule.name)?);
        }
        let value = (alternative.action)(&children, &mut *self.context);

        Ok(SyntaxNode::NonTerminal(Arc::new(NonTerminalNode {
            rule: rule.name.clone(),
            alternative: number,
            children,
            value
        })))
    }

    fn clause(&mut self, clause: &'g Clause<K>, rule: &str) -> Outcome<K, V> {
        let grammar = self.grammar;
        match clause {
            Clause::Terminal(kind) => match self.tokens.get(self.cursor) {
                Some(token) if token.kind == *kind => {
                    self.cursor += 1;
                    Ok(SyntaxNode::Terminal(token.clone()))
                }
                _ => Err(self.fail(&FirstSet::single(*kind), rule))
            },
            Clause::NonTerminal(name) => match grammar.rule_index(name) {
                Some(index) => self.rule(index),
                None => Err(SyntaxError::UnknownRule(name.clone()))
            },
            Clause::Sequence(clauses) => {
                let mut children = Vec::with_capacity(clauses.len());
                for clause in clauses {
                    children.push(self.clause(clause, rule)?);
                }
                Ok(SyntaxNode::Group {
                    label: None,
                    children: Arc::from(children)
                })
            }
            Clause::Choice(alternatives) => {
                let lookahead = self.lookahead();
                let chosen = alternatives.iter()
                    .find(|a| grammar.starts(a, lookahead))
                    .or_else(|| alternatives.iter().find(|a| grammar.nullable(a)));
                match chosen {
                    Some(alternative) => self.clause(alternative, rule),
                    None => Err(self.fail(&grammar.first_of(clause), rule))
                }
            }
            Clause::ZeroOrMore(inner) => {
                let items = self.repeat(inner, rule)?;
                Ok(SyntaxNode::Many(Arc::from(items)))
            }
            Clause::OneOrMore(inner) => {
                let mut items = self.repeat(inner, rule)?;
                if items.is_empty() {
                    if !grammar.nullable(inner) {
                        return Err(self.fail(&grammar.first_of(inner), rule));
                    }
                    items.push(self.clause(inner, rule)?);
                }
                Ok(SyntaxNode::Many(Arc::from(items)))
            }
            Clause::Option(inner) => {
                if grammar.starts(inner, self.lookahead()) {
                    self.clause(inner, rule)
                } else {
                    Ok(SyntaxNode::Absent)
                }
            }
            Clause::Group(inner, label) => {
                let children = match (inner.as_ref(), self.clause(inner, rule)?) {
                    (Clause::Sequence(_), SyntaxNode::Group { children, .. }) => children,
                    (_, node) => Arc::from(vec![node])
                };
                Ok(SyntaxNode::Group {
                    label: label.clone(),
                    children
                })
            }
        }
    }

    /// Matches `inner` while the lookahead can start it. Stops early on an iteration that
    /// consumed nothing.
    fn repeat(&mut self, inner: &'g Clause<K>, rule: &str) -> Result<Vec<SyntaxNode<K, V>>, SyntaxError<K>> {
        let mut items = vec![];
        while self.grammar.starts(inner, self.lookahead()) {
            let before = self.cursor;
            items.push(self.clause(inner, rule)?);
            if self.cursor == before {
                break;
            }
        }
        Ok(items)
    }
}
