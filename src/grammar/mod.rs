//! Grammars: productions built from [clauses](Clause), resolved into an immutable [Grammar].
//!
//! ```
//! use descent::prelude::*;
//!
//! #[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
//! enum Tok { Num, Plus }
//!
//! let mut builder: GrammarBuilder<Tok, i64> = GrammarBuilder::new();
//! builder.add_production("sum", vec![
//!     Clause::Terminal(Tok::Num),
//!     Clause::zero_or_more(Clause::Sequence(vec![Clause::Terminal(Tok::Plus), Clause::Terminal(Tok::Num)]))
//! ], |_| 0);
//! let grammar = builder.resolve().value.unwrap();
//! assert_eq!(grammar.first_set("sum").unwrap().to_vec(), vec![Tok::Num]);
//! ```

pub mod clause;
pub mod first;
mod resolve;
mod rule_text;

pub use clause::Clause;
pub use first::FirstSet;

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use crate::build::{BuildResult, Diagnostic, DiagnosticCode};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::tree::SyntaxNode;
use crate::token::TokenKind;

/// Computes the value of a matched alternative from its children.
pub type Action<K, V, C> = Arc<dyn Fn(&[SyntaxNode<K, V>], &mut C) -> V + Send + Sync>;

/// How to treat alternatives whose FIRST sets overlap.
///
/// The parser always takes the first matching alternative in declaration order, so an overlap
/// makes the later alternative unreachable for those tokens.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlapPolicy {
    Allow,
    #[default]
    Warn,
    /// Overlaps are fatal.
    Reject
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrammarOptions {
    pub overlap: OverlapPolicy
}

pub(crate) struct Production<K, V, C> {
    pub rule: String,
    pub clauses: Vec<Clause<K>>,
    pub action: Action<K, V, C>
}

pub struct Alternative<K: Ord, V, C> {
    pub clauses: Vec<Clause<K>>,
    pub first: FirstSet<K>,
    pub may_be_empty: bool,
    pub(crate) action: Action<K, V, C>
}

pub struct Rule<K: Ord, V, C> {
    pub name: String,
    pub alternatives: Vec<Alternative<K, V, C>>,
    pub first: FirstSet<K>,
    pub may_be_empty: bool
}

/// A resolved grammar. Immutable, and shareable between threads.
pub struct Grammar<K: Ord, V, C = ()> {
    pub(crate) rules: Vec<Rule<K, V, C>>,
    pub(crate) index: HashMap<String, usize>
}

impl<K: TokenKind, V, C> Grammar<K, V, C> {
    pub fn rule(&self, name: &str) -> Option<&Rule<K, V, C>> {
        self.index.get(name).map(|&i| &self.rules[i])
    }

    pub(crate) fn rule_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Rule names in declaration order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }

    pub fn first_set(&self, rule: &str) -> Option<&FirstSet<K>> {
        self.rule(rule).map(|r| &r.first)
    }

    pub fn may_be_empty(&self, rule: &str) -> Option<bool> {
        self.rule(rule).map(|r| r.may_be_empty)
    }

    /// Whether `clause` can match without consuming a token.
    pub fn nullable(&self, clause: &Clause<K>) -> bool {
        match clause {
            Clause::Terminal(_) => false,
            Clause::NonTerminal(name) => self.may_be_empty(name).unwrap_or(false),
            Clause::Sequence(clauses) => clauses.iter().all(|c| self.nullable(c)),
            Clause::Choice(alternatives) => alternatives.iter().any(|c| self.nullable(c)),
            Clause::ZeroOrMore(_) | Clause::Option(_) => true,
            Clause::OneOrMore(inner) | Clause::Group(inner, _) => self.nullable(inner)
        }
    }

    /// Whether `lookahead` is in the FIRST set of `clause`. `None` means end of input.
    pub fn starts(&self, clause: &Clause<K>, lookahead: Option<K>) -> bool {
        let kind = match lookahead {
            Some(kind) => kind,
            None => return false
        };
        match clause {
            Clause::Terminal(expected) => *expected == kind,
            Clause::NonTerminal(name) => self.first_set(name).map_or(false, |f| f.contains(&kind)),
            Clause::Sequence(clauses) => {
                for clause in clauses {
                    if self.starts(clause, lookahead) {
                        return true;
                    }
                    if !self.nullable(clause) {
                        return false;
                    }
                }
                false
            }
            Clause::Choice(alternatives) => alternatives.iter().any(|c| self.starts(c, lookahead)),
            Clause::ZeroOrMore(inner)
            | Clause::OneOrMore(inner)
            | Clause::Option(inner)
            | Clause::Group(inner, _) => self.starts(inner, lookahead)
        }
    }

    /// The FIRST set of any clause.
    pub fn first_of(&self, clause: &Clause<K>) -> FirstSet<K> {
        match clause {
            Clause::Terminal(kind) => FirstSet::single(*kind),
            Clause::NonTerminal(name) => self.first_set(name).cloned().unwrap_or_default(),
            Clause::Sequence(clauses) => {
                let mut set = FirstSet::new();
                for clause in clauses {
                    set.union(&self.first_of(clause));
                    if !self.nullable(clause) {
                        break;
                    }
                }
                set
            }
            Clause::Choice(alternatives) => {
                let mut set = FirstSet::new();
                for alternative in alternatives {
                    set.union(&self.first_of(alternative));
                }
                set
            }
            Clause::ZeroOrMore(inner)
            | Clause::OneOrMore(inner)
            | Clause::Option(inner)
            | Clause::Group(inner, _) => self.first_of(inner)
        }
    }

    /// Every rule with its alternatives and their FIRST sets. Empty-capable ones are marked `ε`.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            out.push_str(&format!("{} {}{}\n", rule.name, rule.first, if rule.may_be_empty { " ε" } else { "" }));
            for (i, alternative) in rule.alternatives.iter().enumerate() {
                out.push_str(&format!(
                    "  {} {} {}{}\n",
                    if i == 0 { ':' } else { '|' },
                    clause::display_sequence(&alternative.clauses),
                    alternative.first,
                    if alternative.may_be_empty { " ε" } else { "" }
                ));
            }
        }
        out
    }
}

/// Collects productions and resolves them into a [Grammar].
///
/// `C` is the context threaded through actions; it defaults to `()`.
pub struct GrammarBuilder<K: Ord, V, C = ()> {
    productions: Vec<Production<K, V, C>>,
    pending: Vec<Diagnostic>,
    options: GrammarOptions
}

impl<K: TokenKind, V: 'static, C: 'static> Default for GrammarBuilder<K, V, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TokenKind, V: 'static, C: 'static> GrammarBuilder<K, V, C> {
    pub fn new() -> GrammarBuilder<K, V, C> {
        GrammarBuilder {
            productions: vec![],
            pending: vec![],
            options: GrammarOptions::default()
        }
    }

    pub fn with_options(options: GrammarOptions) -> GrammarBuilder<K, V, C> {
        GrammarBuilder {
            options,
            ..Self::new()
        }
    }

    /// Adds one alternative to `rule`. Alternatives are tried in the order they are added.
    pub fn add_production(
        &mut self,
        rule: &str,
        clauses: Vec<Clause<K>>,
        action: impl Fn(&[SyntaxNode<K, V>]) -> V + Send + Sync + 'static
    ) -> &mut Self {
        self.add_production_with_context(rule, clauses, move |children, _| action(children))
    }

    pub fn add_production_with_context(
        &mut self,
        rule: &str,
        clauses: Vec<Clause<K>>,
        action: impl Fn(&[SyntaxNode<K, V>], &mut C) -> V + Send + Sync + 'static
    ) -> &mut Self {
        self.productions.push(Production {
            rule: rule.to_string(),
            clauses,
            action: Arc::new(action)
        });
        self
    }

    /// Resolves the productions, reporting every problem found at once.
    pub fn resolve(self) -> BuildResult<Grammar<K, V, C>> {
        resolve::resolve(self.productions, self.pending, self.options)
    }

    /// Resolves the grammar and pairs it with a lexer and a start rule.
    pub fn build_parser(self, lexer: impl Lexer<K> + 'static, start: &str) -> BuildResult<Parser<K, V, C>> {
        let start = start.to_string();
        self.resolve().and_then(|grammar| {
            if grammar.rule(&start).is_none() {
                return BuildResult::failed(vec![Diagnostic::fatal(
                    DiagnosticCode::UnknownStartRule,
                    format!("start rule `{}` is not defined", start)
                ).in_rule(start)]);
            }
            BuildResult::new(Parser::new(grammar, Box::new(lexer), &start), vec![])
        })
    }
}

impl<K: TokenKind + FromStr, V: 'static, C: 'static> GrammarBuilder<K, V, C> {
    /// Adds a production written as text, e.g. `"list : item (Comma item)*"`.
    ///
    /// Names that parse as `K` are terminals. Malformed text is reported when resolving.
    pub fn add_rule(&mut self, text: &str, action: impl Fn(&[SyntaxNode<K, V>]) -> V + Send + Sync + 'static) -> &mut Self {
        self.add_rule_with_context(text, move |children, _| action(children))
    }

    pub fn add_rule_with_context(
        &mut self,
        text: &str,
        action: impl Fn(&[SyntaxNode<K, V>], &mut C) -> V + Send + Sync + 'static
    ) -> &mut Self {
        match rule_text::parse_production(text) {
            Ok((rule, clauses)) => self.add_production_with_context(&rule, clauses, action),
            Err(message) => {
                self.pending.push(Diagnostic::fatal(
                    DiagnosticCode::InvalidRuleText,
                    format!("cannot read production `{}`: {}", text, message)
                ));
                self
            }
        }
    }
}
