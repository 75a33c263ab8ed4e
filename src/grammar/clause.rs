use std::fmt::{Display, Formatter};
use crate::token::TokenKind;

/// One EBNF construct on the right-hand side of a production.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Clause<K> {
    Terminal(K),
    NonTerminal(String),
    Sequence(Vec<Clause<K>>),
    Choice(Vec<Clause<K>>),
    ZeroOrMore(Box<Clause<K>>),
    OneOrMore(Box<Clause<K>>),
    Option(Box<Clause<K>>),
    /// Matches `inner` and labels the result for the action.
    Group(Box<Clause<K>>, Option<String>)
}

impl<K: TokenKind> Clause<K> {
    pub fn non_terminal(name: &str) -> Clause<K> {
        Clause::NonTerminal(name.to_string())
    }

    pub fn zero_or_more(inner: Clause<K>) -> Clause<K> {
        Clause::ZeroOrMore(Box::new(inner))
    }

    pub fn one_or_more(inner: Clause<K>) -> Clause<K> {
        Clause::OneOrMore(Box::new(inner))
    }

    pub fn option(inner: Clause<K>) -> Clause<K> {
        Clause::Option(Box::new(inner))
    }

    pub fn group(inner: Clause<K>, label: Option<&str>) -> Clause<K> {
        Clause::Group(Box::new(inner), label.map(str::to_string))
    }

    /// Calls `f` on every rule name this clause refers to, nested ones included.
    pub fn visit_non_terminals<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            Clause::Terminal(_) => {}
            Clause::NonTerminal(name) => f(name),
            Clause::Sequence(clauses) | Clause::Choice(clauses) => {
                for clause in clauses {
                    clause.visit_non_terminals(f);
                }
            }
            Clause::ZeroOrMore(inner)
            | Clause::OneOrMore(inner)
            | Clause::Option(inner)
            | Clause::Group(inner, _) => inner.visit_non_terminals(f)
        }
    }

    /// Calls `f` on every `Choice` clause, this one included.
    pub fn visit_choices<'a>(&'a self, f: &mut impl FnMut(&'a [Clause<K>])) {
        match self {
            Clause::Terminal(_) | Clause::NonTerminal(_) => {}
            Clause::Sequence(clauses) => {
                for clause in clauses {
                    clause.visit_choices(f);
                }
            }
            Clause::Choice(alternatives) => {
                f(alternatives);
                for clause in alternatives {
                    clause.visit_choices(f);
                }
            }
            Clause::ZeroOrMore(inner)
            | Clause::OneOrMore(inner)
            | Clause::Option(inner)
            | Clause::Group(inner, _) => inner.visit_choices(f)
        }
    }
}

impl<K: TokenKind> Display for Clause<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Clause::Terminal(kind) => write!(f, "{:?}", kind),
            Clause::NonTerminal(name) => f.write_str(name),
            Clause::Sequence(clauses) => {
                f.write_str("(")?;
                for clause in clauses {
                    write!(f, " {}", clause)?;
                }
                f.write_str(" )")
            }
            Clause::Choice(alternatives) => {
                f.write_str("[")?;
                for (i, clause) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" |")?;
                    }
                    write!(f, " {}", clause)?;
                }
                f.write_str(" ]")
            }
            Clause::ZeroOrMore(inner) => write!(f, "{}*", inner),
            Clause::OneOrMore(inner) => write!(f, "{}+", inner),
            Clause::Option(inner) => write!(f, "{}?", inner),
            Clause::Group(inner, None) => match inner.as_ref() {
                Clause::Sequence(_) => write!(f, "{}", inner),
                _ => write!(f, "( {} )", inner)
            },
            Clause::Group(inner, Some(label)) => match inner.as_ref() {
                Clause::Sequence(_) => write!(f, "{}:{}", label, inner),
                _ => write!(f, "{}:( {} )", label, inner)
            }
        }
    }
}

/// Renders a production's right-hand side, e.g. `A b c`.
pub fn display_sequence<K: TokenKind>(clauses: &[Clause<K>]) -> String {
    if clauses.is_empty() {
        return "ε".to_string();
    }
    clauses.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ")
}
