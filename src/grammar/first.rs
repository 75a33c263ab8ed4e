//! Nullability, left recursion and FIRST sets over the clause model.

use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Formatter};
use shrinkwraprs::Shrinkwrap;
use crate::grammar::clause::Clause;
use crate::token::TokenKind;

/// The token kinds that can begin a match.
#[derive(Shrinkwrap, Debug, Clone, Eq, PartialEq)]
#[shrinkwrap(mutable)]
pub struct FirstSet<K: Ord>(pub BTreeSet<K>);

impl<K: Ord> Default for FirstSet<K> {
    fn default() -> Self {
        FirstSet(BTreeSet::new())
    }
}

impl<K: TokenKind> FirstSet<K> {
    pub fn new() -> FirstSet<K> {
        FirstSet(BTreeSet::new())
    }

    pub fn single(kind: K) -> FirstSet<K> {
        FirstSet(std::iter::once(kind).collect())
    }

    pub fn union(&mut self, other: &FirstSet<K>) {
        self.0.extend(other.0.iter().copied());
    }

    pub fn overlap(&self, other: &FirstSet<K>) -> Vec<K> {
        self.0.intersection(&other.0).copied().collect()
    }

    pub fn to_vec(&self) -> Vec<K> {
        self.0.iter().copied().collect()
    }
}

impl<K: TokenKind> Display for FirstSet<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, kind) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", kind)?;
        }
        f.write_str("}")
    }
}

/// Rule names and their alternatives, in declaration order.
pub(crate) struct RuleTable<'g, K> {
    pub names: Vec<&'g str>,
    pub alternatives: Vec<Vec<&'g [Clause<K>]>>,
    pub index: HashMap<&'g str, usize>
}

impl<'g, K: TokenKind> RuleTable<'g, K> {
    pub fn new(productions: impl Iterator<Item = (&'g str, &'g [Clause<K>])>) -> RuleTable<'g, K> {
        let mut table = RuleTable {
            names: vec![],
            alternatives: vec![],
            index: HashMap::new()
        };
        for (name, clauses) in productions {
            let i = match table.index.get(name) {
                Some(&i) => i,
                None => {
                    table.names.push(name);
                    table.alternatives.push(vec![]);
                    table.index.insert(name, table.names.len() - 1);
                    table.names.len() - 1
                }
            };
            table.alternatives[i].push(clauses);
        }
        table
    }
}

enum Memo<K: Ord> {
    Pending,
    InProgress,
    Done(FirstSet<K>)
}

pub(crate) struct Analysis<'t, 'g, K: Ord> {
    table: &'t RuleTable<'g, K>,
    nullable: Vec<bool>,
    memo: Vec<Memo<K>>
}

impl<'t, 'g, K: TokenKind> Analysis<'t, 'g, K> {
    pub fn new(table: &'t RuleTable<'g, K>) -> Analysis<'t, 'g, K> {
        let mut analysis = Analysis {
            table,
            nullable: vec![false; table.names.len()],
            memo: table.names.iter().map(|_| Memo::Pending).collect()
        };
        analysis.compute_nullable();
        analysis
    }

    fn compute_nullable(&mut self) {
        let table = self.table;
        let mut changed = true;
        while changed {
            changed = false;
            for (rule, alternatives) in table.alternatives.iter().enumerate() {
                if !self.nullable[rule] && alternatives.iter().any(|seq| self.sequence_nullable(seq)) {
                    self.nullable[rule] = true;
                    changed = true;
                }
            }
        }
    }

    pub fn rule_nullable(&self, rule: usize) -> bool {
        self.nullable[rule]
    }

    pub fn nullable(&self, clause: &Clause<K>) -> bool {
        match clause {
            Clause::Terminal(_) => false,
            Clause::NonTerminal(name) => match self.table.index.get(name.as_str()) {
                Some(&rule) => self.nullable[rule],
                None => false
            },
            Clause::Sequence(clauses) => self.sequence_nullable(clauses),
            Clause::Choice(alternatives) => alternatives.iter().any(|c| self.nullable(c)),
            Clause::ZeroOrMore(_) | Clause::Option(_) => true,
            Clause::OneOrMore(inner) | Clause::Group(inner, _) => self.nullable(inner)
        }
    }

    pub fn sequence_nullable(&self, clauses: &[Clause<K>]) -> bool {
        clauses.iter().all(|c| self.nullable(c))
    }

    /// FIRST set of a rule. A rule reached again while its own set is being computed
    /// contributes nothing to that visit.
    pub fn rule_first(&mut self, rule: usize) -> FirstSet<K> {
        match &self.memo[rule] {
            Memo::Done(set) => return set.clone(),
            Memo::InProgress => return FirstSet::new(),
            Memo::Pending => {}
        }
        self.memo[rule] = Memo::InProgress;

        let table = self.table;
        let mut set = FirstSet::new();
        for alternative in &table.alternatives[rule] {
            let first = self.sequence_first(alternative);
            set.union(&first);
        }
        self.memo[rule] = Memo::Done(set.clone());
        set
    }

    pub fn first(&mut self, clause: &Clause<K>) -> FirstSet<K> {
        match clause {
            Clause::Terminal(kind) => FirstSet::single(*kind),
            Clause::NonTerminal(name) => match self.table.index.get(name.as_str()) {
                Some(&rule) => self.rule_first(rule),
                None => FirstSet::new()
            },
            Clause::Sequence(clauses) => self.sequence_first(clauses),
            Clause::Choice(alternatives) => {
                let mut set = FirstSet::new();
                for alternative in alternatives {
                    let first = self.first(alternative);
                    set.union(&first);
                }
                set
            }
            Clause::ZeroOrMore(inner)
            | Clause::OneOrMore(inner)
            | Clause::Option(inner)
            | Clause::Group(inner, _) => self.first(inner)
        }
    }

    pub fn sequence_first(&mut self, clauses: &[Clause<K>]) -> FirstSet<K> {
        let mut set = FirstSet::new();
        for clause in clauses {
            let first = self.first(clause);
            set.union(&first);
            if !self.nullable(clause) {
                break;
            }
        }
        set
    }

    /// Rules that can appear first in a match of `clauses`, looking past empty-capable clauses.
    fn leading_rules(&self, clauses: &[Clause<K>], out: &mut Vec<usize>) {
        for clause in clauses {
            self.leading_rules_of(clause, out);
            if !self.nullable(clause) {
                break;
            }
        }
    }

    fn leading_rules_of(&self, clause: &Clause<K>, out: &mut Vec<usize>) {
        match clause {
            Clause::Terminal(_) => {}
            Clause::NonTerminal(name) => {
                if let Some(&rule) = self.table.index.get(name.as_str()) {
                    if !out.contains(&rule) {
                        out.push(rule);
                    }
                }
            }
            Clause::Sequence(clauses) => self.leading_rules(clauses, out),
            Clause::Choice(alternatives) => {
                for alternative in alternatives {
                    self.leading_rules_of(alternative, out);
                }
            }
            Clause::ZeroOrMore(inner)
            | Clause::OneOrMore(inner)
            | Clause::Option(inner)
            | Clause::Group(inner, _) => self.leading_rules_of(inner, out)
        }
    }

    /// For every left recursive rule, the shortest chain of rules leading back to it.
    pub fn left_recursion(&self) -> Vec<(usize, Vec<usize>)> {
        let edges: Vec<Vec<usize>> = self.table.alternatives.iter()
            .map(|alternatives| {
                let mut out = vec![];
                for seq in alternatives {
                    self.leading_rules(seq, &mut out);
                }
                out
            })
            .collect();

        let mut found = vec![];
        for rule in 0..edges.len() {
            // breadth first, so the reported cycle is the shortest one
            let mut parent: Vec<Option<usize>> = vec![None; edges.len()];
            let mut queue = std::collections::VecDeque::from(vec![rule]);
            let mut seen = vec![false; edges.len()];
            let mut cycle = None;
            'search: while let Some(current) = queue.pop_front() {
                for &next in &edges[current] {
                    if next == rule {
                        let mut path = vec![current];
                        let mut at = current;
                        while let Some(p) = parent[at] {
                            path.push(p);
                            at = p;
                        }
                        path.reverse();
                        cycle = Some(path);
                        break 'search;
                    }
                    if !seen[next] {
                        seen[next] = true;
                        parent[next] = Some(current);
                        queue.push_back(next);
                    }
                }
            }
            if let Some(path) = cycle {
                found.push((rule, path));
            }
        }
        found
    }
}
