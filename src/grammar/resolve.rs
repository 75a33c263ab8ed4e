use std::collections::{HashMap, HashSet};
use crate::build::{BuildResult, Diagnostic, DiagnosticCode};
use crate::grammar::clause::Clause;
use crate::grammar::first::{Analysis, FirstSet, RuleTable};
use crate::grammar::{Alternative, Grammar, GrammarOptions, OverlapPolicy, Production, Rule};
use crate::token::TokenKind;

pub(crate) fn resolve<K: TokenKind, V, C>(
    productions: Vec<Production<K, V, C>>,
    pending: Vec<Diagnostic>,
    options: GrammarOptions
) -> BuildResult<Grammar<K, V, C>> {
    let mut diagnostics = pending;
    if productions.is_empty() {
        diagnostics.push(Diagnostic::fatal(DiagnosticCode::EmptyGrammar, "the grammar has no productions"));
        return BuildResult::failed(diagnostics);
    }

    let (alternative_sets, rule_sets, names) = {
        let table = RuleTable::new(productions.iter().map(|p| (p.rule.as_str(), p.clauses.as_slice())));
        check_references(&productions, &table, &mut diagnostics);
        check_duplicates(&table, &mut diagnostics);

        let mut analysis = Analysis::new(&table);
        for (rule, path) in analysis.left_recursion() {
            let mut chain: Vec<&str> = path.iter().map(|&i| table.names[i]).collect();
            chain.push(table.names[rule]);
            diagnostics.push(
                Diagnostic::fatal(
                    DiagnosticCode::LeftRecursion,
                    format!("rule `{}` is left recursive: {}", table.names[rule], chain.join(" -> "))
                ).in_rule(table.names[rule])
            );
        }

        let alternative_sets: Vec<(FirstSet<K>, bool)> = productions.iter()
            .map(|p| (analysis.sequence_first(&p.clauses), analysis.sequence_nullable(&p.clauses)))
            .collect();
        let rule_sets: Vec<(FirstSet<K>, bool)> = (0..table.names.len())
            .map(|rule| (analysis.rule_first(rule), analysis.rule_nullable(rule)))
            .collect();

        check_overlaps(&productions, &table, &alternative_sets, &mut analysis, options.overlap, &mut diagnostics);

        let names: Vec<String> = table.names.iter().map(|n| n.to_string()).collect();
        (alternative_sets, rule_sets, names)
    };

    let mut rules: Vec<Rule<K, V, C>> = names.into_iter()
        .zip(rule_sets)
        .map(|(name, (first, may_be_empty))| Rule {
            name,
            alternatives: vec![],
            first,
            may_be_empty
        })
        .collect();
    let index: HashMap<String, usize> = rules.iter().enumerate().map(|(i, r)| (r.name.clone(), i)).collect();

    for (production, (first, may_be_empty)) in productions.into_iter().zip(alternative_sets) {
        let rule = index[&production.rule];
        rules[rule].alternatives.push(Alternative {
            clauses: production.clauses,
            first,
            may_be_empty,
            action: production.action
        });
    }

    tracing::debug!(
        rules = rules.len(),
        alternatives = rules.iter().map(|r| r.alternatives.len()).sum::<usize>(),
        diagnostics = diagnostics.len(),
        "resolved grammar"
    );
    BuildResult::new(Grammar { rules, index }, diagnostics)
}

fn check_references<K: TokenKind, V, C>(
    productions: &[Production<K, V, C>],
    table: &RuleTable<K>,
    diagnostics: &mut Vec<Diagnostic>
) {
    let mut reported = HashSet::new();
    for production in productions {
        for clause in &production.clauses {
            clause.visit_non_terminals(&mut |name| {
                if !table.index.contains_key(name) && reported.insert((production.rule.as_str(), name)) {
                    diagnostics.push(
                        Diagnostic::fatal(
                            DiagnosticCode::UndefinedRule,
                            format!("rule `{}` refers to undefined rule `{}`", production.rule, name)
                        ).in_rule(production.rule.as_str())
                    );
                }
            });
        }
    }
}

fn check_duplicates<K: TokenKind>(table: &RuleTable<K>, diagnostics: &mut Vec<Diagnostic>) {
    for (rule, alternatives) in table.alternatives.iter().enumerate() {
        for (j, later) in alternatives.iter().enumerate() {
            if let Some(i) = alternatives[..j].iter().position(|earlier| earlier == later) {
                diagnostics.push(
                    Diagnostic::fatal(
                        DiagnosticCode::DuplicateAlternative,
                        format!(
                            "alternatives #{} and #{} of rule `{}` are both `{}`",
                            i, j, table.names[rule], super::clause::display_sequence(later)
                        )
                    ).in_rule(table.names[rule])
                );
            }
        }
    }
}

fn check_overlaps<K: TokenKind, V, C>(
    productions: &[Production<K, V, C>],
    table: &RuleTable<K>,
    alternative_sets: &[(FirstSet<K>, bool)],
    analysis: &mut Analysis<K>,
    policy: OverlapPolicy,
    diagnostics: &mut Vec<Diagnostic>
) {
    if policy == OverlapPolicy::Allow {
        return;
    }

    let mut report = |rule: &str, message: String| {
        let diagnostic = match policy {
            OverlapPolicy::Reject => Diagnostic::fatal(DiagnosticCode::AmbiguousAlternatives, message),
            _ => {
                tracing::warn!(rule = %rule, "{}", message);
                Diagnostic::warning(DiagnosticCode::AmbiguousAlternatives, message)
            }
        };
        diagnostics.push(diagnostic.in_rule(rule));
    };

    // alternatives of each rule, numbered in declaration order
    let mut by_rule: Vec<Vec<&FirstSet<K>>> = vec![vec![]; table.names.len()];
    for (production, (first, _)) in productions.iter().zip(alternative_sets) {
        by_rule[table.index[production.rule.as_str()]].push(first);
    }
    for (rule, sets) in by_rule.iter().enumerate() {
        for j in 0..sets.len() {
            for i in 0..j {
                let shared = sets[i].overlap(sets[j]);
                if !shared.is_empty() {
                    report(table.names[rule], format!(
                        "alternatives #{} and #{} of rule `{}` can both start with {}",
                        i, j, table.names[rule], FirstSet(shared.into_iter().collect())
                    ));
                }
            }
        }
    }

    for production in productions {
        let mut choices = vec![];
        for clause in &production.clauses {
            clause.visit_choices(&mut |alternatives| choices.push(alternatives));
        }
        for alternatives in choices {
            let sets: Vec<FirstSet<K>> = alternatives.iter().map(|c| analysis.first(c)).collect();
            for j in 0..sets.len() {
                for i in 0..j {
                    let shared = sets[i].overlap(&sets[j]);
                    if !shared.is_empty() {
                        report(&production.rule, format!(
                            "choice {} in rule `{}` has alternatives #{} and #{} that can both start with {}",
                            Clause::Choice(alternatives.to_vec()), production.rule, i, j,
                            FirstSet(shared.into_iter().collect())
                        ));
                    }
                }
            }
        }
    }
}
