mod common;

use common::{expression_grammar, expression_lexer, expression_parser, ExprTok, Variables};
use descent::prelude::*;

#[test]
fn context_supplies_variables() {
    let parser = expression_parser();
    let mut variables = Variables::new();
    variables.insert("a".to_string(), 2);
    let result = parser.parse_with_context("2 + a", &mut variables);
    assert!(!result.is_error(), "{:?}", result.errors);
    assert_eq!(result.value(), Some(&4));
}

#[test]
fn precedence_and_parentheses() {
    let parser = expression_parser();
    let mut variables = Variables::new();
    variables.insert("b".to_string(), 4);
    for (input, expected) in [("1 + 2 * 3", 7), ("2 * (3 + b) - -1", 15), ("20 / 2 / 5", 2), ("- 3", -3)] {
        let result = parser.parse_with_context(input, &mut variables);
        assert!(result.is_ended, "{}", input);
        assert_eq!(result.value(), Some(&expected), "{}", input);
    }
}

#[test]
fn default_context() {
    let result = expression_parser().parse("x * 3\n+ 1");
    assert_eq!(result.value(), Some(&1));
}

#[test]
fn missing_operand() {
    let result = expression_parser().parse("1 +\n  * 2");
    match &result.errors[0] {
        SyntaxError::UnexpectedToken { found, expected, rule } => {
            assert_eq!(found.kind, ExprTok::Times);
            assert_eq!((found.position.line, found.position.column), (2, 3));
            assert_eq!(expected, &vec![ExprTok::Int, ExprTok::Ident, ExprTok::Minus, ExprTok::LParen]);
            assert_eq!(rule, "term");
        }
        other => panic!("unexpected error {:?}", other)
    }

    let result = expression_parser().parse("(1 + 2");
    assert!(matches!(&result.errors[0], SyntaxError::UnexpectedEnd { expected, .. } if expected == &vec![ExprTok::RParen]));
    assert!(result.into_result().is_err());
}

#[test]
fn left_recursion_and_undefined_rules() {
    let mut grammar: GrammarBuilder<ExprTok, i64> = GrammarBuilder::new();
    grammar.add_rule("sum : sum Plus Int", |_| 0)
        .add_rule("sum : Int", |_| 0)
        .add_rule("product : factor Times Int", |_| 0);
    let result = grammar.resolve();
    assert!(result.is_error());
    let codes: Vec<_> = result.errors().map(|d| (d.code, d.rule.clone())).collect();
    assert_eq!(codes, vec![
        (DiagnosticCode::UndefinedRule, Some("product".to_string())),
        (DiagnosticCode::LeftRecursion, Some("sum".to_string()))
    ]);
    assert!(matches!(result.into_result(), Err(Error::Build(_))));
}

#[test]
fn strict_overlap_rejects_the_grammar() {
    let mut grammar: GrammarBuilder<ExprTok, i64> = GrammarBuilder::with_options(GrammarOptions {
        overlap: OverlapPolicy::Reject
    });
    grammar.add_rule("value : Int Plus Int", |_| 0)
        .add_rule("value : Int Minus Int", |_| 0);
    let result = grammar.build_parser(expression_lexer(), "value");
    assert!(result.is_error());
    assert_eq!(result.errors().next().map(|d| d.code), Some(DiagnosticCode::AmbiguousAlternatives));
}

#[test]
fn grammar_dump() {
    let grammar = expression_grammar().resolve().value.unwrap();
    let dump = grammar.dump();
    assert!(dump.contains("factor {Int, Ident, Minus, LParen}\n"));
    assert!(dump.contains("  : term ( [ Plus | Minus ] term )* {Int, Ident, Minus, LParen}\n"));
}
