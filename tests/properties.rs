//! Property tests: lexing and parsing are deterministic, FIRST sets predict success, and lexer
//! positions agree with a direct count over the input.

mod common;

use common::{expression_grammar, expression_lexer, expression_parser, json_lexer, ExprTok, Variables};
use descent::prelude::*;
use proptest::prelude::*;

/// Numbers joined by `+` or `-`, with the value a left fold gives them.
fn sum_strategy() -> impl Strategy<Value = (String, i64)> {
    (0i64..1000, prop::collection::vec((prop::bool::ANY, 0i64..1000), 0..12)).prop_map(|(first, rest)| {
        let mut text = first.to_string();
        let mut total = first;
        for (add, n) in rest {
            text.push_str(if add { " + " } else { " - " });
            text.push_str(&n.to_string());
            total = if add { total + n } else { total - n };
        }
        (text, total)
    })
}

fn kind_strategy() -> impl Strategy<Value = ExprTok> {
    prop_oneof![
        Just(ExprTok::Int),
        Just(ExprTok::Ident),
        Just(ExprTok::Plus),
        Just(ExprTok::Minus),
        Just(ExprTok::Times),
        Just(ExprTok::Divide),
        Just(ExprTok::LParen),
        Just(ExprTok::RParen),
    ]
}

proptest! {
    #[test]
    fn lexing_twice_gives_identical_tokens(input in "[a-z0-9 +*/()\\-\n\t{}:,.\"\\[\\]]{0,40}") {
        let json = json_lexer();
        let first = json.tokenize(&input);
        prop_assert_eq!(&first, &json.tokenize(&input));
        prop_assert_eq!(&first, &json_lexer().tokenize(&input));

        let expression = expression_lexer();
        let first = expression.tokenize(&input);
        prop_assert_eq!(&first, &expression.tokenize(&input));
        prop_assert_eq!(&first, &expression_lexer().tokenize(&input));
    }

    #[test]
    fn sums_evaluate_like_a_fold((text, total) in sum_strategy()) {
        let parser = expression_parser();
        let first = parser.parse(&text);
        let second = parser.parse(&text);
        prop_assert!(first.is_ended);
        prop_assert_eq!(first.value(), Some(&total));
        prop_assert_eq!(first.root.as_ref().map(SyntaxNode::dump), second.root.as_ref().map(SyntaxNode::dump));
    }

    #[test]
    fn first_set_predicts_the_first_token(kinds in prop::collection::vec(kind_strategy(), 0..10)) {
        let grammar = expression_grammar().resolve().value.unwrap();
        let first = grammar.first_set("expression").unwrap().clone();
        let tokens: Vec<_> = kinds.iter().map(|&k| Token::new(k, "1", Position::start())).collect();
        let result = grammar.parse_tokens(&tokens, "expression", &mut Variables::new());

        match kinds.first() {
            Some(kind) if first.contains(kind) => {}
            _ => {
                prop_assert!(result.is_error());
                prop_assert_eq!(result.ending_position, 0);
            }
        }
        if !result.is_error() {
            prop_assert!(result.ending_position > 0);
        }
    }

    #[test]
    fn lexer_positions_match_the_input(words in prop::collection::vec(("[a-z]{1,5}", "[ \t\n]{1,3}"), 1..10)) {
        let input: String = words.iter().map(|(w, gap)| format!("{}{}", w, gap)).collect();
        let tokens = json_lexer().tokenize(&input).unwrap();
        prop_assert_eq!(tokens.len(), words.len());
        for token in tokens {
            let before = &input[..token.position.index];
            let line = before.matches('\n').count() + 1;
            let column = before.chars().rev().take_while(|&c| c != '\n').count() + 1;
            prop_assert_eq!(token.position.line, line);
            prop_assert_eq!(token.position.column, column);
            prop_assert_eq!(&input[token.position.index..token.end().index], token.text.as_str());
        }
    }
}
