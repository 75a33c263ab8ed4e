#![allow(dead_code)]

use std::collections::HashMap;
use std::str::FromStr;
use descent::prelude::*;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum JsonTok {
    String,
    Int,
    Double,
    Open,
    Close,
    OpenBracket,
    CloseBracket,
    Colon,
    Comma,
    True,
    False,
    Null,
    Word
}

impl FromStr for JsonTok {
    type Err = ();

    fn from_str(s: &str) -> Result<JsonTok, ()> {
        use JsonTok::*;
        Ok(match s {
            "String" => String,
            "Int" => Int,
            "Double" => Double,
            "Open" => Open,
            "Close" => Close,
            "OpenBracket" => OpenBracket,
            "CloseBracket" => CloseBracket,
            "Colon" => Colon,
            "Comma" => Comma,
            "True" => True,
            "False" => False,
            "Null" => Null,
            _ => return Err(())
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Json {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),
    List(Vec<Json>),
    Object(Vec<(String, Json)>)
}

pub fn json_lexer() -> FsmLexer<JsonTok> {
    let mut builder = FsmLexerBuilder::new();
    builder.ignore_ws().white_space(' ').white_space('\t').ignore_eol();
    builder.mark("start");

    builder.transition('"')
        .mark("in_string")
        .except_transition_to(&['"', '\\'], "in_string")
        .transition('\\')
        .any_transition_to("in_string")
        .goto("in_string")
        .transition('"')
        .end(JsonTok::String);

    builder.goto("start").transition('{').end(JsonTok::Open);
    builder.goto("start").transition('}').end(JsonTok::Close);
    builder.goto("start").transition('[').end(JsonTok::OpenBracket);
    builder.goto("start").transition(']').end(JsonTok::CloseBracket);
    builder.goto("start").transition(':').end(JsonTok::Colon);
    builder.goto("start").transition(',').end(JsonTok::Comma);

    builder.goto("start")
        .range_transition('0', '9')
        .mark("in_int")
        .range_transition_to('0', '9', "in_int")
        .end(JsonTok::Int)
        .transition('.')
        .range_transition('0', '9')
        .mark("in_double")
        .range_transition_to('0', '9', "in_double")
        .end(JsonTok::Double);
    builder.goto("start").transition('-').range_transition_to('0', '9', "in_int");

    builder.goto("start")
        .range_transition('a', 'z')
        .mark("word")
        .range_transition_to('a', 'z', "word")
        .end(JsonTok::Word)
        .callback(|token| {
            let kind = match token.text.as_str() {
                "true" => JsonTok::True,
                "false" => JsonTok::False,
                "null" => JsonTok::Null,
                _ => token.kind
            };
            Token { kind, ..token }
        });

    let result = builder.build();
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    result.value.unwrap()
}

fn unquote(node: &SyntaxNode<JsonTok, Json>) -> String {
    let text = node.text().unwrap_or("\"\"");
    text[1..text.len() - 1].replace("\\\"", "\"")
}

fn entries(node: &SyntaxNode<JsonTok, Json>) -> Vec<(String, Json)> {
    match node.value() {
        Some(Json::Object(entries)) => entries.clone(),
        _ => vec![]
    }
}

fn elements(node: &SyntaxNode<JsonTok, Json>) -> Vec<Json> {
    match node.value() {
        Some(Json::List(elements)) => elements.clone(),
        _ => vec![]
    }
}

pub fn json_grammar() -> GrammarBuilder<JsonTok, Json> {
    let mut grammar: GrammarBuilder<JsonTok, Json> = GrammarBuilder::new();
    grammar.add_rule("root : value", |c| c[0].value().cloned().unwrap_or(Json::Null))
        .add_rule("value : String", |c| Json::Str(unquote(&c[0])))
        .add_rule("value : Int", |c| Json::Int(c[0].text().and_then(|t| t.parse().ok()).unwrap_or(0)))
        .add_rule("value : Double", |c| Json::Double(c[0].text().and_then(|t| t.parse().ok()).unwrap_or(0.0)))
        .add_rule("value : True", |_| Json::Bool(true))
        .add_rule("value : False", |_| Json::Bool(false))
        .add_rule("value : Null", |_| Json::Null)
        .add_rule("value : object", |c| c[0].value().cloned().unwrap_or(Json::Null))
        .add_rule("value : list", |c| c[0].value().cloned().unwrap_or(Json::Null))
        .add_rule("object : Open members? Close", |c| Json::Object(entries(&c[1])))
        .add_rule("members : member (Comma member)*", |c| {
            let mut all = entries(&c[0]);
            for group in c[1].items() {
                all.extend(entries(&group.items()[1]));
            }
            Json::Object(all)
        })
        .add_rule("member : String Colon value", |c| {
            Json::Object(vec![(unquote(&c[0]), c[2].value().cloned().unwrap_or(Json::Null))])
        })
        .add_rule("list : OpenBracket elements? CloseBracket", |c| Json::List(elements(&c[1])))
        .add_rule("elements : value (Comma value)*", |c| {
            let mut all: Vec<Json> = c[0].value().cloned().into_iter().collect();
            for group in c[1].items() {
                all.extend(group.items()[1].value().cloned());
            }
            Json::List(all)
        });
    grammar
}

pub fn json_parser() -> Parser<JsonTok, Json> {
    let result = json_grammar().build_parser(json_lexer(), "root");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    result.value.unwrap()
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ExprTok {
    Int,
    Ident,
    Plus,
    Minus,
    Times,
    Divide,
    LParen,
    RParen,
    Space
}

impl FromStr for ExprTok {
    type Err = ();

    fn from_str(s: &str) -> Result<ExprTok, ()> {
        use ExprTok::*;
        Ok(match s {
            "Int" => Int,
            "Ident" => Ident,
            "Plus" => Plus,
            "Minus" => Minus,
            "Times" => Times,
            "Divide" => Divide,
            "LParen" => LParen,
            "RParen" => RParen,
            _ => return Err(())
        })
    }
}

pub type Variables = HashMap<String, i64>;

fn fold(c: &[SyntaxNode<ExprTok, i64>]) -> i64 {
    let mut total = c[0].value().copied().unwrap_or(0);
    for group in c[1].items() {
        let operand = group.items()[1].value().copied().unwrap_or(0);
        total = match group.items()[0].token().map(|t| t.kind) {
            Some(ExprTok::Plus) => total + operand,
            Some(ExprTok::Minus) => total - operand,
            Some(ExprTok::Times) => total * operand,
            Some(ExprTok::Divide) if operand != 0 => total / operand,
            _ => total
        };
    }
    total
}

pub fn expression_lexer() -> RegexLexer<ExprTok> {
    let mut lexer = RegexLexerBuilder::new();
    lexer.lexeme(ExprTok::Int, "[0-9]+")
        .lexeme(ExprTok::Ident, "[a-z]+")
        .lexeme(ExprTok::Plus, "\\+")
        .lexeme(ExprTok::Minus, "-")
        .lexeme(ExprTok::Times, "\\*")
        .lexeme(ExprTok::Divide, "/")
        .lexeme(ExprTok::LParen, "\\(")
        .lexeme(ExprTok::RParen, "\\)")
        .line_ending(ExprTok::Space, "\\s+", true);
    lexer.build().value.unwrap()
}

pub fn expression_grammar() -> GrammarBuilder<ExprTok, i64, Variables> {
    let mut grammar: GrammarBuilder<ExprTok, i64, Variables> = GrammarBuilder::new();
    grammar.add_rule("expression : term ([Plus | Minus] term)*", |c| fold(c))
        .add_rule("term : factor ([Times | Divide] factor)*", |c| fold(c))
        .add_rule("factor : Int", |c| c[0].text().and_then(|t| t.parse().ok()).unwrap_or(0))
        .add_rule_with_context("factor : Ident", |c, variables: &mut Variables| {
            c[0].text().and_then(|name| variables.get(name)).copied().unwrap_or(0)
        })
        .add_rule("factor : LParen expression RParen", |c| c[1].value().copied().unwrap_or(0))
        .add_rule("factor : Minus factor", |c| -c[1].value().copied().unwrap_or(0));
    grammar
}

pub fn expression_parser() -> Parser<ExprTok, i64, Variables> {
    let result = expression_grammar().build_parser(expression_lexer(), "expression");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    result.value.unwrap()
}
