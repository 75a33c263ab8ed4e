//! # descent
//!
//! Predictive recursive-descent parsers from declarative grammars, with a hand-built
//! finite state machine lexer.
//!
//! ## Getting Started
//!
//! Add the following to your Cargo.toml:
//!
//! ```toml
//! [dependencies]
//! descent = "0.1.0"
//! ```
//!
//! A grammar is a list of productions. Each one names a rule, the [clauses](grammar::Clause) it
//! matches, and an action computing a value from the matched children. Resolving the grammar
//! computes FIRST sets and reports problems like undefined rules or left recursion as
//! [diagnostics](build::Diagnostic). Below is a small calculator that adds numbers:
//!
//! ```
//! use descent::prelude::*;
//! use std::str::FromStr;
//!
//! #[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
//! enum Tok { Num, Plus }
//!
//! impl FromStr for Tok {
//!     type Err = ();
//!     fn from_str(s: &str) -> Result<Tok, ()> {
//!         match s {
//!             "Num" => Ok(Tok::Num),
//!             "Plus" => Ok(Tok::Plus),
//!             _ => Err(())
//!         }
//!     }
//! }
//!
//! let mut lexer = FsmLexerBuilder::new();
//! lexer.ignore_ws().mark("start")
//!     .range_transition('0', '9').mark("num").range_transition_to('0', '9', "num").end(Tok::Num)
//!     .goto("start").transition('+').end(Tok::Plus);
//!
//! let mut grammar: GrammarBuilder<Tok, i64> = GrammarBuilder::new();
//! grammar.add_rule("sum : Num (Plus Num)*", |children| {
//!     let first: i64 = children[0].text().unwrap().parse().unwrap();
//!     let rest: i64 = children[1].items().iter()
//!         .map(|pair| pair.items()[1].text().unwrap().parse::<i64>().unwrap())
//!         .sum();
//!     first + rest
//! });
//!
//! let parser = grammar.build_parser(lexer.build().value.unwrap(), "sum").value.unwrap();
//! assert_eq!(parser.parse("1 + 2 + 39").value(), Some(&42));
//! ```

pub mod build;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod prelude;
pub mod token;
pub mod tree;

pub use error::Error;
