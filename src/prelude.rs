//! All the usual imports that the user will need, e.g. `use descent::prelude::*;`.

pub use crate::build::{BuildResult, Diagnostic, DiagnosticCode, Severity};
pub use crate::error::Error;
pub use crate::grammar::{Clause, FirstSet, Grammar, GrammarBuilder, GrammarOptions, OverlapPolicy};
pub use crate::lexer::{FsmLexer, FsmLexerBuilder, Lexer, LexerError, RegexLexer, RegexLexerBuilder};
pub use crate::parser::{ParseResult, Parser, SyntaxError};
pub use crate::token::{Position, Token, TokenKind};
pub use crate::tree::{NonTerminalNode, SyntaxNode};
