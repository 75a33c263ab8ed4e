use crate::build::Diagnostic;
use crate::lexer::LexerError;

/// Any failure, for callers who want to use `?`.
///
/// The detailed types ([LexerError], [SyntaxError](crate::parser::SyntaxError) and
/// [Diagnostic]) stay available for callers who need more than a message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Lex(#[from] LexerError),
    /// A [SyntaxError](crate::parser::SyntaxError), boxed so this type stays independent of the token kind.
    #[error("{0}")]
    Parse(Box<dyn std::error::Error + Send + Sync>),
    /// Parsing stopped before the end of the input, at the given token index.
    #[error("Syntax Error: input left over after token {0}")]
    Incomplete(usize),
    #[error("{}", render_diagnostics(.0))]
    Build(Vec<Diagnostic>)
}

fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics.iter()
        .filter(|d| d.is_fatal())
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
