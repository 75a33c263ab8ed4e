use std::fmt::Formatter;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// The built value is still usable.
    Warning,
    /// Nothing is built.
    Fatal
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticCode {
    // grammar
    EmptyGrammar,
    UndefinedRule,
    DuplicateAlternative,
    LeftRecursion,
    AmbiguousAlternatives,
    UnknownStartRule,
    InvalidRuleText,

    // lexers
    UnknownState,
    DuplicateState,
    DuplicateEnd,
    DeadEndState,
    InvalidPattern,
    EmptyPattern,
    NoLexemes
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        use DiagnosticCode::*;
        match self {
            EmptyGrammar => "empty-grammar",
            UndefinedRule => "undefined-rule",
            DuplicateAlternative => "duplicate-alternative",
            LeftRecursion => "left-recursion",
            AmbiguousAlternatives => "ambiguous-alternatives",
            UnknownStartRule => "unknown-start-rule",
            InvalidRuleText => "invalid-rule-text",
            UnknownState => "unknown-state",
            DuplicateState => "duplicate-state",
            DuplicateEnd => "duplicate-end",
            DeadEndState => "dead-end-state",
            InvalidPattern => "invalid-pattern",
            EmptyPattern => "empty-pattern",
            NoLexemes => "no-lexemes"
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    /// The rule (or lexer state) the diagnostic is about, if any.
    pub rule: Option<String>
}

impl Diagnostic {
    pub fn fatal(code: DiagnosticCode, message: impl Into<String>) -> Diagnostic {
        Diagnostic {
            severity: Severity::Fatal,
            code,
            message: message.into(),
            rule: None
        }
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Diagnostic {
        Diagnostic {
            severity: Severity::Warning,
            code,
            message: message.into(),
            rule: None
        }
    }

    pub fn in_rule(mut self, rule: impl Into<String>) -> Diagnostic {
        self.rule = Some(rule.into());
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use colored::Colorize;

        let level = match self.severity {
            Severity::Warning => "warning".yellow(),
            Severity::Fatal => "error".red()
        };
        write!(f, "{}[{}]", level, self.code.as_str())?;
        if let Some(rule) = &self.rule {
            write!(f, " in `{}`", rule.bright_blue())?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Outcome of building a grammar, parser or lexer.
///
/// `value` is `None` exactly when at least one diagnostic is fatal.
#[derive(Debug)]
pub struct BuildResult<T> {
    pub value: Option<T>,
    pub diagnostics: Vec<Diagnostic>
}

impl<T> BuildResult<T> {
    /// Fails closed: drops `value` if any diagnostic is fatal.
    pub fn new(value: T, diagnostics: Vec<Diagnostic>) -> BuildResult<T> {
        let value = if diagnostics.iter().any(Diagnostic::is_fatal) {
            None
        } else {
            Some(value)
        };
        BuildResult { value, diagnostics }
    }

    pub fn failed(diagnostics: Vec<Diagnostic>) -> BuildResult<T> {
        BuildResult {
            value: None,
            diagnostics
        }
    }

    pub fn is_error(&self) -> bool {
        self.value.is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_fatal())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_fatal())
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> BuildResult<U> {
        BuildResult {
            value: self.value.map(f),
            diagnostics: self.diagnostics
        }
    }

    /// Chains another build step, keeping the diagnostics of both.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> BuildResult<U>) -> BuildResult<U> {
        match self.value {
            Some(value) => {
                let mut next = f(value);
                let mut diagnostics = self.diagnostics;
                diagnostics.append(&mut next.diagnostics);
                BuildResult {
                    value: next.value,
                    diagnostics
                }
            }
            None => BuildResult::failed(self.diagnostics)
        }
    }

    pub fn into_result(self) -> Result<T, crate::error::Error> {
        match self.value {
            Some(value) => Ok(value),
            None => Err(crate::error::Error::Build(self.diagnostics))
        }
    }
}
