use crate::expr::EvalFailure;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind:?} in '{formula}': {message}")]
pub struct ParseFailure {
    pub kind: ParseErrorKind,
    pub message: String,
    pub formula: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No grammar recognizes the string.
    UnrecognizedFormat,
    /// A grammar was selected but its body is malformed.
    SyntaxError,
    /// `key:...` form with a key that names no family.
    InvalidFamilyKey,
}

impl ParseFailure {
    pub fn new(kind: ParseErrorKind, formula: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            formula: formula.to_string(),
        }
    }

    pub fn unrecognized(formula: &str) -> Self {
        Self::new(
            ParseErrorKind::UnrecognizedFormat,
            formula,
            "no known formula grammar matches",
        )
    }

    pub fn syntax(formula: &str, message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::SyntaxError, formula, message)
    }

    pub fn invalid_key(formula: &str, key: &str) -> Self {
        Self::new(
            ParseErrorKind::InvalidFamilyKey,
            formula,
            format!("unknown family key '{}'", key),
        )
    }

    pub fn from_eval(formula: &str, err: EvalFailure) -> Self {
        Self::syntax(formula, format!("expression: {}", err.message))
    }
}

pub type ParseResult<T> = Result<T, ParseFailure>;
