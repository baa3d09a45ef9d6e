use crate::expr::token::Span;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind:?}: {message}")]
pub struct EvalFailure {
    pub kind: EvalErrorKind,
    pub message: String,
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// The expression text is outside the accepted grammar.
    SyntaxError,
    /// Evaluation produced NaN or an infinity.
    NonFinite,
}

impl EvalFailure {
    pub fn new(kind: EvalErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::SyntaxError, message)
    }

    pub fn non_finite(message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::NonFinite, message)
    }

    pub fn is_non_finite(&self) -> bool {
        self.kind == EvalErrorKind::NonFinite
    }
}

pub type EvalResult<T> = Result<T, EvalFailure>;
