use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind:?}: {message}")]
pub struct MappingFailure {
    pub kind: MappingErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingErrorKind {
    /// The extent cannot be made usable by widening.
    DegenerateAndUnrecoverable,
    /// The drawing rectangle has no usable area.
    InvalidDrawRect,
}

impl MappingFailure {
    pub fn new(kind: MappingErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unrecoverable(message: impl Into<String>) -> Self {
        Self::new(MappingErrorKind::DegenerateAndUnrecoverable, message)
    }

    pub fn invalid_rect(message: impl Into<String>) -> Self {
        Self::new(MappingErrorKind::InvalidDrawRect, message)
    }
}

pub type MappingResult<T> = Result<T, MappingFailure>;
