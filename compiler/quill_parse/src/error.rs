//! Parse error types.

use quill_ir::{Span, TokenKind};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {span}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: TokenKind },
    #[error("cannot assign to this expression")]
    InvalidAssignTarget,
    #[error("cannot delete this expression")]
    InvalidDeleteTarget,
    #[error("parameter without a default follows a parameter with one")]
    NonDefaultAfterDefault,
    #[error("`try` needs at least one `except` clause")]
    TryWithoutExcept,
    #[error("integer literal does not fit in 64 bits")]
    IntegerTooLarge,
}
