use crate::scope::ScopeError;

/// Reasons a module cannot be lowered. Generation stops at the first one
/// and no partial module is produced.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenError {
    #[error(transparent)]
    Scope(#[from] ScopeError),
    #[error("`yield` outside a function")]
    YieldOutsideFunction,
    #[error("`break` outside a loop")]
    BreakOutsideLoop,
    #[error("`continue` outside a loop")]
    ContinueOutsideLoop,
    #[error("unknown intrinsic `{0}`")]
    UnknownIntrinsic(String),
    #[error("intrinsic `{name}` takes {expected} argument(s), got {found}")]
    IntrinsicArity {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("captured name `{0}` has no slot in the enclosing scope")]
    UnboundCapture(String),
}
