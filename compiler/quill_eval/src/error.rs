//! Runtime errors.
//!
//! Everything here ends the run. The only failure a program can intercept
//! is a `Raise` of a value, and that never surfaces as a [`RuntimeError`]
//! unless no handler frame is left.

use quill_ir::hir::Slot;
use quill_ir::Intrinsic;

use crate::intrinsic::IntrinsicError;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("{intrinsic}: {error}")]
    Intrinsic {
        intrinsic: Intrinsic,
        #[source]
        error: IntrinsicError,
    },
    #[error("return outside function")]
    ReturnOutsideFunction,
    #[error("yield outside generator")]
    YieldOutsideGenerator,
    #[error("unhandled exception: {0}")]
    UnhandledException(String),
    #[error("next on an exhausted generator")]
    GeneratorExhausted,
    #[error("generator is already running")]
    GeneratorRunning,
    #[error("slot {0} out of range")]
    SlotOutOfRange(Slot),
    #[error("instruction pointer out of range")]
    InvalidIp,
    #[error("unknown closure")]
    UnknownClosure,
    #[error("unknown module")]
    UnknownModule,
    #[error("pop_except without a handler frame beneath")]
    InvalidPopExcept,
    #[error("no active frame")]
    NoActiveFrame,
    #[error("frame limit of {0} exceeded")]
    FrameLimit(usize),
    #[error("step limit of {0} exceeded")]
    StepLimit(u64),
}

impl RuntimeError {
    pub(crate) fn intrinsic(intrinsic: Intrinsic, error: IntrinsicError) -> Self {
        RuntimeError::Intrinsic { intrinsic, error }
    }
}
