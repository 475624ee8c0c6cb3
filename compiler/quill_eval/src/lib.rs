//! Quill Eval - the HIR interpreter.
//!
//! Runs [`quill_ir::hir::Module`]s produced by `quill_hir`. There is no
//! host recursion: every call, return, `yield` and `raise` is a change to an
//! explicit stack of frame groups, and exceptions are found by searching
//! that stack for handler frames.
//!
//! # Architecture
//!
//! - [`object`]: reference-counted objects, capture cells and the shared
//!   singletons (`True`, `False`, `None`, `...`, the uninitialized value)
//! - `frame`: activation records and the groups generators suspend
//! - `intrinsic`: the native half of the intrinsic catalog
//! - [`interpreter`]: module table, dispatch loop and the virtual
//!   intrinsics (`v_call2`, `v_gen_next1`, ...)
//! - `io`: where `print1` writes and `input0` reads

mod error;
mod frame;
mod intrinsic;
pub mod interpreter;
mod io;
pub mod object;

pub use error::RuntimeError;
pub use intrinsic::IntrinsicError;
pub use interpreter::{Interpreter, InterpreterBuilder, ModuleId, RunOutcome};
pub use io::{
    buffer_output, silent_output, stdout_output, BufferOutput, InputHandler, OutputHandler,
    SharedOutput,
};
pub use object::{ObjectRef, Primitive};
