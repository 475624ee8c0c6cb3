//! HIR generation for Quill.
//!
//! [`generate`] lowers a parsed (and folded) module into a
//! [`quill_ir::hir::Module`]: one [`Closure`](quill_ir::hir::Closure) for the
//! module entry plus one per function and class body, in the order their
//! definitions are reached. Names are resolved through the
//! [`scope::ScopeStack`] as each closure is generated.
//!
//! Almost every operation of the source language lowers to a call of a
//! `__builtin__*` function looked up in the global dictionary at run time;
//! only `is`, `is not` and direct `__intrinsic__*` calls become single
//! intrinsic instructions.

mod error;
mod gen;
pub mod scope;

pub use error::GenError;
pub use gen::generate;
