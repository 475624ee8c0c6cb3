//! Quill IR - shared data for every phase of the runtime.
//!
//! - Spans for source locations
//! - Tokens produced by the lexer
//! - The statement/expression tree produced by the parser
//! - The HIR instruction set produced by the generator and consumed by
//!   the interpreter, together with its textual dump
//! - The intrinsic catalog table (names, arities, numeric ids)
//!
//! Nothing here executes code. The interpreter and the intrinsic
//! implementations live in `quill_eval`.

pub mod arith;
pub mod ast;
pub mod hir;
mod intrinsic;
mod quote;
mod span;
mod token;

pub use intrinsic::{Arity, Intrinsic, BUILTIN_PREFIX, INTRINSIC_PREFIX};
pub use quote::quote;
pub use span::Span;
pub use token::{Token, TokenKind};
