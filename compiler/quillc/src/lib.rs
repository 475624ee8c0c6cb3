//! Quill compiler driver.
//!
//! # Architecture
//!
//! ```text
//! source
//!     │
//!     ▼
//! quill_lexer::lex ──► tokens (with layout)
//!     │
//!     ▼
//! quill_parse::parse + fold ──► statement tree
//!     │
//!     ▼
//! quill_hir::generate ──► hir::Module
//!     │
//!     ▼
//! quill_eval::Interpreter::load + run
//! ```
//!
//! Every program runs after the [`PRELUDE`], which defines the
//! `__builtin__*` functions the generator targets and the core types.

pub mod commands;

use std::sync::Once;

use quill_eval::{Interpreter, RunOutcome, RuntimeError};
use quill_hir::GenError;
use quill_ir::hir::Module;
use quill_lexer::LexError;
use quill_parse::ParseError;

/// Source of the standard module run before every program.
pub const PRELUDE: &str = include_str!("../std/prelude.qy");

/// Any failure before a module exists.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("generation error: {0}")]
    Gen(#[from] GenError),
}

/// Failure of a whole program, front end or run.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("prelude: {0}")]
    Prelude(CompileError),
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Lex, parse, fold and generate one module.
#[tracing::instrument(level = "debug", skip_all)]
pub fn compile(source: &str) -> Result<Module, CompileError> {
    let tokens = quill_lexer::lex(source)?;
    let body = quill_parse::fold(quill_parse::parse(&tokens)?);
    let module = quill_hir::generate(&body)?;
    tracing::debug!(closures = module.closures.len(), "compiled module");
    Ok(module)
}

/// Pretty-printed JSON form of a generated module, for tools that read HIR.
pub fn hir_json(module: &Module) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(module)
}

/// Compile and run the prelude in `interpreter`, leaving its globals behind.
pub fn load_prelude(interpreter: &mut Interpreter) -> Result<(), RunError> {
    let module = compile(PRELUDE).map_err(RunError::Prelude)?;
    let id = interpreter.load(module);
    interpreter.run(id)?;
    Ok(())
}

/// Compile `source` and run it as a main module.
///
/// The prelude is not loaded here; call [`load_prelude`] first unless the
/// program only uses intrinsics.
pub fn run_source(interpreter: &mut Interpreter, source: &str) -> Result<RunOutcome, RunError> {
    let module = compile(source)?;
    let id = interpreter.load(module);
    Ok(interpreter.run(id)?)
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=quill_eval=trace`;
/// set `QUILL_LOG_TREE` as well for indented span output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        if std::env::var("QUILL_LOG_TREE").is_ok() {
            tracing_subscriber::registry()
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
