// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Whole-program tests.
//!
//! Each test compiles a Quill program, runs it after the prelude in an
//! interpreter that prints into a capture buffer, and checks the printed
//! text, the resulting globals, or the error that escaped.
//!
//! # Organization
//!
//! - `common` - interpreter setup and helpers
//! - `names` - scoping, captures, `global`/`nonlocal`
//! - `calls` - arguments, defaults, rest parameters
//! - `generators` - `yield`, resumption and exhaustion
//! - `exceptions` - `raise`, `try`/`except`, unhandled errors
//! - `objects` - classes, attributes, inheritance
//! - `builtins` - prelude types and helpers
//! - `driver` - compile errors, limits, running without the prelude

mod programs {
    pub mod common;

    mod builtins;
    mod calls;
    mod driver;
    mod exceptions;
    mod generators;
    mod names;
    mod objects;
}
