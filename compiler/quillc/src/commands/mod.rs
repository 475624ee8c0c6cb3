//! Command handlers for the `quillc` CLI.
//!
//! Each submodule implements one command. Failures are printed to stderr
//! and exit with status 1.

mod debug;
mod run;

pub use debug::{hir_file, lex_file, parse_file};
pub use run::{parse_run_options, run_file, RunOptions};

/// Read a source file, exiting with a readable message on failure.
pub(super) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Print `error` for `path` and exit with status 1.
pub(super) fn fail(path: &str, error: &dyn std::fmt::Display) -> ! {
    eprintln!("{path}: {error}");
    std::process::exit(1);
}
