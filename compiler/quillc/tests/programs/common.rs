//! Interpreter setup shared by the program tests.

use quill_eval::{buffer_output, InputHandler, Interpreter, RunOutcome, SharedOutput};
use quillc::{load_prelude, run_source, RunError};

/// Instructions any single test module may execute.
pub const STEP_LIMIT: u64 = 2_000_000;

/// A finished run: the interpreter (for globals) and what it printed.
pub struct Ran {
    pub interpreter: Interpreter,
    pub output: SharedOutput,
    pub result: Result<RunOutcome, RunError>,
}

impl Ran {
    pub fn printed(&self) -> String {
        self.output.output()
    }

    /// `repr1` of a global, or `None` when it is unbound.
    pub fn global(&self, name: &str) -> Option<String> {
        self.interpreter
            .global(name)
            .map(|value| self.interpreter.repr(&value))
    }

    pub fn error(self) -> RunError {
        match self.result {
            Ok(_) => panic!("program finished; printed {:?}", self.output.output()),
            Err(e) => e,
        }
    }
}

pub fn run_with_input(source: &str, lines: &[&str]) -> Ran {
    let output = buffer_output();
    let mut interpreter = Interpreter::builder()
        .output(output.clone())
        .input(InputHandler::lines(lines.iter().copied()))
        .step_limit(STEP_LIMIT)
        .build();
    load_prelude(&mut interpreter).unwrap();
    let result = run_source(&mut interpreter, source);
    Ran {
        interpreter,
        output,
        result,
    }
}

pub fn run(source: &str) -> Ran {
    run_with_input(source, &[])
}

/// Run `source` and return what it printed, failing on any error.
pub fn printed(source: &str) -> String {
    let ran = run(source);
    if let Err(e) = &ran.result {
        panic!("program failed: {e}\nprinted: {:?}", ran.printed());
    }
    ran.printed()
}
