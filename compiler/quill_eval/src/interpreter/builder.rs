//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use super::Interpreter;
use crate::intrinsic::Natives;
use crate::io::{stdout_output, InputHandler, SharedOutput};

/// Frames allowed in one group before the run is aborted.
pub const DEFAULT_MAX_FRAMES: usize = 100_000;

/// Builder for creating Interpreter instances.
///
/// The defaults read standard input, write standard output, allow
/// [`DEFAULT_MAX_FRAMES`] frames per group and put no bound on the number
/// of executed instructions.
pub struct InterpreterBuilder {
    output: Option<SharedOutput>,
    input: InputHandler,
    max_frames: usize,
    step_limit: Option<u64>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self {
            output: None,
            input: InputHandler::default(),
            max_frames: DEFAULT_MAX_FRAMES,
            step_limit: None,
        }
    }

    /// Set where `print1` writes.
    #[must_use]
    pub fn output(mut self, output: SharedOutput) -> Self {
        self.output = Some(output);
        self
    }

    /// Set where `input0` reads.
    #[must_use]
    pub fn input(mut self, input: InputHandler) -> Self {
        self.input = input;
        self
    }

    #[must_use]
    pub fn max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Abort a run after `limit` instructions.
    #[must_use]
    pub fn step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }

    pub fn build(self) -> Interpreter {
        let output = self.output.unwrap_or_else(stdout_output);
        Interpreter {
            modules: Vec::new(),
            groups: Vec::new(),
            natives: Natives::new(output, self.input),
            max_frames: self.max_frames,
            step_limit: self.step_limit,
            steps: 0,
        }
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
