//! Streams behind `print1`, `flush0` and `input0`.
//!
//! Output goes through an [`OutputHandler`]: stdout for the CLI, a capture
//! buffer for tests and embedding, or nowhere. Enum dispatch keeps the
//! print path free of vtable calls.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// Writes straight to the process stdout.
#[derive(Default)]
pub struct StdoutOutput;

impl StdoutOutput {
    pub fn write(&self, text: &str) -> io::Result<()> {
        io::stdout().lock().write_all(text.as_bytes())
    }

    pub fn flush(&self) -> io::Result<()> {
        io::stdout().lock().flush()
    }
}

/// Captures everything written.
#[derive(Default)]
pub struct BufferOutput {
    buffer: Mutex<String>,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&self, text: &str) {
        self.buffer.lock().push_str(text);
    }

    pub fn output(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

pub enum OutputHandler {
    Stdout(StdoutOutput),
    Buffer(BufferOutput),
    /// Discards output.
    Silent,
}

impl OutputHandler {
    pub fn write(&self, text: &str) -> io::Result<()> {
        match self {
            Self::Stdout(h) => h.write(text),
            Self::Buffer(h) => {
                h.write(text);
                Ok(())
            }
            Self::Silent => Ok(()),
        }
    }

    pub fn flush(&self) -> io::Result<()> {
        match self {
            Self::Stdout(h) => h.flush(),
            Self::Buffer(_) | Self::Silent => Ok(()),
        }
    }

    /// Captured text; empty for handlers that do not capture.
    pub fn output(&self) -> String {
        match self {
            Self::Buffer(h) => h.output(),
            Self::Stdout(_) | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

/// Output handler shared between the interpreter and whoever reads the
/// captured text afterwards.
pub type SharedOutput = Arc<OutputHandler>;

pub fn stdout_output() -> SharedOutput {
    Arc::new(OutputHandler::Stdout(StdoutOutput))
}

pub fn buffer_output() -> SharedOutput {
    Arc::new(OutputHandler::Buffer(BufferOutput::new()))
}

pub fn silent_output() -> SharedOutput {
    Arc::new(OutputHandler::Silent)
}

/// Where `input0` reads lines from.
#[derive(Default)]
pub enum InputHandler {
    #[default]
    Stdin,
    /// Pre-supplied lines, consumed front to back.
    Lines(VecDeque<String>),
}

impl InputHandler {
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        InputHandler::Lines(lines.into_iter().map(Into::into).collect())
    }

    /// Next line without its terminator, or `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        match self {
            InputHandler::Stdin => {
                let mut line = String::new();
                if io::stdin().lock().read_line(&mut line)? == 0 {
                    return Ok(None);
                }
                let trimmed = line.trim_end_matches(['\n', '\r']).len();
                line.truncate(trimmed);
                Ok(Some(line))
            }
            InputHandler::Lines(lines) => Ok(lines.pop_front()),
        }
    }
}
