//! Indentation tracking for block structure.

/// Result of comparing a line's indentation with the enclosing block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum IndentChange {
    Same,
    Indent,
    Dedent(usize),
}

/// Stack of open indentation columns, plus the line/bracket state the
/// layout pass needs to decide when indentation is significant.
#[derive(Debug)]
pub(crate) struct IndentStack {
    stack: Vec<usize>,
    at_line_start: bool,
    bracket_depth: usize,
}

impl IndentStack {
    pub(crate) fn new() -> Self {
        IndentStack {
            stack: vec![0],
            at_line_start: true,
            bracket_depth: 0,
        }
    }

    #[inline]
    pub(crate) fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    #[inline]
    pub(crate) fn new_line(&mut self) {
        self.at_line_start = true;
    }

    #[inline]
    pub(crate) fn consumed_content(&mut self) {
        self.at_line_start = false;
    }

    /// Indentation only matters outside brackets.
    #[inline]
    pub(crate) fn tracking_indent(&self) -> bool {
        self.bracket_depth == 0
    }

    pub(crate) fn open_bracket(&mut self) {
        self.bracket_depth += 1;
    }

    pub(crate) fn close_bracket(&mut self) {
        self.bracket_depth = self.bracket_depth.saturating_sub(1);
    }

    fn current(&self) -> usize {
        self.stack.last().copied().unwrap_or(0)
    }

    /// Compare `column` with the open blocks. A dedent must land exactly on
    /// an enclosing level.
    pub(crate) fn process_indent(&mut self, column: usize) -> Result<IndentChange, ()> {
        let current = self.current();
        if column > current {
            self.stack.push(column);
            return Ok(IndentChange::Indent);
        }
        if column == current {
            return Ok(IndentChange::Same);
        }
        let mut popped = 0;
        while self.current() > column {
            self.stack.pop();
            popped += 1;
        }
        if self.current() == column {
            Ok(IndentChange::Dedent(popped))
        } else {
            Err(())
        }
    }

    /// Close every open block at end of input, returning how many.
    pub(crate) fn close_all(&mut self) -> usize {
        let open = self.stack.len().saturating_sub(1);
        self.stack.truncate(1);
        open
    }
}
