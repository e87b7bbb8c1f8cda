//! Line editor abstraction for the REPL.
//!
//! A trait over line editing keeps the REPL testable: the real shell runs on
//! rustyline, tests feed scripted input.

use std::collections::VecDeque;

use credence_foundation::{Error, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Result of reading a line from the editor.
#[derive(Debug)]
pub enum ReadResult {
    /// A line was successfully read.
    Line(String),
    /// User pressed Ctrl+C.
    Interrupted,
    /// User pressed Ctrl+D (EOF).
    Eof,
}

/// Abstraction over line editing functionality.
pub trait LineEditor {
    /// Reads a line with the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Adds a line to history.
    fn add_history(&mut self, line: &str);
}

/// The rustyline-backed editor used by the interactive shell.
pub struct RustylineEditor {
    inner: DefaultEditor,
}

impl RustylineEditor {
    /// Creates a new rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn new() -> Result<Self> {
        let inner = DefaultEditor::new()
            .map_err(|e| Error::io(format!("failed to initialize line editor: {e}")))?;
        Ok(Self { inner })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        match self.inner.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(e) => Err(Error::io(format!("failed to read input: {e}"))),
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.inner.add_history_entry(line);
    }
}

/// An editor that replays a fixed script, then reports EOF. For tests.
#[derive(Debug, Default)]
pub struct ScriptedEditor {
    lines: VecDeque<String>,
}

impl ScriptedEditor {
    /// Creates an editor that will return the given lines in order.
    #[must_use]
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineEditor for ScriptedEditor {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        Ok(self
            .lines
            .pop_front()
            .map_or(ReadResult::Eof, ReadResult::Line))
    }

    fn add_history(&mut self, _line: &str) {}
}
