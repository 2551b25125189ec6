//! Line readers feeding the main loop.

use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, Write};
use tracing::debug;

/// Outcome of one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A raw line, trailing newline included when the stream had one.
    Line(String),
    /// The input stream is exhausted.
    Eof,
}

/// Source of raw command lines.
pub trait LineReader {
    /// Show `prompt` and block until a full line or end of input is available.
    fn read_line(&mut self, prompt: &str) -> Result<Input>;
}

/// Plain reader over any buffered input, writing the prompt to `out`.
///
/// Used for piped or redirected input where line editing makes no sense.
pub struct Prompted<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Prompted<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.out)
    }
}

impl<R: BufRead, W: Write> LineReader for Prompted<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        write!(self.out, "{prompt}").context("can't write prompt")?;
        self.out.flush().context("can't write prompt")?;

        let mut raw = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut raw)
            .context("can't read from standard input")?;
        if read == 0 {
            Ok(Input::Eof)
        } else {
            Ok(Input::Line(String::from_utf8_lossy(&raw).into_owned()))
        }
    }
}

/// Interactive reader with line editing and in-memory history.
pub struct Editor {
    editor: DefaultEditor,
}

impl Editor {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().context("can't initialize line editor")?;
        Ok(Self { editor })
    }
}

impl LineReader for Editor {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        let result = self.editor.readline(prompt);
        accept(result, |line| self.editor.add_history_entry(line))
    }
}

/// Map one rustyline read to an [`Input`], recording non-blank lines in history.
///
/// A history failure only loses the entry; the line is still returned.
fn accept(
    result: rustyline::Result<String>,
    record: impl FnOnce(&str) -> rustyline::Result<bool>,
) -> Result<Input> {
    match result {
        Ok(mut line) => {
            if !line.trim().is_empty() {
                if let Err(e) = record(&line) {
                    debug!(error = %e, "can't record history entry");
                }
            }
            line.push('\n');
            Ok(Input::Line(line))
        }
        // Ctrl-C drops the line being edited and re-prompts.
        Err(ReadlineError::Interrupted) => Ok(Input::Line(String::new())),
        Err(ReadlineError::Eof) => Ok(Input::Eof),
        Err(err) => Err(err).context("can't read line"),
    }
}
