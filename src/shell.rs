use crate::builtin;
use crate::command::{Flow, Streams};
use crate::launcher;
use crate::reader::{Input, LineReader};
use crate::tokenizer::tokenize;
use anyhow::Result;
use tracing::{debug, trace};

/// Printed before every read.
pub const PROMPT: &str = "> ";

/// Dispatch one argument list: a built-in if the first word names one,
/// otherwise an external program. An empty list does nothing.
pub fn execute(args: &[String], io: &mut Streams<'_>) -> Flow {
    let Some(name) = args.first() else {
        return Flow::Continue;
    };
    match builtin::lookup(name) {
        Some(builtin) => {
            debug!(command = %name, "running builtin");
            (builtin.handler)(args, io)
        }
        None => launcher::launch(args, io),
    }
}

/// The read-tokenize-dispatch loop.
///
/// Example
/// ```
/// use mini_shell::{Prompted, Shell, Streams};
/// use std::io::Cursor;
///
/// let reader = Prompted::new(Cursor::new("help\nexit\n"), Vec::<u8>::new());
/// let mut shell = Shell::new(reader);
/// let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
/// shell.run(&mut Streams::new(&mut out, &mut err)).unwrap();
/// assert!(String::from_utf8(out).unwrap().contains("exit"));
/// ```
pub struct Shell<R> {
    reader: R,
}

impl<R: LineReader> Shell<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Loop until `exit` or end of input.
    ///
    /// Errors come only from the reader; command failures are reported on
    /// `io.stderr` and the loop goes on.
    pub fn run(&mut self, io: &mut Streams<'_>) -> Result<()> {
        loop {
            let args = match self.reader.read_line(PROMPT)? {
                Input::Line(line) => tokenize(&line),
                Input::Eof => {
                    debug!("end of input");
                    return Ok(());
                }
            };
            trace!(?args, "tokenized");

            if execute(&args, io) == Flow::Terminate {
                return Ok(());
            }
        }
    }

    pub fn into_reader(self) -> R {
        self.reader
    }
}
