use std::io::Write;

/// Continuation signal produced by every dispatch and consumed by the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Prompt for the next command.
    Continue,
    /// Leave the loop and end the process with success status.
    Terminate,
}

/// Output streams a command writes to.
///
/// Built-ins write through these handles; external programs inherit the
/// process' own descriptors, so the shell flushes `stdout` before spawning.
pub struct Streams<'a> {
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

impl<'a> Streams<'a> {
    pub fn new(stdout: &'a mut dyn Write, stderr: &'a mut dyn Write) -> Self {
        Self { stdout, stderr }
    }

    /// Report a recoverable failure as a single `shell: ...` line on stderr.
    pub fn report(&mut self, message: impl std::fmt::Display) {
        // Nothing sensible to do if stderr itself is gone.
        let _ = writeln!(self.stderr, "shell: {message}");
    }
}
