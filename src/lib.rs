//! A minimal interactive command shell.
//!
//! Each iteration prints a prompt, reads one line, splits it on whitespace and
//! either runs one of the built-ins (`cd`, `help`, `exit`) or launches an
//! external program and waits for it. There is no quoting, expansion,
//! redirection, piping or job control.
//!
//! [`Shell`] drives the loop over any [`LineReader`]; [`execute`] dispatches a
//! single argument list.

mod builtin;
pub mod command;
mod launcher;
pub mod reader;
mod shell;
pub mod tokenizer;

pub use builtin::{BUILTINS, Builtin, Handler, lookup};
pub use command::{Flow, Streams};
pub use launcher::{find_command_path, launch};
pub use reader::{Editor, Input, LineReader, Prompted};
pub use shell::{PROMPT, Shell, execute};
pub use tokenizer::tokenize;
