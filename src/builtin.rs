use crate::command::{Flow, Streams};
use anyhow::{Context, Result, bail};
use std::env;
use tracing::debug;

/// Built-in commands known to the shell at compile time.
///
/// Built-ins run in-process, so `cd` can change the shell's own working
/// directory. They never spawn a child.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "cd".
    const NAME: &'static str;

    /// Build the command from the operands following its name.
    ///
    /// Operands are taken verbatim; nothing is treated as a flag.
    fn parse(operands: &[&str]) -> Self;

    /// Executes the command and returns whether the loop should go on.
    fn execute(self, io: &mut Streams<'_>) -> Result<Flow>;
}

/// Entry point shared by every built-in: full argument list in, continuation out.
pub type Handler = fn(&[String], &mut Streams<'_>) -> Flow;

/// One row of the built-in table.
pub struct Builtin {
    pub name: &'static str,
    pub handler: Handler,
}

const fn entry<T: BuiltinCommand>() -> Builtin {
    Builtin {
        name: T::NAME,
        handler: invoke::<T>,
    }
}

/// The built-in table, in lookup order.
pub static BUILTINS: [Builtin; 3] = [entry::<Cd>(), entry::<Help>(), entry::<Exit>()];

/// Find the built-in named exactly `name`; first match wins.
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|builtin| builtin.name == name)
}

/// Parse and run `T`, turning every failure into a single stderr line.
fn invoke<T: BuiltinCommand>(args: &[String], io: &mut Streams<'_>) -> Flow {
    let operands: Vec<&str> = args.iter().skip(1).map(String::as_str).collect();
    match T::parse(&operands).execute(io) {
        Ok(flow) => flow,
        Err(e) => {
            io.report(format_args!("{e:#}"));
            Flow::Continue
        }
    }
}

/// Change the current working directory to the first operand.
/// Anything after it is ignored.
pub struct Cd {
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    const NAME: &'static str = "cd";

    fn parse(operands: &[&str]) -> Self {
        Cd {
            target: operands.first().map(|target| target.to_string()),
        }
    }

    fn execute(self, _io: &mut Streams<'_>) -> Result<Flow> {
        let Some(target) = self.target else {
            bail!("expected argument to \"cd\"");
        };
        env::set_current_dir(&target).with_context(|| format!("cd: {target}"))?;
        debug!(dir = %target, "changed working directory");
        Ok(Flow::Continue)
    }
}

/// Print the banner and the list of built-ins. Arguments are ignored.
pub struct Help;

impl BuiltinCommand for Help {
    const NAME: &'static str = "help";

    fn parse(_operands: &[&str]) -> Self {
        Help
    }

    fn execute(self, io: &mut Streams<'_>) -> Result<Flow> {
        writeln!(io.stdout, "mini_shell, a minimal interactive shell")?;
        writeln!(io.stdout, "The following commands are built in:")?;
        for builtin in &BUILTINS {
            writeln!(io.stdout, "  {}", builtin.name)?;
        }
        writeln!(
            io.stdout,
            "Use the man command for detailed information on other programs."
        )?;
        Ok(Flow::Continue)
    }
}

/// Leave the shell. Arguments are ignored.
pub struct Exit;

impl BuiltinCommand for Exit {
    const NAME: &'static str = "exit";

    fn parse(_operands: &[&str]) -> Self {
        Exit
    }

    fn execute(self, _io: &mut Streams<'_>) -> Result<Flow> {
        Ok(Flow::Terminate)
    }
}
