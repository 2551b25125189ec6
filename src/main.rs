use mini_shell::{Editor, Prompted, Shell, Streams};
use std::io::{self, IsTerminal};
use tracing::debug;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let (mut stdout, mut stderr) = (io::stdout(), io::stderr());
    let mut streams = Streams::new(&mut stdout, &mut stderr);

    let stdin = io::stdin();
    let editor = if stdin.is_terminal() {
        Editor::new()
            .inspect_err(|e| debug!(error = %e, "falling back to plain input"))
            .ok()
    } else {
        None
    };

    let result = match editor {
        Some(editor) => Shell::new(editor).run(&mut streams),
        None => Shell::new(Prompted::new(stdin.lock(), io::stdout())).run(&mut streams),
    };

    // The shell itself always exits successfully.
    if let Err(e) = result {
        streams.report(format_args!("{e:#}"));
    }
}
