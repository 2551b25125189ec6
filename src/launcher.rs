use crate::command::{Flow, Streams};
use std::borrow::Cow;
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::debug;

/// Run the external program named by `args[0]` and wait until it exits or is
/// killed by a signal.
///
/// The child inherits the shell's standard streams, environment and working
/// directory. Every failure is reported as one stderr line; the result is
/// always [`Flow::Continue`].
pub fn launch(args: &[String], io: &mut Streams<'_>) -> Flow {
    let Some((name, operands)) = args.split_first() else {
        return Flow::Continue;
    };

    let search_paths = env::var_os("PATH");
    let Some(program) = find_command_path(search_paths.as_deref(), Path::new(name)) else {
        io.report(format_args!("{name}: command not found"));
        return Flow::Continue;
    };

    // Anything the shell buffered must land before the child's own output.
    let _ = io.stdout.flush();

    let mut command = Command::new(&*program);
    command.args(operands);
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.arg0(name);
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            io.report(format_args!("{name}: {e}"));
            return Flow::Continue;
        }
    };
    let pid = child.id();
    debug!(pid, program = %program.display(), "spawned child");

    match child.wait() {
        Ok(status) => debug!(pid, status = status_code(status), "reaped child"),
        Err(e) => io.report(format_args!("{name}: can't wait for process {pid}: {e}")),
    }
    Flow::Continue
}

/// Shell-style numeric status: the exit code, or 128 + signal number.
fn status_code(status: ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match status.signal() {
        Some(signal) => 128 + signal,
        None => -1,
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a command name the way a typical shell would.
///
/// - Empty name: `None`.
/// - Name with a path separator (`/bin/ls`, `./run`, `bin/tool`): used as a
///   path if it exists; spawning reports anything else wrong with it.
/// - Bare name: the first executable regular file found in `search_paths`
///   (`PATH` syntax). No search path means nothing resolves.
pub fn find_command_path<'a>(
    search_paths: Option<&OsStr>,
    path: &'a Path,
) -> Option<Cow<'a, Path>> {
    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(first), None) if !path.is_absolute() && !path.starts_with(".") => {
            find_in_path(search_paths?, first.as_os_str()).map(Cow::Owned)
        }
        _ => path.exists().then_some(Cow::Borrowed(path)),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::test_support::lock_current_dir;
    use std::fs::{self, File};
    use std::os::unix::fs::PermissionsExt;

    fn osstr(s: &str) -> Option<&OsStr> {
        Some(OsStr::new(s))
    }

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn run(words: &[&str]) -> (Flow, String) {
        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
        let flow = launch(&args(words), &mut Streams::new(&mut out, &mut err));
        (flow, String::from_utf8(err).unwrap())
    }

    fn make_executable(path: &Path) {
        fs::write(path, "#!/bin/sh\nexit 0\n").expect("write script");
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod");
    }

    #[test]
    fn absolute_existing() {
        let path = Path::new("/bin/sh");
        let found = find_command_path(osstr("/nowhere"), path).expect("/bin/sh exists");
        assert_eq!(found.as_ref(), path);
    }

    #[test]
    fn absolute_nonexisting() {
        assert!(find_command_path(osstr("/bin"), Path::new("/bin/nonexisting")).is_none());
    }

    #[test]
    fn bare_name_found_in_search_path() {
        let found = find_command_path(osstr("/nowhere:/bin"), Path::new("sh"))
            .expect("Expected to find 'sh' in /bin via PATH search");
        assert_eq!(found.as_ref(), Path::new("/bin/sh"));
    }

    #[test]
    fn bare_name_without_search_path() {
        assert!(find_command_path(None, Path::new("sh")).is_none());
    }

    #[test]
    fn first_executable_match_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        File::create(first.path().join("tool")).unwrap();
        make_executable(&second.path().join("tool"));

        let search = env::join_paths([first.path(), second.path()]).unwrap();
        let found = find_command_path(Some(search.as_os_str()), Path::new("tool")).unwrap();
        assert_eq!(found.as_ref(), second.path().join("tool"));
    }

    #[test]
    fn directories_are_skipped_in_search_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("tool")).unwrap();
        assert!(find_command_path(Some(dir.path().as_os_str()), Path::new("tool")).is_none());
    }

    #[test]
    fn relative_paths_resolve_against_current_dir() {
        let _lock = lock_current_dir();
        let cwd_before = env::current_dir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir(temp.path().join("bin")).unwrap();
        make_executable(&temp.path().join("bin").join("tool"));

        env::set_current_dir(temp.path()).unwrap();
        let resolve = |name: &str| {
            find_command_path(osstr("/bin"), Path::new(name)).map(|p| p.into_owned())
        };
        let nested = resolve("bin/tool");
        let dotted = resolve("./bin/tool");
        let missing = resolve("./sh");
        env::set_current_dir(&cwd_before).unwrap();

        assert_eq!(nested.as_deref(), Some(Path::new("bin/tool")));
        assert_eq!(dotted.as_deref(), Some(Path::new("./bin/tool")));
        assert!(missing.is_none(), "./sh must not fall back to PATH");
    }

    #[test]
    fn empty_path_is_none() {
        assert!(find_command_path(osstr("/bin"), Path::new("")).is_none());
    }

    #[test]
    fn successful_program_reports_nothing() {
        assert_eq!(run(&["true"]), (Flow::Continue, String::new()));
    }

    #[test]
    fn failing_program_still_continues() {
        assert_eq!(run(&["false"]), (Flow::Continue, String::new()));
    }

    #[test]
    fn missing_program_reports_one_line() {
        let (flow, err) = run(&["definitely-not-a-command-8c1f"]);
        assert_eq!(flow, Flow::Continue);
        assert_eq!(err, "shell: definitely-not-a-command-8c1f: command not found\n");
    }

    #[test]
    fn non_executable_file_reports_one_line() {
        let temp = tempfile::tempdir().unwrap();
        let script = temp.path().join("script");
        fs::write(&script, "echo hi\n").unwrap();

        let (flow, err) = run(&[script.to_str().unwrap()]);
        assert_eq!(flow, Flow::Continue);
        assert_eq!(err.lines().count(), 1, "{err}");
        assert!(err.contains("ermission denied"), "{err}");
    }

    #[test]
    fn waits_for_child_to_finish() {
        let temp = tempfile::tempdir().unwrap();
        let marker = temp.path().join("marker");
        let script = format!("sleep 0.2; echo done > '{}'", marker.display());

        let (flow, err) = run(&["sh", "-c", script.as_str()]);

        assert_eq!(flow, Flow::Continue);
        assert!(err.is_empty(), "{err}");
        assert_eq!(fs::read_to_string(&marker).unwrap(), "done\n");
    }

    #[test]
    fn child_killed_by_signal_is_reaped() {
        let (flow, err) = run(&["sh", "-c", "kill -9 $$"]);
        assert_eq!(flow, Flow::Continue);
        assert!(err.is_empty(), "{err}");
    }

    #[test]
    fn child_sees_program_name_as_argv0() {
        let temp = tempfile::tempdir().unwrap();
        let out = temp.path().join("argv0");
        let script = format!("echo \"$0\" > '{}'", out.display());

        run(&["sh", "-c", script.as_str()]);

        assert_eq!(fs::read_to_string(&out).unwrap(), "sh\n");
    }

    #[test]
    fn status_codes_follow_shell_convention() {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(status_code(ExitStatus::from_raw(0)), 0);
        assert_eq!(status_code(ExitStatus::from_raw(3 << 8)), 3);
        assert_eq!(status_code(ExitStatus::from_raw(9)), 137);
    }
}
