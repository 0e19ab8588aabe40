use pretty_assertions::assert_eq;
use rstest::rstest;

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

fn mysh(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mysh"))
        .args(args)
        .env_remove("MYSH_LOG")
        .output()
        .unwrap()
}

fn mysh_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_mysh"))
        .args(args)
        .env_remove("MYSH_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();

    child.wait_with_output().unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[rstest]
#[case("", 0)]
#[case("exit", 0)]
#[case("cd /no/such/dir; exit", 1)]
#[case("sh -c 'exit 7'; exit", 7)]
#[case("sh -c 'exit 7'; exit; sh -c 'exit 9'", 7)]
#[case("exit now; X=1", 0)]
#[case("exit now", 1)]
#[case("mysh-no-such-command", 127)]
#[case("echo 'unterminated", 1)]
fn string_mode_exit_status(#[case] command: &str, #[case] expected: i32) {
    let output = mysh(&["-c", command]);

    assert_eq!(output.status.code(), Some(expected));
}

#[test]
fn exit_with_arguments_reports_a_syntax_error() {
    let output = mysh(&["-c", "exit 3"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unused parameters 3"));
}

#[test]
fn diagnostics_go_to_stderr() {
    let output = mysh(&["-c", "cd /no/such/dir; cd -"]);

    assert_eq!(output.stdout, b"");
    let stderr = stderr(&output);
    assert!(stderr.contains("cd: /no/such/dir: No such file or directory"));
    assert!(stderr.contains("cd: OLDPWD is not set"));
}

#[test]
fn cd_updates_exported_pwd() {
    let output = mysh(&["-c", "cd /; sh -c 'test \"$PWD\" = / && test -n \"$OLDPWD\"'"]);

    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn cd_dash_swaps_directories() {
    let dir = tempfile::tempdir().unwrap();
    let dir = fs::canonicalize(dir.path()).unwrap();
    let script = format!(
        "cd {}; cd /; cd -; sh -c 'test \"$PWD\" = {} && test \"$OLDPWD\" = /'",
        dir.display(),
        dir.display()
    );

    let output = mysh(&["-c", &script]);

    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn file_mode_syntax_error_wins() {
    let script = tempfile::NamedTempFile::new().unwrap();
    fs::write(script.path(), "sh -c 'exit 0'\necho 'unterminated\n").unwrap();

    let output = mysh(&[script.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("mysh: line 2: syntax error"));
}

#[test]
fn file_mode_returns_last_status() {
    let script = tempfile::NamedTempFile::new().unwrap();
    fs::write(script.path(), "# comment\nX=4\nsh -c \"exit $X\"\n").unwrap();

    let output = mysh(&[script.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn file_mode_exit_stops_the_script() {
    let script = tempfile::NamedTempFile::new().unwrap();
    fs::write(script.path(), "sh -c 'exit 2'\nexit\nsh -c 'exit 5'\n").unwrap();

    let output = mysh(&[script.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn file_mode_missing_file_is_fatal() {
    let output = mysh(&["/no/such/script"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("mysh: /no/such/script"));
}

#[rstest]
#[case("sh -c 'exit 3'\n", 3)]
#[case("X=6\nsh -c \"exit $X\"\n", 6)]
#[case("cd /no/such/dir\n", 1)]
#[case("sh -c 'exit 2'\nexit\nsh -c 'exit 5'\n", 2)]
#[case("", 0)]
fn piped_stdin_exit_status(#[case] input: &str, #[case] expected: i32) {
    let output = mysh_with_stdin(&["--no-init"], input);

    assert_eq!(output.status.code(), Some(expected));
}

#[test]
fn piped_stdin_paints_no_prompt() {
    let output = mysh_with_stdin(&["--no-init"], "cd /\nsh -c \\\n'exit 4'\n");

    assert_eq!(output.status.code(), Some(4));
    assert_eq!(output.stdout, b"\n");
}
