use anyhow::{Context, Result};
use tracing::debug;

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::{self, ExitStatus};

use super::token::Word;
use crate::shell::state::State;
use crate::shell::{Session, NOT_EXECUTABLE, NOT_FOUND, SIG_VAL};

// One simple command: leading NAME=value words followed by argv.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Command {
    words: Vec<Word>,
}

impl Command {
    pub fn new(words: Vec<Word>) -> Self {
        Command { words }
    }

    #[cfg(test)]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    fn split(&self) -> (&[Word], &[Word]) {
        let n = self
            .words
            .iter()
            .take_while(|word| word.name().is_some())
            .count();

        self.words.split_at(n)
    }

    pub fn argv(&self, state: &State) -> Vec<String> {
        let (_, words) = self.split();

        words.iter().filter_map(|word| word.expand(state)).collect()
    }

    // Runs the command and records its outcome as the return value.
    pub fn execute(&self, session: &mut Session) -> Result<()> {
        let (assignments, _) = self.split();

        let assignments: Vec<(String, String)> = assignments
            .iter()
            .filter_map(|word| {
                word.name()
                    .map(|name| (name.to_string(), word.value(&session.state)))
            })
            .collect();
        let args = self.argv(&session.state);

        if args.is_empty() {
            for (name, value) in &assignments {
                let exported = session
                    .state
                    .variable(name)
                    .map_or(false, |var| var.exported);
                session.state.set(name, Some(value), exported);
            }

            session.state.set_rv(0);
            return Ok(());
        }

        let argv: Vec<&str> = args.iter().map(|arg| arg.as_str()).collect();

        let rv = match session.builtins.dispatch(&mut session.state, &argv)? {
            Some(rv) => rv,
            None => launch(&argv, &assignments, &session.state)?,
        };

        session.state.set_rv(rv);

        Ok(())
    }
}

// Runs an external program in the foreground with the inherited standard
// streams.  Prefix assignments only reach this program's environment.
fn launch(argv: &[&str], assignments: &[(String, String)], state: &State) -> Result<i32> {
    debug!(command = argv[0], "launching external command");

    let status = process::Command::new(argv[0])
        .args(&argv[1..])
        .envs(state.exported())
        .envs(assignments.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .status();

    match status {
        Ok(status) => Ok(exit_code(status)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            eprintln!("mysh: {}: command not found", argv[0]);
            Ok(NOT_FOUND)
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            eprintln!("mysh: {}: Permission denied", argv[0]);
            Ok(NOT_EXECUTABLE)
        }
        Err(e) => Err(e).with_context(|| format!("{}: unable to launch", argv[0])),
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => SIG_VAL + signal,
        (None, None) => SIG_VAL,
    }
}
