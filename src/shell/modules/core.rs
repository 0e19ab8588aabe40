use crate::shell::state::State;
use crate::shell::{RUNTIME_ERR, SYNTAX_ERR};

use anyhow::{Context, Result};
use nix::errno::Errno;
use nix::unistd;

use std::env;

pub fn chdir(state: &mut State, argv: &[&str]) -> Result<i32> {
    let dir = match argv {
        [_] => env::var("HOME").context("cd: HOME is not set")?,
        [_, "-"] => match state.get("OLDPWD") {
            Some(dir) => dir.to_string(),
            None => {
                eprintln!("cd: OLDPWD is not set");
                return Ok(RUNTIME_ERR);
            }
        },
        [_, path] => path.to_string(),
        _ => {
            eprintln!("usage: cd <dir>");
            return Ok(SYNTAX_ERR);
        }
    };

    match unistd::chdir(dir.as_str()) {
        Ok(()) => {}
        Err(Errno::ENOENT) => {
            eprintln!("cd: {}: No such file or directory", dir);
            return Ok(RUNTIME_ERR);
        }
        Err(e) => {
            return Err(anyhow::Error::new(e).context(format!("cd: {}", dir)));
        }
    }

    // Old PWD must be read before it is overwritten
    let old_pwd = state.get("PWD").map(|pwd| pwd.to_string());
    let new_pwd = unistd::getcwd().context("cd: unable to read the working directory")?;

    state.set("OLDPWD", old_pwd.as_deref(), true);
    state.set("PWD", Some(&new_pwd.to_string_lossy()), true);

    Ok(0)
}

// Exits with the shell's last return value, not with the status of
// `exit` itself.
pub fn exit(state: &mut State, argv: &[&str]) -> Result<i32> {
    if argv.len() > 1 {
        eprintln!("exit: syntax error: unused parameters {}, ...", argv[1]);
        return Ok(SYNTAX_ERR);
    }

    std::process::exit(state.rv());
}
