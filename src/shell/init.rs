use anyhow::{Context, Result};
use nix::unistd;
use tracing::debug;
use xdg::BaseDirectories;

use super::modules::{load_module, Module};
use super::Session;

use std::path::PathBuf;

// Seeds PWD from the operating system and loads the builtins.  OLDPWD is
// declared without a value, so `cd -` fails until the first directory
// change.
pub fn init(session: &mut Session) -> Result<()> {
    session.reset();

    let cwd = unistd::getcwd().context("unable to read the working directory")?;
    session.state.set("PWD", Some(&cwd.to_string_lossy()), true);
    session.state.set("OLDPWD", None, true);

    load_module(&mut session.builtins, Module::Core);

    debug!(pwd = %cwd.display(), "session initialized");

    Ok(())
}

// $XDG_CONFIG_HOME/mysh/init, if present
pub fn init_script_path() -> Result<Option<PathBuf>> {
    let base_dirs = BaseDirectories::with_prefix("mysh")?;

    Ok(base_dirs.find_config_file("init"))
}
