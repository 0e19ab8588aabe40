use super::state::State;
use anyhow::Result;

use std::collections::HashMap;

mod core;

// argv[0] is the command name.  The returned integer is the command's
// return value; Err is reserved for failures that end the shell.
pub type Builtin = fn(&mut State, &[&str]) -> Result<i32>;

pub enum Module {
    Core,
}

#[derive(Default)]
pub struct Builtins {
    entries: HashMap<&'static str, Builtin>,
}

impl Builtins {
    #[cfg(test)]
    pub fn new() -> Self {
        Builtins::default()
    }

    // Last registration for a name wins.
    pub fn register(&mut self, name: &'static str, handler: Builtin) {
        self.entries.insert(name, handler);
    }

    // Ok(None) means `argv[0]` is not a builtin and should be run
    // as an external program instead.
    pub fn dispatch(&self, state: &mut State, argv: &[&str]) -> Result<Option<i32>> {
        match argv.first().and_then(|name| self.entries.get(name)) {
            Some(handler) => handler(state, argv).map(Some),
            None => Ok(None),
        }
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

pub fn load_module(builtins: &mut Builtins, module: Module) {
    match module {
        Module::Core => {
            builtins.register("cd", core::chdir);
            builtins.register("exit", core::exit);
        }
    }
}
