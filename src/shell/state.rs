use std::collections::HashMap;

// A shell variable.  `value` is None for a name that has been declared
// without a value, which is distinct from a name that was never set.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Variable {
    pub value: Option<String>,
    pub exported: bool,
}

#[derive(Default, Debug)]
pub struct State {
    variables: HashMap<String, Variable>,

    // Each builtin and each external command sets (resets) this.
    // A syntax error sets it too.
    rv: i32,
}

impl State {
    #[cfg(test)]
    pub fn new() -> Self {
        State::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables
            .get(name)
            .and_then(|var| var.value.as_deref())
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn set(&mut self, name: &str, value: Option<&str>, exported: bool) {
        let var = Variable {
            value: value.map(|v| v.to_string()),
            exported,
        };

        self.variables.insert(name.to_string(), var);
    }

    // Name/value pairs handed to the environment of external commands.
    // Declared-but-empty variables are skipped.
    pub fn exported(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().filter_map(|(name, var)| {
            match (&var.value, var.exported) {
                (Some(value), true) => Some((name.as_str(), value.as_str())),
                _ => None,
            }
        })
    }

    pub fn rv(&self) -> i32 {
        self.rv
    }

    pub fn set_rv(&mut self, rv: i32) {
        self.rv = rv;
    }

    pub fn reset(&mut self) {
        self.variables.clear();
        self.rv = 0;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn get_returns_latest_value() {
        let mut state = State::new();
        state.set("A", Some("1"), false);
        state.set("B", Some("x"), true);
        state.set("A", Some("2"), false);

        assert_eq!(state.get("A"), Some("2"));
        assert_eq!(state.get("B"), Some("x"));
    }

    #[test]
    fn missing_variable_is_absent() {
        let state = State::new();

        assert_eq!(state.get("NOPE"), None);
        assert_eq!(state.variable("NOPE"), None);
    }

    #[test]
    fn declared_variable_has_no_value() {
        let mut state = State::new();
        state.set("OLDPWD", None, true);

        assert_eq!(state.get("OLDPWD"), None);
        assert_eq!(
            state.variable("OLDPWD"),
            Some(&Variable {
                value: None,
                exported: true
            })
        );
    }

    #[test]
    fn only_exported_values_reach_the_environment() {
        let mut state = State::new();
        state.set("PWD", Some("/tmp"), true);
        state.set("LOCAL", Some("x"), false);
        state.set("OLDPWD", None, true);

        let exported: Vec<(&str, &str)> = state.exported().collect();

        assert_eq!(exported, vec![("PWD", "/tmp")]);
    }

    #[test]
    fn reset_clears_variables_and_rv() {
        let mut state = State::new();
        state.set("PWD", Some("/"), true);
        state.set_rv(42);

        state.reset();

        assert_eq!(state.get("PWD"), None);
        assert_eq!(state.variable("PWD"), None);
        assert_eq!(state.rv(), 0);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut once = State::new();
        once.set("X", Some("1"), false);
        once.set_rv(3);
        once.reset();

        let mut twice = State::new();
        twice.set("X", Some("1"), false);
        twice.set_rv(3);
        twice.reset();
        twice.reset();

        assert_eq!(once.get("X"), twice.get("X"));
        assert_eq!(once.rv(), twice.rv());
        assert_eq!(twice.exported().count(), 0);
    }
}
