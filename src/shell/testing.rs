// Helpers for tests that touch process-wide state: the working
// directory, the environment, and the SIGINT disposition.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

static TEST_LOCK: Mutex<()> = Mutex::new(());

pub fn lock() -> MutexGuard<'static, ()> {
    TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

// Restores the working directory on drop.
pub struct CwdGuard {
    cwd: PathBuf,
}

impl CwdGuard {
    pub fn new() -> Self {
        CwdGuard {
            cwd: env::current_dir().unwrap(),
        }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.cwd);
    }
}

// Restores an environment variable on drop.
pub struct EnvGuard {
    key: &'static str,
    old: Option<OsString>,
}

impl EnvGuard {
    pub fn set(key: &'static str, value: &str) -> Self {
        let old = env::var_os(key);
        env::set_var(key, value);
        EnvGuard { key, old }
    }

    pub fn unset(key: &'static str) -> Self {
        let old = env::var_os(key);
        env::remove_var(key);
        EnvGuard { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.old {
            Some(value) => env::set_var(self.key, value),
            None => env::remove_var(self.key),
        }
    }
}
