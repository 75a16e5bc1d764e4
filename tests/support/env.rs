//! Environment and directory guards for configuration tests.
//!
//! Tests using these helpers mutate process-wide state and must be marked
//! `#[serial]`.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn set_var(key: &str, value: impl AsRef<std::ffi::OsStr>) {
    // SAFETY: callers are serialised with `#[serial]`.
    unsafe { env::set_var(key, value) };
}

/// RAII guard that restores captured environment variables on drop.
pub struct EnvGuard {
    entries: Vec<(OsString, Option<OsString>)>,
}

impl EnvGuard {
    /// Capture `keys`, removing them from the environment for the guard's
    /// lifetime.
    pub fn new(keys: &[&str]) -> Self {
        let entries = keys
            .iter()
            .map(|key| {
                let previous = env::var_os(key);
                // SAFETY: callers are serialised with `#[serial]`.
                unsafe { env::remove_var(key) };
                (OsString::from(key), previous)
            })
            .collect();
        Self { entries }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &mut self.entries {
            // SAFETY: callers are serialised with `#[serial]`.
            match value.take() {
                Some(val) => unsafe { env::set_var(&*key, val) },
                None => unsafe { env::remove_var(&*key) },
            }
        }
    }
}

/// RAII guard restoring the working directory on drop.
pub struct DirGuard {
    previous: PathBuf,
}

impl DirGuard {
    pub fn enter(path: impl AsRef<Path>) -> Self {
        let previous = env::current_dir().expect("current dir");
        env::set_current_dir(path.as_ref()).expect("set dir");
        Self { previous }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.previous);
    }
}

/// Write `content` to a temporary `.multiplex.toml` and point
/// `MULTIPLEX_CONFIG_PATH` at it.
///
/// Capture `MULTIPLEX_CONFIG_PATH` in an [`EnvGuard`] first so the variable
/// is removed once the guard drops.
pub fn setup_env_and_config(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create config dir");
    let path = dir.path().join(".multiplex.toml");
    fs::write(&path, content).expect("write config");
    set_var("MULTIPLEX_CONFIG_PATH", path.as_os_str());
    (dir, path)
}
