//! Expansion of `{{.GitRoot}}` and `{{.Home}}` in config paths.
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

use crate::logging::Log;
use crate::resources::fs::{PathStatus, find_entry_ascending};
use crate::template::{self, TemplateError};

/// Key for the root of the enclosing git work tree.
pub const GIT_ROOT_KEY: &str = "GitRoot";
/// Key for the user's home directory.
pub const HOME_KEY: &str = "Home";

/// Renders path templates against the detected directory keys.
///
/// Keys that could not be detected are simply absent, so a path that
/// references one fails to expand instead of silently becoming empty.
#[derive(Debug, Clone, Default)]
pub struct PathExpander {
    data: Mapping,
}

impl PathExpander {
    /// Detect `GitRoot` (searching upward from `cwd`) and `Home`.
    ///
    /// Each key that cannot be detected produces a warning.
    #[must_use]
    pub fn detect(cwd: &Path, log: &dyn Log) -> Self {
        let mut expander = Self::default();

        match git_root(cwd) {
            Some(root) => {
                log.debug(&format!("path-expander: {GIT_ROOT_KEY}: {}", root.display()));
                expander = expander.with_value(GIT_ROOT_KEY, root.to_string_lossy());
            }
            None => log.warn(&format!("path-expander: unable to detect {GIT_ROOT_KEY}")),
        }

        match dirs::home_dir() {
            Some(home) => {
                log.debug(&format!("path-expander: {HOME_KEY}: {}", home.display()));
                expander = expander.with_value(HOME_KEY, home.to_string_lossy());
            }
            None => log.warn(&format!("path-expander: unable to detect {HOME_KEY}")),
        }

        expander
    }

    /// Set `key` to `value`, replacing any detected value.
    #[must_use]
    pub fn with_value(mut self, key: &str, value: impl Into<String>) -> Self {
        self.data
            .insert(Value::String(key.to_string()), Value::String(value.into()));
        self
    }

    /// The value of `key`, if known.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// Expand the placeholders in `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] if `path` references an unknown key or is
    /// malformed.
    pub fn expand(&self, path: &str) -> Result<String, TemplateError> {
        template::render(path, &self.data)
    }
}

/// The directory containing the nearest `.git` directory at or above `cwd`.
#[must_use]
pub fn git_root(cwd: &Path) -> Option<PathBuf> {
    find_entry_ascending(cwd, ".git", &[PathStatus::Directory])
        .and_then(|git| git.parent().map(Path::to_path_buf))
}
