//! Typed error variants for resource operations.
//!
//! Every failure a link, template or command unit can hit is one of these.
//! The display strings are what users see under `error:` in the failure
//! report, so OS errors are carried verbatim.

use std::path::PathBuf;

use thiserror::Error;

use crate::template::TemplateError;

/// Errors that arise from resource checks and apply operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The link target does not exist.
    #[error("target path isn't exist")]
    TargetMissing,

    /// A regular file sits where the link should go.
    #[error("link file already exists")]
    LinkFileExists,

    /// A real directory sits where the link should go.
    #[error("link path is occupied")]
    LinkPathOccupied,

    /// Something that cannot be inspected sits where the link should go.
    #[error("link path exists")]
    LinkPathExists,

    /// The template or command input does not exist.
    #[error("input file doesn't exist")]
    InputMissing,

    /// A filesystem operation failed.
    #[error("unable to {action} {}: {source}", path.display())]
    Io {
        /// What was being attempted (e.g. `"create directory"`).
        action: &'static str,
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// A link target directory could not be listed for fan-out.
    #[error("unable to read directory {}: {source}", path.display())]
    DirectoryUnreadable {
        /// The directory that could not be read.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// The template or command line could not be rendered.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The shell could not be started.
    #[error("unable to start command: {0:#}")]
    Spawn(anyhow::Error),

    /// The command exited with a non-zero status.
    #[error("command failed ({}). output:\n{output}", exit_status(*.code))]
    CommandFailed {
        /// Exit code, `None` if killed by a signal.
        code: Option<i32>,
        /// Combined stdout and stderr.
        output: String,
    },

    /// The command succeeded but left no regular file at the output path.
    #[error("command didn't create file. output:\n{output}")]
    OutputNotCreated {
        /// Combined stdout and stderr.
        output: String,
    },
}

impl ResourceError {
    /// Wrap an I/O error with the action and path it came from.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

fn exit_status(code: Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_string(),
        |c| format!("exit status {c}"),
    )
}
