//! Command resource: run a shell command that must (re)create an output file.
use std::path::PathBuf;
use std::sync::Arc;

use super::fs::{self, PathStatus};
use super::{Applicable, ResourceChange, ResourceError, UnitKind};
use crate::exec::{Executor, SystemExecutor};
use crate::template;

/// Placeholder for the input path in a command line.
pub const INPUT_KEY: &str = "Input";
/// Placeholder for the output path in a command line.
pub const OUTPUT_KEY: &str = "Output";

/// A file generated from `input` by running `command`.
///
/// The output is removed before the command runs, so the command always
/// produces it from scratch.  If the command then fails the previous output
/// is gone; it is not restored.
#[derive(Clone)]
pub struct CommandResource {
    /// Unit name, used for ordering and reporting.
    pub name: String,
    /// File the command reads; must exist.
    pub input: PathBuf,
    /// File the command must create.
    pub output: PathBuf,
    /// Shell command line with `{{.Input}}` and `{{.Output}}` placeholders.
    pub command: String,
    executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for CommandResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandResource")
            .field("name", &self.name)
            .field("input", &self.input)
            .field("output", &self.output)
            .field("command", &self.command)
            .field("executor", &"<dyn Executor>")
            .finish()
    }
}

impl CommandResource {
    /// Create a command resource that runs through the system shell.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        input: PathBuf,
        output: PathBuf,
        command: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            input,
            output,
            command: command.into(),
            executor: Arc::new(SystemExecutor),
        }
    }

    /// Replace the executor (tests substitute a mock).
    #[must_use]
    pub fn with_executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = executor;
        self
    }

    /// The command line with placeholders substituted.
    ///
    /// # Errors
    ///
    /// Returns an error if the command references anything other than
    /// `Input` and `Output`, or is malformed.
    pub fn expanded_command(&self) -> Result<String, ResourceError> {
        let data = template::data_from_pairs([
            (INPUT_KEY, self.input.to_string_lossy()),
            (OUTPUT_KEY, self.output.to_string_lossy()),
        ]);
        Ok(template::render(&self.command, &data)?)
    }

    fn discard_output(&self) {
        if fs::classify(&self.output) != PathStatus::Absent {
            let _ = fs::remove_entry(&self.output);
        }
    }
}

impl Applicable for CommandResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> UnitKind {
        UnitKind::Command
    }

    fn description(&self) -> String {
        format!(
            "input: {:?}\noutput: {:?}\ncommand: {:?}",
            self.input, self.output, self.command
        )
    }

    fn apply(&self) -> Result<ResourceChange, ResourceError> {
        if fs::classify(&self.input) == PathStatus::Absent {
            return Err(ResourceError::InputMissing);
        }

        let previous = fs::content_hash(&self.output);

        if let Some(parent) = self.output.parent() {
            fs::ensure_directory(parent)
                .map_err(|e| ResourceError::io("create directory", parent, e))?;
        }

        if fs::classify(&self.output) != PathStatus::Absent {
            fs::remove_entry(&self.output)
                .map_err(|e| ResourceError::io("replace output path", &self.output, e))?;
        }

        let script = self.expanded_command()?;
        let result = match self.executor.run_shell(&script) {
            Ok(result) => result,
            Err(e) => {
                self.discard_output();
                return Err(ResourceError::Spawn(e));
            }
        };
        if !result.success {
            self.discard_output();
            return Err(ResourceError::CommandFailed {
                code: result.code,
                output: result.combined_output(),
            });
        }

        if fs::classify(&self.output) != PathStatus::RegularFile {
            return Err(ResourceError::OutputNotCreated {
                output: result.combined_output(),
            });
        }

        if fs::content_hash(&self.output) == previous {
            Ok(ResourceChange::AlreadyCorrect)
        } else {
            Ok(ResourceChange::Applied)
        }
    }
}
