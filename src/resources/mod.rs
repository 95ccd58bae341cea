//! Idempotent resource primitives (check + apply pattern).
//!
//! Each declared unit becomes one resource: a [`symlink::SymlinkResource`],
//! a [`template::TemplateResource`] or a [`command::CommandResource`].  A
//! resource knows how to describe itself for the run report and how to bring
//! the filesystem to its desired state with at most one mutation.
pub mod command;
pub mod error;
pub mod fs;
pub mod symlink;
pub mod template;

pub use error::ResourceError;

/// Minimal interface for resources that can be described and applied.
///
/// Resources whose state only becomes known while applying (a template must
/// be rendered, a command must run) implement only this trait and report
/// [`ResourceChange::AlreadyCorrect`] from [`apply`](Self::apply) when
/// nothing changed.  Resources that can determine their own state up front
/// implement the richer [`Resource`] super-trait.
pub trait Applicable {
    /// Unit name as declared in the config (`name/entry` after fan-out).
    fn name(&self) -> &str;

    /// Which kind of unit this is; selects the report wording.
    fn kind(&self) -> UnitKind;

    /// Detail lines for the run report, one `key: "value"` per line.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// # Errors
    ///
    /// Returns a [`ResourceError`] describing the precondition, I/O, render
    /// or subprocess failure.  The filesystem is left as the failing step
    /// found it.
    fn apply(&self) -> Result<ResourceChange, ResourceError>;
}

/// State of a resource as observed right now.
///
/// # Examples
///
/// ```
/// use deploy_configs::resources::{ResourceError, ResourceState};
///
/// let missing = ResourceState::Missing;
/// let wrong = ResourceState::Incorrect { current: "/other/path".into() };
/// let blocked = ResourceState::Invalid(ResourceError::LinkPathOccupied);
///
/// assert!(missing.needs_change());
/// assert!(wrong.needs_change());
/// assert!(!blocked.needs_change());
/// ```
#[derive(Debug)]
pub enum ResourceState {
    /// Resource does not exist or is not present.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// The current value of the resource.
        current: String,
    },
    /// Resource cannot be applied without destroying something it does not own.
    Invalid(ResourceError),
}

impl ResourceState {
    /// Whether applying the resource would change anything.
    #[must_use]
    pub const fn needs_change(&self) -> bool {
        matches!(self, Self::Missing | Self::Incorrect { .. })
    }
}

/// Result of applying a resource change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
}

/// Unified interface for resources that can be checked and applied.
///
/// Extends [`Applicable`] with a side-effect free state check, so the caller
/// can skip or refuse a unit before anything is touched.
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    fn current_state(&self) -> ResourceState;
}

/// The three kinds of declared unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// A symbolic link.
    Link,
    /// A rendered template.
    Template,
    /// A file generated by a shell command.
    Command,
}

impl UnitKind {
    /// Headline for a unit that was created or updated.
    #[must_use]
    pub fn applied(self, name: &str) -> String {
        match self {
            Self::Link => format!("Link {name:?} created:"),
            Self::Template => format!("Template {name:?} expanded:"),
            Self::Command => format!("Command {name:?} is executed:"),
        }
    }

    /// Headline for a unit that failed.
    #[must_use]
    pub fn failed(self, name: &str) -> String {
        match self {
            Self::Link => format!("Unable to create {name:?} link:"),
            Self::Template => format!("Unable to expand {name:?} template:"),
            Self::Command => format!("Unable to execute {name:?} command:"),
        }
    }

    /// Message for a unit that was already correct.
    #[must_use]
    pub fn skipped(self, name: &str) -> String {
        format!("{self} {name:?} is skipped")
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Link => "Link",
            Self::Template => "Template",
            Self::Command => "Command",
        };
        f.write_str(s)
    }
}

/// Indent every non-empty line of `text` by `level` steps of two spaces.
#[must_use]
pub fn indent(text: &str, level: usize) -> String {
    let pad = "  ".repeat(level);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Report text for a unit that was created or updated.
#[must_use]
pub fn applied_message(resource: &dyn Applicable) -> String {
    format!(
        "{}\n{}",
        resource.kind().applied(resource.name()),
        indent(&resource.description(), 1)
    )
}

/// Report text for a unit that failed with `error`.
#[must_use]
pub fn failed_message(resource: &dyn Applicable, error: &ResourceError) -> String {
    format!(
        "{}\n{}\n{}",
        resource.kind().failed(resource.name()),
        indent(&resource.description(), 1),
        indent(&format!("error: {error}"), 2)
    )
}

/// Report text for a unit that was already correct.
#[must_use]
pub fn skipped_message(resource: &dyn Applicable) -> String {
    resource.kind().skipped(resource.name())
}
