//! Core logging types: task entries, status, and the [`Log`] trait.

/// Task execution result for summary reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntry {
    /// Human-readable task name.
    pub name: String,
    /// Final status of the task.
    pub status: TaskStatus,
    /// Optional detail message (e.g. unit counts or the failure count).
    pub message: Option<String>,
}

/// Status of a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Every unit was applied or already correct.
    Ok,
    /// The task had no units to process.
    NotApplicable,
    /// At least one unit failed.
    Failed,
    /// The run was interrupted before every unit was processed.
    Cancelled,
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) forwards to `tracing` for console and
/// file output; [`MemoryLog`](super::memory::MemoryLog) records events for
/// callers that inspect the report programmatically.  Unit outcomes go
/// through [`success`](Self::success), [`fail`](Self::fail) and
/// [`skip`](Self::skip), exactly one call per unit.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Report a unit that was created or updated.
    fn success(&self, msg: &str);
    /// Report a unit that failed.
    fn fail(&self, msg: &str);
    /// Report a unit that was already correct.
    fn skip(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error that is not tied to a single unit.
    fn error(&self, msg: &str);
    /// Record a task result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
