//! In-memory log backend for callers that inspect the report programmatically.
use std::sync::Mutex;

use super::types::{Log, TaskEntry, TaskStatus};

/// Kind of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Stage header.
    Stage,
    /// Unit created or updated.
    Success,
    /// Unit failed.
    Fail,
    /// Unit already correct.
    Skip,
    /// Informational message.
    Info,
    /// Warning.
    Warn,
    /// Debug detail.
    Debug,
    /// Error not tied to a unit.
    Error,
}

/// A single recorded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// What kind of message this was.
    pub level: LogLevel,
    /// The message text, exactly as emitted.
    pub message: String,
}

/// Implement the display methods of [`Log`] by appending a [`LogEvent`] of
/// the matching level.
macro_rules! record_log_methods {
    ($($method:ident => $level:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.push(LogLevel::$level, msg);
            }
        )+
    };
}

/// Log that keeps every event in order instead of printing it.
#[derive(Debug, Default)]
pub struct MemoryLog {
    events: Mutex<Vec<LogEvent>>,
    tasks: Mutex<Vec<TaskEntry>>,
}

impl MemoryLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: LogLevel, msg: &str) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(LogEvent {
                level,
                message: msg.to_string(),
            });
        }
    }

    /// All events recorded so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Messages recorded at `level`, oldest first.
    #[must_use]
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }

    /// Whether any message at `level` contains `needle`.
    #[must_use]
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.messages(level).iter().any(|m| m.contains(needle))
    }

    /// Task results recorded so far.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }
}

impl Log for MemoryLog {
    record_log_methods!(
        stage => Stage,
        success => Success,
        fail => Fail,
        skip => Skip,
        info => Info,
        debug => Debug,
        warn => Warn,
        error => Error,
    );

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }
}
