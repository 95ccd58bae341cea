//! Structured logger with summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{FAIL_TARGET, SKIP_TARGET, STAGE_TARGET, SUCCESS_TARGET};
use super::types::{Log, TaskEntry, TaskStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Logger that forwards every message to [`tracing`] and collects task
/// results for the run summary.
///
/// Console and file output are configured by
/// [`init_subscriber`](super::subscriber::init_subscriber); this type only
/// emits events.
#[derive(Debug)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`, remembering where its log file lives.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger that reports `log_file` in its summary.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Return a clone of all recorded task entries.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Report a unit that was created or updated.
    pub fn success(&self, msg: &str) {
        tracing::info!(target: SUCCESS_TARGET, "{msg}");
    }

    /// Report a unit that failed.
    pub fn fail(&self, msg: &str) {
        tracing::error!(target: FAIL_TARGET, "{msg}");
    }

    /// Report a unit that was already correct.
    pub fn skip(&self, msg: &str) {
        tracing::info!(target: SKIP_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Record a task result for the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed or cancelled tasks.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.tasks.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|t| matches!(t.status, TaskStatus::Failed | TaskStatus::Cancelled))
                .count()
        })
    }

    /// Print the summary of all recorded tasks.
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut ok = 0u32;
        let mut not_applicable = 0u32;
        let mut failed = 0u32;
        let mut cancelled = 0u32;

        for task in &tasks {
            let (icon, color) = match task.status {
                TaskStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                TaskStatus::NotApplicable => {
                    not_applicable += 1;
                    ("·", "\x1b[2m")
                }
                TaskStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
                TaskStatus::Cancelled => {
                    cancelled += 1;
                    ("○", "\x1b[33m")
                }
            };

            let suffix = task
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", task.name));
        }

        let total = ok + not_applicable + failed + cancelled;
        self.info(&format!(
            "{total} tasks: \x1b[32m{ok} ok\x1b[0m, \x1b[2m{not_applicable} n/a\x1b[0m, \x1b[31m{failed} failed\x1b[0m, \x1b[33m{cancelled} cancelled\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, success, fail, skip, info, debug, warn, error);

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.record_task(name, status, message);
    }
}
