//! Shared state handed to every task.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::DeployPlan;
use crate::logging::Log;

/// Shared context for task execution.
pub struct Context {
    /// The units of this run, fixed before any task starts.
    pub plan: Arc<DeployPlan>,
    /// Logger for unit outcomes and task recording.
    pub log: Arc<dyn Log>,
    /// Set when the user interrupts the run; checked between units.
    pub cancel: Arc<AtomicBool>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("plan", &self.plan)
            .field("log", &"<dyn Log>")
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl Context {
    /// Creates a new context for task execution.
    #[must_use]
    pub const fn new(plan: Arc<DeployPlan>, log: Arc<dyn Log>, cancel: Arc<AtomicBool>) -> Self {
        Self { plan, log, cancel }
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}
