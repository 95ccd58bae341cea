//! Named tasks that reconcile one unit kind each, run in a fixed order.
pub mod commands;
pub mod context;
pub mod links;
mod processing;
pub mod templates;

pub use context::Context;
pub use processing::{Planned, TaskStats, process_applicable, process_resources};

use crate::logging::TaskStatus;

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name, used as the stage header.
    fn name(&self) -> &str;

    /// Whether this task has anything to do for the current plan.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Reconcile every unit of this task's kind.
    ///
    /// Unit failures are reported through the log and counted in the
    /// returned stats; they never stop the remaining units.
    fn run(&self, ctx: &Context) -> TaskStats;
}

/// The tasks of a deploy run, in execution order.
#[must_use]
pub fn all_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(links::CreateLinks),
        Box::new(templates::MakeTemplates),
        Box::new(commands::ExecuteCommands),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// Returns `true` when no unit failed and none was cancelled.
pub fn execute(task: &dyn Task, ctx: &Context) -> bool {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (nothing declared)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return true;
    }

    ctx.log.stage(task.name());
    let stats = task.run(ctx);
    let summary = stats.summary();
    ctx.log.info(&summary);

    let status = if stats.failed > 0 {
        TaskStatus::Failed
    } else if stats.cancelled > 0 {
        TaskStatus::Cancelled
    } else {
        TaskStatus::Ok
    };
    let message = (status != TaskStatus::Ok).then_some(summary.as_str());
    ctx.log.record_task(task.name(), status, message);
    stats.is_success()
}

/// Run every task in order and fold the results.
///
/// Every task runs even after an earlier one failed.
pub fn run_all(ctx: &Context) -> bool {
    let mut success = true;
    for task in all_tasks() {
        success &= execute(task.as_ref(), ctx);
    }
    success
}
