//! Command task.
use super::{Context, Task, TaskStats, process_applicable};

/// Run the declared commands that generate output files.
#[derive(Debug)]
pub struct ExecuteCommands;

impl Task for ExecuteCommands {
    fn name(&self) -> &str {
        "Execute commands"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.plan.commands.is_empty()
    }

    fn run(&self, ctx: &Context) -> TaskStats {
        process_applicable(ctx, ctx.plan.commands.clone())
    }
}
