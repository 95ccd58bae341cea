//! Template task.
use super::{Context, Task, TaskStats, process_applicable};

/// Render the declared templates, writing only outputs whose content changed.
#[derive(Debug)]
pub struct MakeTemplates;

impl Task for MakeTemplates {
    fn name(&self) -> &str {
        "Make templates"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.plan.templates.is_empty()
    }

    fn run(&self, ctx: &Context) -> TaskStats {
        process_applicable(ctx, ctx.plan.templates.clone())
    }
}
