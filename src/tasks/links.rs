//! Link task.
use super::{Context, Planned, Task, TaskStats, process_resources};
use crate::resources::symlink::SymlinkResource;

/// Create the declared symlinks, fanning out directory targets.
#[derive(Debug)]
pub struct CreateLinks;

impl Task for CreateLinks {
    fn name(&self) -> &str {
        "Create links"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.plan.links.is_empty()
    }

    fn run(&self, ctx: &Context) -> TaskStats {
        let units = ctx.plan.links.iter().cloned().flat_map(plan_link).collect();
        process_resources(ctx, units)
    }
}

/// Expand one declared link into the units to process.
///
/// A directory that cannot be listed becomes a single failed unit carrying
/// the declared name.
fn plan_link(unit: SymlinkResource) -> Vec<Planned<SymlinkResource>> {
    match unit.clone().fan_out() {
        Ok(units) => units.into_iter().map(Planned::Ready).collect(),
        Err(error) => vec![Planned::Failed {
            resource: unit,
            error,
        }],
    }
}
