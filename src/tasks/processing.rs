//! Generic unit processing loop: sort, check state, apply, report, count.
use super::context::Context;
use crate::resources::{
    Applicable, Resource, ResourceChange, ResourceError, ResourceState, applied_message,
    failed_message, skipped_message,
};

/// A unit ready to process, or one that already failed while being planned
/// (for example a link directory that could not be listed).
#[derive(Debug)]
pub enum Planned<R> {
    /// Process this unit normally.
    Ready(R),
    /// Report `error` for this unit without touching the filesystem.
    Failed {
        /// The unit as declared.
        resource: R,
        /// Why it could not be planned.
        error: ResourceError,
    },
}

impl<R> Planned<R> {
    /// The unit, whatever its planning outcome.
    pub const fn resource(&self) -> &R {
        match self {
            Self::Ready(resource) | Self::Failed { resource, .. } => resource,
        }
    }
}

/// Counters for one task's units.
///
/// # Examples
///
/// ```
/// use deploy_configs::tasks::TaskStats;
///
/// let stats = TaskStats { applied: 3, already_ok: 10, ..TaskStats::default() };
/// assert_eq!(stats.summary(), "3 applied, 10 already ok");
/// assert!(stats.is_success());
/// ```
///
/// Failures and cancellations are only mentioned when present:
///
/// ```
/// use deploy_configs::tasks::TaskStats;
///
/// let stats = TaskStats { applied: 1, already_ok: 2, failed: 1, cancelled: 4 };
/// assert_eq!(stats.summary(), "1 applied, 2 already ok, 1 failed, 4 cancelled");
/// assert!(!stats.is_success());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Units created or updated.
    pub applied: u32,
    /// Units that were already correct.
    pub already_ok: u32,
    /// Units that failed.
    pub failed: u32,
    /// Units not processed because the run was interrupted.
    pub cancelled: u32,
}

impl TaskStats {
    /// Format the summary string (e.g. "3 applied, 10 already ok, 1 failed").
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!("{} applied, {} already ok", self.applied, self.already_ok);
        if self.failed > 0 {
            out.push_str(&format!(", {} failed", self.failed));
        }
        if self.cancelled > 0 {
            out.push_str(&format!(", {} cancelled", self.cancelled));
        }
        out
    }

    /// Whether every unit was applied or already correct.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0 && self.cancelled == 0
    }
}

impl std::ops::AddAssign for TaskStats {
    fn add_assign(&mut self, other: Self) {
        self.applied += other.applied;
        self.already_ok += other.already_ok;
        self.failed += other.failed;
        self.cancelled += other.cancelled;
    }
}

/// Process units that can report their state before applying.
///
/// `Correct` units are skipped and `Invalid` units fail without any
/// mutation; everything else is applied.
pub fn process_resources<R: Resource>(ctx: &Context, units: Vec<Planned<R>>) -> TaskStats {
    run_sorted(ctx, units, |ctx, resource| {
        let state = resource.current_state();
        ctx.log
            .debug(&format!("{} {:?}: {state:?}", resource.kind(), resource.name()));
        match state {
            ResourceState::Correct => Ok(ResourceChange::AlreadyCorrect),
            ResourceState::Invalid(error) => Err(error),
            ResourceState::Missing | ResourceState::Incorrect { .. } => resource.apply(),
        }
    })
}

/// Process units whose state is only known while applying.
pub fn process_applicable<R: Applicable>(ctx: &Context, units: Vec<R>) -> TaskStats {
    let units = units.into_iter().map(Planned::Ready).collect();
    run_sorted(ctx, units, |_, resource| resource.apply())
}

/// Sort `units` by name and run `step` on each in turn, reporting every
/// outcome.  Cancellation is checked before each unit, never during one.
fn run_sorted<R: Applicable>(
    ctx: &Context,
    mut units: Vec<Planned<R>>,
    step: impl Fn(&Context, &R) -> Result<ResourceChange, ResourceError>,
) -> TaskStats {
    units.sort_by(|a, b| a.resource().name().cmp(b.resource().name()));

    let mut stats = TaskStats::default();
    for unit in units {
        if ctx.is_cancelled() {
            ctx.log
                .debug(&format!("cancelled before {:?}", unit.resource().name()));
            stats.cancelled += 1;
            continue;
        }
        let (resource, outcome) = match unit {
            Planned::Ready(resource) => {
                let outcome = step(ctx, &resource);
                (resource, outcome)
            }
            Planned::Failed { resource, error } => (resource, Err(error)),
        };
        stats += report(ctx, &resource, outcome);
    }
    stats
}

/// Report one unit outcome, returning its stats delta.
fn report<R: Applicable>(
    ctx: &Context,
    resource: &R,
    outcome: Result<ResourceChange, ResourceError>,
) -> TaskStats {
    let mut delta = TaskStats::default();
    match outcome {
        Ok(ResourceChange::Applied) => {
            ctx.log.success(&applied_message(resource));
            delta.applied += 1;
        }
        Ok(ResourceChange::AlreadyCorrect) => {
            ctx.log.skip(&skipped_message(resource));
            delta.already_ok += 1;
        }
        Err(error) => {
            ctx.log.fail(&failed_message(resource, &error));
            delta.failed += 1;
        }
    }
    delta
}
