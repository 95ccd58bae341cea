//! The deploy command: load the config, build the plan and run every task.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::cli::Cli;
use crate::config::{self, Config, DeployPlan, PathExpander};
use crate::logging::Log;
use crate::resources::fs::normalize_lexically;
use crate::tasks::{self, Context};

/// Run the deploy command.
///
/// Returns `Ok(true)` when every unit was applied or already correct and
/// `Ok(false)` when at least one unit failed or the run was cancelled.
///
/// # Errors
///
/// Returns an error if the working directory is unusable or the config
/// cannot be found, parsed, validated or expanded.  No unit runs in that
/// case.
pub fn run(opts: &Cli, log: Arc<dyn Log>, cancel: Arc<AtomicBool>) -> Result<bool> {
    let cwd = resolve_directory(opts.directory.as_deref())?;
    log.debug(&format!("deploy-configs {}", crate::VERSION));
    log.debug(&format!("working directory: {}", cwd.display()));

    log.stage("Loading configuration");
    let path = match &opts.config {
        Some(path) => normalize_lexically(&cwd.join(path)),
        None => config::discover(&cwd).context("searching for config file")?,
    };
    log.info(&format!("config: {}", path.display()));

    let config = Config::load(&path, &opts.instance).with_context(|| format!("loading {}", path.display()))?;
    let expander = PathExpander::detect(&cwd, log.as_ref());
    let plan = DeployPlan::from_config(&config, &expander, &cwd).context("expanding config paths")?;
    log.info(&format!(
        "instance {:?}: {} links, {} templates, {} commands",
        opts.instance,
        plan.links.len(),
        plan.templates.len(),
        plan.commands.len()
    ));

    let ctx = Context::new(Arc::new(plan), log, cancel);
    Ok(tasks::run_all(&ctx))
}

/// The directory to work from: `directory` resolved against the current
/// directory, or the current directory itself.
fn resolve_directory(directory: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("reading current directory")?;
    let dir = directory.map_or_else(|| cwd.clone(), |dir| cwd.join(dir));
    dunce::canonicalize(&dir).with_context(|| format!("opening directory {}", dir.display()))
}
