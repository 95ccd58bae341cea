//! Dotfile deployment engine.
//!
//! Reads a per-instance YAML declaration of symlinks, templates and
//! generated files, then reconciles the filesystem with it: every unit is
//! skipped when already correct, applied with a single mutation otherwise,
//! or reported as failed without touching anything it does not own.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: discover, parse and validate `deploy-configs.yml`
//! - **[`resources`]**: idempotent `check + apply` primitives (links, templates, commands)
//! - **[`tasks`]**: one task per unit kind, run in a fixed order over sorted units
//! - **[`commands`]**: top-level orchestration used by the binary
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod resources;
pub mod tasks;
pub mod template;

/// Version string embedded at build time, falling back to the crate version.
pub const VERSION: &str = match option_env!("DEPLOY_CONFIGS_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
