//! Command-line arguments.
use clap::Parser;
use std::path::PathBuf;

/// Deploy configuration files: links, templates and generated files.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "deploy-configs",
    about = "Deploy links, templates and command outputs declared in deploy-configs.yml",
    version
)]
pub struct Cli {
    /// Instance to deploy, as named under `instances:` in the config
    pub instance: String,

    /// Config file to use instead of searching for deploy-configs.yml
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory to start the config and git root search from
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
