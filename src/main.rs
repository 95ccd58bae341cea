//! `deploy-configs` binary: deploys one instance of the nearest config file.
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use deploy_configs::{cli, commands, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose, "deploy");
    let log = Arc::new(logging::Logger::new("deploy"));

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        log.warn(&format!("unable to install Ctrl-C handler: {e}"));
    }

    let result = commands::deploy::run(&args, Arc::clone(&log) as Arc<dyn logging::Log>, cancel);
    log.print_summary();

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
