//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

pub(super) const STAGE_TARGET: &str = "deploy_configs::stage";
pub(super) const SUCCESS_TARGET: &str = "deploy_configs::success";
pub(super) const FAIL_TARGET: &str = "deploy_configs::fail";
pub(super) const SKIP_TARGET: &str = "deploy_configs::skip";

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// A [`tracing_subscriber::Layer`] that appends all events to the persistent
/// log file with timestamps and ANSI codes stripped.
///
/// Always captures events at `DEBUG` level and above regardless of the
/// console verbosity setting.
#[derive(Debug)]
pub struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate `path`, write a run header, and return a layer appending to it.
    ///
    /// Returns `None` if the file cannot be written.
    #[must_use]
    pub fn new(path: &Path) -> Option<Self> {
        let version = crate::VERSION;
        let header = format!(
            "==========================================\n\
             deploy-configs {version} {}\n\
             ==========================================\n",
            format_utc_datetime(),
        );
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }

    /// Open the log file for `command` in the cache directory.
    #[must_use]
    pub fn for_command(command: &str) -> Option<Self> {
        Self::new(&log_file_path(command)?)
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let level = *metadata.level();
        let target = metadata.target();

        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let msg = strip_ansi(&extractor.message);
        let ts = format_utc_time();

        let line = match (level, target) {
            (tracing::Level::INFO, STAGE_TARGET) => format!("[{ts}] ==> {msg}"),
            (tracing::Level::INFO, SUCCESS_TARGET) => format!("[{ts}]     [ok] {msg}"),
            (tracing::Level::INFO, SKIP_TARGET) => format!("[{ts}]     [skip] {msg}"),
            (tracing::Level::ERROR, FAIL_TARGET) => format!("[{ts}]     [fail] {msg}"),
            (tracing::Level::ERROR, _) => format!("[{ts}]     [error] {msg}"),
            (tracing::Level::WARN, _) => format!("[{ts}]     [warn] {msg}"),
            (tracing::Level::DEBUG, _) => format!("[{ts}]     [debug] {msg}"),
            _ => format!("[{ts}]     {msg}"),
        };

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that colors unit outcomes.
struct DeployFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for DeployFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let level = *metadata.level();
        let target = metadata.target();

        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let msg = &extractor.message;

        match level {
            tracing::Level::ERROR if target == FAIL_TARGET => {
                writeln!(writer, "\x1b[31m{msg}\x1b[0m")
            }
            tracing::Level::ERROR => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
            tracing::Level::WARN => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            tracing::Level::INFO if target == STAGE_TARGET => {
                writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m")
            }
            tracing::Level::INFO if target == SUCCESS_TARGET => {
                writeln!(writer, "\x1b[32m{msg}\x1b[0m")
            }
            tracing::Level::INFO if target == SKIP_TARGET => {
                writeln!(writer, "\x1b[2m{msg}\x1b[0m")
            }
            tracing::Level::INFO => writeln!(writer, "  {msg}"),
            _ => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Sets up a console subscriber (warnings and failures to stderr, the rest
/// to stdout) and a file subscriber that writes all events, including
/// `debug`, to `$XDG_CACHE_HOME/deploy-configs/<command>.log`.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let console_layer = fmt::layer()
        .event_format(DeployFormatter)
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = FileLayer::for_command(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
