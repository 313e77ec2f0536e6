//! Tracing subscriber: console output plus a per-command log file.
//!
//! Both sinks classify an event the same way ([`LineKind`]) and differ only
//! in decoration: the console gets colors, the file gets timestamps and
//! plain text.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::{Level, Metadata};

use super::logger::{DRY_RUN_TARGET, STAGE_TARGET};
use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// How a log line is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Stage,
    DryRun,
    Error,
    Warn,
    Info,
    Debug,
}

impl LineKind {
    fn of(metadata: &Metadata<'_>) -> Self {
        match (*metadata.level(), metadata.target()) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, STAGE_TARGET) => Self::Stage,
            (Level::INFO, DRY_RUN_TARGET) => Self::DryRun,
            (Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }

    fn console(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Self::DryRun => format!("  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
            Self::Error => format!("\x1b[31mERROR\x1b[0m {msg}"),
            Self::Warn => format!("\x1b[33mWARN\x1b[0m  {msg}"),
            Self::Info => format!("  {msg}"),
            Self::Debug => format!("  \x1b[2m{msg}\x1b[0m"),
        }
    }

    fn file(self, time: &str, msg: &str) -> String {
        let msg = strip_ansi(msg);
        match self {
            Self::Stage => format!("[{time}] ==> {msg}"),
            Self::DryRun => format!("[{time}]     [dry run] {msg}"),
            Self::Error => format!("[{time}]     [error] {msg}"),
            Self::Warn => format!("[{time}]     [warn] {msg}"),
            Self::Info => format!("[{time}]     {msg}"),
            Self::Debug => format!("[{time}]     [debug] {msg}"),
        }
    }
}

/// The `message` field of an event.
fn message(event: &tracing::Event<'_>) -> String {
    #[derive(Default)]
    struct Message(String);

    impl tracing::field::Visit for Message {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }

        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            if field.name() == "message" {
                self.0 = value.to_string();
            }
        }
    }

    let mut visitor = Message::default();
    event.record(&mut visitor);
    visitor.0
}

/// Appends every event to `<cache>/luet-pm-installer/<command>.log`.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Layer for `command`, or `None` if the cache directory is unusable.
    pub(super) fn new(command: &str) -> Option<Self> {
        Self::at(&log_file_path(command)?)
    }

    /// Start a fresh log at `path` with a header naming the version and time.
    pub(super) fn at(path: &Path) -> Option<Self> {
        let version = option_env!("LUET_PM_INSTALLER_VERSION")
            .unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let rule = "=".repeat(42);
        let header = format!(
            "{rule}\nluet-pm-installer {version} {}\n{rule}\n",
            format_utc_datetime()
        );
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let kind = LineKind::of(event.metadata());
        let line = kind.file(&format_utc_time(), &message(event));
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// Console rendering of events.
struct ConsoleFormat;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormat
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
        let kind = LineKind::of(event.metadata());
        writeln!(writer, "{}", kind.console(&message(event)))
    }
}

/// Install the global subscriber. Call once, before any logging.
///
/// Warnings and errors go to stderr, everything else to stdout. Debug lines
/// reach the console only with `verbose`, but always reach the log file.
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
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
