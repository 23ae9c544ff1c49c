//! Logging setup for `nuts-pop` using `tracing-subscriber`.
//!
//! # Log Levels
//!
//! - `error`: fatal errors
//! - `warn`: duplicate observations, regions without population
//! - `info`: stage progress, downloads, row counts
//! - `debug`: filter and writer details
//! - `trace`: everything else
//!
//! Only the workspace crates follow the configured level. Dependencies
//! (reqwest, polars, rusqlite) stay at `warn`.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const WORKSPACE_CRATES: [&str; 5] = [
    "nuts_cli",
    "nuts_ingest",
    "nuts_model",
    "nuts_output",
    "nuts_transform",
];

/// Logging settings derived from the command line.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level for the workspace crates.
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` replace the level-derived filter.
    pub use_env_filter: bool,
    pub with_timestamps: bool,
    /// Include the module path of each event.
    pub with_target: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-field human output.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
    /// One JSON object per event, including span close timings.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

/// Install the global subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let writer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };
    tracing_subscriber::registry()
        .with(build_env_filter(config))
        .with(format_layer(config, writer))
        .init();
    Ok(())
}

/// Formatting layer for the configured output format.
fn format_layer<S>(config: &LogConfig, writer: BoxMakeWriter) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target);
    match (config.format, config.with_timestamps) {
        (LogFormat::Json, _) => layer
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        (LogFormat::Compact, true) => layer.compact().with_ansi(config.with_ansi).boxed(),
        (LogFormat::Compact, false) => layer
            .compact()
            .with_ansi(config.with_ansi)
            .without_time()
            .boxed(),
        (LogFormat::Pretty, true) => layer.with_ansi(config.with_ansi).boxed(),
        (LogFormat::Pretty, false) => layer.with_ansi(config.with_ansi).without_time().boxed(),
    }
}

/// `warn` everywhere, `level` for the workspace crates.
fn default_directive(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    WORKSPACE_CRATES
        .iter()
        .fold(String::from("warn"), |directive, name| {
            format!("{directive},{name}={level}")
        })
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    let configured = || EnvFilter::new(default_directive(config.level_filter));
    if config.use_env_filter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| configured())
    } else {
        configured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(
            default_directive(LevelFilter::DEBUG),
            "warn,nuts_cli=debug,nuts_ingest=debug,nuts_model=debug,nuts_output=debug,nuts_transform=debug"
        );
        assert!(default_directive(LevelFilter::OFF).contains("nuts_model=off"));
    }

    #[test]
    fn test_json_events_reach_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = LogConfig {
            level_filter: LevelFilter::INFO,
            use_env_filter: false,
            format: LogFormat::Json,
            ..LogConfig::default()
        };
        let writer = BoxMakeWriter::new(Mutex::new(file.reopen().unwrap()));
        let subscriber = tracing_subscriber::registry()
            .with(build_env_filter(&config))
            .with(format_layer(&config, writer));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(regions = 3, "merged population into regions");
            tracing::debug!("filtered out");
        });

        let written = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 1, "{written}");
        assert!(lines[0].contains("\"regions\":3"));
        assert!(lines[0].contains("merged population into regions"));
    }
}
