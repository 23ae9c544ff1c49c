//! CLI argument definitions for `nuts-pop`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use nuts_cli::logging::LogFormat;
use nuts_ingest::CachePolicy;
use nuts_model::{Crs, Resolution};

#[derive(Parser)]
#[command(
    name = "nuts-pop",
    version,
    about = "Join NUTS 3 boundaries with Eurostat population and write a GeoPackage",
    long_about = "Download NUTS 3 boundaries from GISCO and population on 1 January from \
                  Eurostat (demo_r_pjangrp3), keep one country, add a POP_<STAT_YEAR> \
                  column to every region and write the result as a single GeoPackage layer.\n\n\
                  Valid year combinations (schema year: stat years):\n  \
                  2013: 2014-2017\n  2016: 2018-2020\n  2021: 2021-2023\n  2024: 2024-2030"
)]
pub struct Cli {
    /// Two-letter country code, e.g. DE.
    #[arg(value_name = "COUNTRY")]
    pub country: String,

    /// NUTS boundary vintage: 2013, 2016, 2021 or 2024.
    #[arg(value_name = "SCHEMA_YEAR", allow_hyphen_values = true)]
    pub schema_year: String,

    /// Reference year of the population counts.
    #[arg(value_name = "STAT_YEAR", allow_hyphen_values = true)]
    pub stat_year: String,

    /// Destination GeoPackage file (overwritten).
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// GISCO generalisation scale: 01M, 03M, 10M, 20M or 60M.
    #[arg(long = "resolution", value_name = "SCALE", default_value = "20M")]
    pub resolution: Resolution,

    /// Coordinate reference system of the boundaries: EPSG 4326, 3035 or 3857.
    #[arg(long = "crs", value_name = "EPSG", default_value = "4326")]
    pub crs: Crs,

    /// Always download, ignoring and not updating the cache.
    #[arg(long = "no-cache")]
    pub no_cache: bool,

    /// Download again and replace the cached copies.
    #[arg(long = "refresh", conflicts_with = "no_cache")]
    pub refresh: bool,

    /// Age after which cached population tables are downloaded again.
    #[arg(long = "stats-max-age-hours", value_name = "HOURS", default_value_t = 168)]
    pub stats_max_age_hours: u64,

    /// Download cache directory (default: the user cache directory).
    #[arg(long = "cache-dir", value_name = "DIR", env = "NUTS_POP_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// HTTP request timeout in seconds.
    #[arg(long = "timeout-secs", value_name = "SECONDS", default_value_t = 300)]
    pub timeout_secs: u64,

    /// Run everything except writing the output file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Cache handling for the population table.
    pub fn statistics_cache_policy(&self) -> CachePolicy {
        if self.no_cache {
            CachePolicy::Bypass
        } else if self.refresh {
            CachePolicy::Refresh
        } else {
            CachePolicy::Reuse {
                max_age: Some(Duration::from_secs(self.stats_max_age_hours * 3600)),
            }
        }
    }

    /// `--log-level` if given, else the `-v`/`-q` count.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level
            .map_or_else(|| self.verbosity.tracing_level_filter(), LevelFilter::from)
    }

    /// True when the level was chosen on the command line, which then takes
    /// precedence over `RUST_LOG`.
    pub fn explicit_level(&self) -> bool {
        self.log_level.is_some() || self.verbosity.is_present()
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(value: LogLevelArg) -> Self {
        match value {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
