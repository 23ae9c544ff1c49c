//! `nuts-pop`: NUTS 3 population layer builder.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};

use nuts_cli::logging::{LogConfig, init_logging};
use nuts_cli::pipeline::run_pipeline;
use nuts_cli::types::{RunRequest, RunResult, RunSettings};
use nuts_ingest::{Downloader, EurostatProvider, GiscoProvider, HttpOptions};

mod cli;
mod summary;

use crate::cli::Cli;
use crate::summary::print_summary;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: cannot set up logging: {error}");
        return ExitCode::FAILURE;
    }
    match run(&cli) {
        Ok(result) => {
            print_summary(&result);
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<RunResult> {
    let request = RunRequest {
        country: cli.country.clone(),
        schema_year: cli.schema_year.clone(),
        stat_year: cli.stat_year.clone(),
        output: cli.output.clone(),
        settings: RunSettings {
            resolution: cli.resolution,
            crs: cli.crs,
            cache_enabled: !cli.no_cache,
            dry_run: cli.dry_run,
        },
    };

    let http_options = HttpOptions {
        timeout: cli.timeout(),
        cache_dir: if cli.no_cache { None } else { cache_dir(cli) },
    };
    let downloader = Downloader::new(&http_options).context("failed to set up downloads")?;
    let geometry = GiscoProvider::new(downloader.clone()).with_refresh(cli.refresh);
    let statistics =
        EurostatProvider::new(downloader).with_cache_policy(cli.statistics_cache_policy());

    run_pipeline(&request, &geometry, &statistics)
}

/// `--cache-dir`, else the platform cache directory.
fn cache_dir(cli: &Cli) -> Option<PathBuf> {
    cli.cache_dir.clone().or_else(|| {
        directories::ProjectDirs::from("eu", "nuts-pop", "nuts-pop")
            .map(|dirs| dirs.cache_dir().to_path_buf())
    })
}

/// Logging settings from the command line. ANSI output only goes to a
/// terminal unless forced with `--color`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let with_ansi = match cli.color.color {
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
        choice => choice == ColorChoice::Always,
    };
    LogConfig {
        level_filter: cli.level_filter(),
        use_env_filter: !cli.explicit_level(),
        with_ansi,
        format: cli.log_format.into(),
        log_file: cli.log_file.clone(),
        ..LogConfig::default()
    }
}
