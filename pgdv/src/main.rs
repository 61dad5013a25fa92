//! pgdv - PostgreSQL data validator
//!
//! Loads a validation configuration, runs every check against every
//! configured database and prints the report. Exit status is 0 when all
//! checks pass, 1 when any check fails, 2 when the configuration cannot be
//! loaded.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use pgdv::output::{render_json, render_text, OutputFormat};
use pgdv::{PgConnector, RunCoordinator};
use pgdv_common::load_config;

const EXIT_CONFIG_ERROR: u8 = 2;

/// Command-line arguments for pgdv
#[derive(Parser, Debug)]
#[command(name = "pgdv")]
#[command(about = "Postgres Data Validator")]
#[command(version)]
struct Args {
    /// Path to validation config file (JSON, or TOML with a .toml extension)
    #[arg(short, long, env = "PGDV_CONFIG")]
    config: PathBuf,

    /// Report format written to stdout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr so a JSON report on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    info!("Starting {}", pgdv::build_info());

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let report = RunCoordinator::new(PgConnector).run(&config).await;

    match print_report(&report, args.format) {
        Ok(()) => ExitCode::from(report.exit_code()),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_report(report: &pgdv::Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(report)),
        OutputFormat::Json => {
            let rendered = render_json(report).context("Failed to serialize report")?;
            println!("{}", rendered);
        }
    }
    Ok(())
}
