pub mod commands;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use betastay_core::config::{AppConfig, LoadOptions, LogFormat};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(
    name = "betastay",
    about = "BetaStay pricing advisor CLI",
    long_about = "Price rental listings, inspect the holiday calendar and effective configuration, and run readiness checks.",
    after_help = "Examples:\n  betastay price --request request.json --table\n  betastay calendar --date 2026-10-01\n  betastay doctor --json"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a betastay.toml file (must exist when given)")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Compute the three price tiers for a pricing request JSON file")]
    Price {
        #[arg(long, help = "Pricing request JSON file")]
        request: PathBuf,
        #[arg(long, help = "Render the tier summary and factor breakdown table")]
        table: bool,
    },
    #[command(about = "Classify a date and list the holiday events derived for it")]
    Calendar {
        #[arg(long, help = "Target date in YYYY-MM-DD form")]
        date: NaiveDate,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, factor weights, tier offsets and the holiday calendar")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();
    init_logging(config_path);

    let result = match cli.command {
        Command::Price { request, table } => commands::price::run(&request, config_path, table),
        Command::Calendar { date } => commands::calendar::run(date, config_path),
        Command::Config => commands::config::run(config_path),
        Command::Doctor { json } => commands::CommandResult {
            exit_code: 0,
            output: commands::doctor::run(json, config_path),
        },
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout carries only command output. A config that
/// fails to load falls back to default logging; the command reports the error.
fn init_logging(config_path: Option<&Path>) {
    let options = LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        ..LoadOptions::default()
    };
    let logging = AppConfig::load(options).map(|config| config.logging).unwrap_or_default();
    let log_level = logging.level.parse::<Level>().unwrap_or(Level::INFO);

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Compact => subscriber.compact().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Json => subscriber.json().init(),
    }
}
