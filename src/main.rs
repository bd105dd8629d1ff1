mod commands;
mod render;

use std::process::ExitCode;

use agenda_core::AgendaError;
use agenda_core::config::AgendaConfig;
use agenda_core::service::Agenda;
use agenda_core::store::FileStore;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::activity::ActivityCommand;
use commands::catalog::CatalogCommand;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Schedule and publish recurring community activities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dates of a recurring series
    Dates {
        /// First date (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// daily, weekly, monthly or annually
        #[arg(short, long)]
        frequency: String,

        /// Last possible date (YYYY-MM-DD)
        #[arg(short, long)]
        end: String,

        /// Print a JSON array instead of one date per line
        #[arg(long)]
        json: bool,
    },
    /// Manage activities
    #[command(subcommand)]
    Activity(ActivityCommand),
    /// Manage categories
    #[command(subcommand)]
    Category(CatalogCommand),
    /// Manage locations
    #[command(subcommand)]
    Location(CatalogCommand),
    /// Create the default categories and locations
    Seed,
    /// Show configuration paths and settings
    Config,
}

/// Exit status for rejected input (bad rule, date, payload, permissions).
const EXIT_REJECTED: u8 = 2;

const DEFAULT_LOG_LEVEL: &str = "warn";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            match e.downcast_ref::<AgendaError>() {
                Some(err) if err.is_client_error() => ExitCode::from(EXIT_REJECTED),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run() -> Result<()> {
    dispatch(Cli::parse().command, load_config)
}

/// Run `command`, calling `load_config` only for commands that need it.
fn dispatch(command: Commands, load_config: impl FnOnce() -> Result<AgendaConfig>) -> Result<()> {
    match command {
        // Pure computation; never reads or creates the config file.
        Commands::Dates {
            start,
            frequency,
            end,
            json,
        } => {
            init_tracing(DEFAULT_LOG_LEVEL);
            commands::dates::run(&start, &frequency, &end, json)
        }
        Commands::Config => commands::config::run(&load_config()?),
        Commands::Activity(command) => {
            let config = load_config()?;
            let agenda = open_agenda(&config)?;
            commands::activity::run(&agenda, &config.user(), command)
        }
        Commands::Category(command) => {
            let config = load_config()?;
            let agenda = open_agenda(&config)?;
            commands::catalog::run_categories(&agenda, &config.user(), command)
        }
        Commands::Location(command) => {
            let config = load_config()?;
            let agenda = open_agenda(&config)?;
            commands::catalog::run_locations(&agenda, &config.user(), command)
        }
        Commands::Seed => {
            let config = load_config()?;
            let agenda = open_agenda(&config)?;
            commands::seed::run(&agenda, &config.user())
        }
    }
}

fn load_config() -> Result<AgendaConfig> {
    let config = AgendaConfig::load().context("Could not load configuration")?;
    init_tracing(&config.log_level);
    Ok(config)
}

fn open_agenda(config: &AgendaConfig) -> Result<Agenda<FileStore>> {
    let data_path = config.data_path();
    tracing::debug!(path = %data_path.display(), "opening data directory");
    let store = FileStore::open(&data_path)
        .with_context(|| format!("Could not open data directory {}", data_path.display()))?;
    Ok(Agenda::from_config(store, config))
}

/// RUST_LOG wins over the configured level; logs go to stderr. Only the
/// first call installs a subscriber.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
