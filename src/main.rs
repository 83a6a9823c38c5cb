// ABOUTME: Entry point for the known-hosts command line tool
// ABOUTME: Parses arguments, sets up logging, resolves the file location and dispatches commands

mod app;
mod commands;
mod config;
mod matcher;
mod ssh;
mod table;
mod tui;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap::error::ErrorKind;
use config::Config;
use ssh::{KnownHostsFile, StoreError};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "known-hosts")]
#[command(about = "Manage the entries of your SSH known_hosts file", long_about = None)]
#[command(version)]
struct Cli {
    /// known_hosts file to operate on (default: ~/.ssh/known_hosts)
    #[arg(short, long, global = true, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Configuration file (default: <config dir>/known-hosts/config.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// List all known hosts
    Ls,

    /// List the hosts whose name or address contains PATTERN
    Search { pattern: String },

    /// Remove every host whose name or address contains PATTERN
    Rm { pattern: String },

    /// Browse and delete hosts interactively
    Tui,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    };

    match run(command, cli.file, cli.config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(command: Commands, file: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    if let Commands::Search { pattern } | Commands::Rm { pattern } = &command {
        commands::validate_host(pattern)?;
    }

    let config = Config::load_or_default(config_path.as_deref());

    let Some(store) = resolve_store(file, &config)? else {
        tracing::debug!("No home directory, nothing to do");
        return Ok(());
    };

    if !store.exists() {
        tracing::debug!("{} does not exist, nothing to do", store.path().display());
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    match command {
        Commands::Ls => commands::list_hosts(&mut stdout, &store.load()?),
        Commands::Search { pattern } => {
            commands::search_hosts(&mut stdout, &store.load()?, &pattern)
        }
        Commands::Rm { pattern } => {
            commands::delete_hosts(&mut stdout, &store, &store.load()?, &pattern).map(|_| ())
        }
        Commands::Tui => {
            drop(stdout);
            tui::run(store, config.ui.tick_interval())
        }
    }
}

/// `--file`, then the configured path, then `~/.ssh/known_hosts`. `None`
/// means there is no home directory to look in.
fn resolve_store(file: Option<PathBuf>, config: &Config) -> Result<Option<KnownHostsFile>> {
    if let Some(path) = file {
        return Ok(Some(KnownHostsFile::new(path)));
    }

    let configured = match config.known_hosts_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!("{e:#}");
            return Ok(None);
        }
    };
    if let Some(path) = configured {
        return Ok(Some(KnownHostsFile::new(path)));
    }

    match KnownHostsFile::locate() {
        Ok(path) => Ok(Some(KnownHostsFile::new(path))),
        Err(StoreError::NoHomeDir) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
