//! rotary: a terminal phone companion.
//!
//! Browses recent calls and contacts, dials on a keypad, and hands numbers
//! to a configured dial handler, all gated by runtime permission grants.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::info;

use rotary::app::{self, App};
use rotary::config::RotaryConfig;
use rotary::demo;
use rotary::dialing::{CallInitiator, CommandDialer};
use rotary::logging;
use rotary::permissions::{GrantLedger, LedgerPermissions, PermissionGate};

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "rotary", version, about = "Terminal phone companion")]
struct Cli {
    /// Path to the config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run; the UI starts when none is given.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Run the terminal UI (default).
    Start,
    /// Seed the stores with demo calls and contacts.
    Seed {
        /// Also grant every permission, so the UI starts without prompting.
        #[arg(long)]
        grant_all: bool,
    },
    /// Print the resolved configuration paths.
    Paths,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Precedence: env vars > config file > defaults.
    let config = RotaryConfig::load_with_path(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command.unwrap_or(Command::Start) {
        Command::Start => start(config).await,
        Command::Seed { grant_all } => {
            logging::init_cli();
            demo::seed(&config, grant_all)
                .await
                .context("failed to seed demo stores")?;
            Ok(())
        }
        Command::Paths => {
            print_paths(&config);
            Ok(())
        }
    }
}

/// Wire up the permission stack and run the UI until it exits.
async fn start(config: RotaryConfig) -> Result<()> {
    // The UI owns the terminal, so logs go to files only.
    let log_dir = PathBuf::from(&config.paths.log_dir);
    let _logging_guard = logging::init_production(&log_dir, &config.logging.level)
        .context("failed to initialize logging")?;

    info!(version = env!("CARGO_PKG_VERSION"), "rotary starting");

    let ledger = GrantLedger::new(&config.paths.grant_ledger);
    let (prompts_tx, prompts_rx) = mpsc::unbounded_channel();
    let service = Arc::new(LedgerPermissions::new(ledger, prompts_tx));
    let gate = PermissionGate::new(service);

    let dialer = Arc::new(CommandDialer::new(config.dialer.handler.clone()));
    let initiator = CallInitiator::new(gate.clone(), dialer);

    let app = App::new(
        &config,
        gate,
        initiator,
        prompts_rx,
        tokio::runtime::Handle::current(),
    );

    // The loop blocks on terminal events; keep it off the async workers.
    tokio::task::spawn_blocking(move || app::run(app))
        .await
        .context("UI thread panicked")?
        .context("UI loop failed")?;

    info!("rotary shut down cleanly");
    Ok(())
}

/// Print the resolved paths, for checking a setup.
fn print_paths(config: &RotaryConfig) {
    println!("config file:  {}", RotaryConfig::config_path().display());
    println!("call log db:  {}", config.paths.call_log_db);
    println!("contacts db:  {}", config.paths.contacts_db);
    println!("grant ledger: {}", config.paths.grant_ledger);
    println!("log dir:      {}", config.paths.log_dir);
}
