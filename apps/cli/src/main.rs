//! # rocketcart
//!
//! Command-line front end for the cart.
//!
//! ```text
//! rocketcart [--config FILE] <show | add ID | remove ID | set ID AMOUNT | clear>
//!
//!   stdout: resulting cart as JSON
//!   stderr: logs, and { code, message, notice } on failure (exit 1)
//! ```

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use rocketcart_db::{Database, DbConfig, SqliteCartStore};
use rocketcart_engine::{EngineConfig, HttpInventory};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::Command;
use error::CliError;

/// RocketCart - manage the shopping cart from the terminal
#[derive(Debug, Parser)]
#[command(name = "rocketcart")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file path (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Logs go to stderr so stdout carries only JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rocketcart=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let report = e.report(cli.command.operation());
            match serde_json::to_string_pretty(&report) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}: {}", report.code, report.message),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let config = EngineConfig::load(cli.config.clone())?;
    debug!(?config, "Configuration loaded");

    let db = Database::new(DbConfig::new(config.database_path())).await?;
    let inventory = Arc::new(HttpInventory::new(&config.inventory)?);

    let cart = commands::controller(
        &config,
        inventory.clone(),
        inventory,
        Arc::new(SqliteCartStore::new(db.clone())),
    )
    .start()
    .await;

    let result = commands::run(&cli.command, &cart).await;

    if cart.shutdown().await.is_err() {
        debug!("Cart controller already stopped");
    }
    db.close().await;

    let output = result?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    info!(items = output.item_count, "Done");
    Ok(())
}
