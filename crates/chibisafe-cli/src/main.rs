//! chibisafe - a terminal client for self-hosted chibisafe servers.
//!
//! Log in once, then list uploads and albums, upload files and manage the
//! account from the command line.

mod app;
mod forms;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use chibisafe_core::Config;

/// Log file name prefix inside the configured log directory
const LOG_FILE_PREFIX: &str = "chibisafe.log";

#[derive(Parser, Debug)]
#[command(name = "chibisafe", version, about = "Client for self-hosted chibisafe servers")]
struct Cli {
    /// Server address, overriding config and CHIBISAFE_SERVER
    #[arg(long, global = true)]
    server: Option<String>,

    /// More log output (-v for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in to a server and remember the session
    Login {
        #[arg(long)]
        username: Option<String>,
    },
    /// Forget the saved session
    Logout,
    /// Show the saved session and whether the server still accepts it
    Status,
    /// Show the logged-in account
    Whoami,
    /// Change the account password (logs out afterwards)
    Passwd,
    /// List uploaded files
    Files {
        /// Fetch every file instead of one page
        #[arg(long)]
        all: bool,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Files per page (defaults to the configured page size)
        #[arg(long)]
        limit: Option<u32>,
    },
    /// List albums
    Albums,
    /// Upload a file
    Upload {
        path: PathBuf,
        /// The file holds base64 text rather than raw bytes
        #[arg(long)]
        base64: bool,
        /// Media type, guessed from the extension when omitted
        #[arg(long)]
        content_type: Option<String>,
    },
}

/// Initialize the tracing subscriber for logging.
/// The returned guard must live until exit so buffered file logs flush.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let default_level = if verbose > 0 { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let guard = init_tracing(cli.verbose, config.log_dir.as_deref());
    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }
    info!(command = ?cli.command, "chibisafe starting");

    let result = match App::new(config, cli.server) {
        Ok(mut app) => app.run(cli.command).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        drop(guard);
        std::process::exit(1);
    }

    Ok(())
}
