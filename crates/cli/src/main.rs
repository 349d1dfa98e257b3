//! Shop CLI - terminal client for the shop backend

mod commands;
mod config;
mod logging;
mod render;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use crate::commands::Commands;
use crate::config::CliConfig;
use shop_http::ClientError;
use std::path::PathBuf;
use tracing::{Level, debug, error};

#[derive(Parser)]
#[command(name = "shop")]
#[command(about = "Command line client for the shop backend")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "info")]
    log_level: LogLevel,

    /// Data directory for the session file and configuration
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<PathBuf>,

    /// Backend base URL (overrides configuration)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides configuration)
    #[arg(short = 't', long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.into())?;

    let data_dir = resolve_data_dir(cli.data_dir);
    let mut config = CliConfig::load(&data_dir)?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    debug!(?config, data_dir = %data_dir.display(), "Resolved configuration");

    match cli.command.execute(&config, &data_dir).await {
        Ok(()) => {
            debug!("Command completed successfully");
        }
        Err(e) => {
            let message = e
                .downcast_ref::<ClientError>()
                .map_or_else(|| format!("{e:#}"), |e| e.user_message("Operation failed"));
            error!("{message}");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// `--data-dir`, then `SHOP_STATE_DIR`, then the platform data directory
fn resolve_data_dir(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir.unwrap_or_else(|| {
        if let Ok(state_dir) = std::env::var("SHOP_STATE_DIR") {
            PathBuf::from(state_dir)
        } else {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("shop")
        }
    })
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}
