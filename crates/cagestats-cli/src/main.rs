//! cagestats command-line interface.

mod commands;
mod scheduler;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cagestats::config::Config;

#[derive(Parser)]
#[command(name = "cagestats", version, about = "Ranked fighter statistics aggregator")]
struct Cli {
    /// Path to a TOML config file (default: ./cagestats.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one scrape now and publish the result.
    Scrape,
    /// Serve the most recently published rankings.
    Serve {
        /// Address to listen on.
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: SocketAddr,
    },
    /// Serve while scraping once a day at the configured UTC hour.
    Run {
        /// Address to listen on.
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Config::load(cli.config.as_deref())?.into_settings();

    match cli.command {
        Command::Scrape => commands::cmd_scrape(&settings).await,
        Command::Serve { listen } => commands::cmd_serve(settings, listen).await,
        Command::Run { listen } => commands::cmd_run(settings, listen).await,
    }
}
