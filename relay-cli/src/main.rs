//! Relay CLI
//!
//! Command-line interface for triggering builds on the build server and
//! following them to completion.

mod commands;
mod config;
mod watch;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::{Config, GlobalArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "relay")]
#[command(about = "Trigger remote builds and track them to completion", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_cli=info,relay_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_args(cli.global)?;

    if config.client.simulate {
        tracing::info!("Dry run: no requests will reach {}", config.client.base_url);
    }

    handle_command(cli.command, &config).await
}
