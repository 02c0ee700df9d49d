//! Vidlearn CLI entry point.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vidlearn::cli::{commands, Cli, Commands};
use vidlearn::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the key may come from the environment.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("vidlearn={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    match &cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host.clone(), *port, settings).await?;
        }

        Commands::Ping => {
            commands::run_ping(settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, config_path, settings)?;
        }
    }

    Ok(())
}
