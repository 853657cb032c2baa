//! thermograph entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use dotenv::dotenv;
use thermograph::config::json_logs;
use thermograph::{Cli, Dispatcher, Settings};
use thermograph_shared::{ConsoleLogger, Logger};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Diagnostics go to stderr; stdout carries only status lines and rows.
fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("thermograph=warn,influx_gateway=warn,neo4j_gateway=warn")
    });

    if json_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();
    let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger::new());
    let dispatcher = Dispatcher::new(Settings::from_env(), logger.clone());

    match dispatcher.run(cli.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!(error = %e, "Command failed");
            logger.error(&e.to_string());
            Ok(ExitCode::FAILURE)
        }
    }
}
