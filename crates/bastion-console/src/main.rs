//! Bastion settlement readiness console.
//! Entry point for the operator binary.

use bastion_config::LoggingConfig;
use bastion_console::cli::{self, Cli, Command, WeightsCommand};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = cli::load_config(args.config.as_deref());

    // Initialise structured logging on stderr so stdout stays machine-readable
    let filter = config
        .as_ref()
        .map(|c| c.logging.filter.clone())
        .unwrap_or_else(|_| LoggingConfig::default().filter);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    let config = config?;
    info!(version = env!("CARGO_PKG_VERSION"), "Bastion console starting");

    let output = match args.command {
        Command::Score(score) => {
            let engine = cli::build_engine(&config).await?;
            cli::cmd_score(&engine, &score).await?
        }
        Command::Weights(WeightsCommand::Show) => {
            cli::cmd_weights_show(&cli::weight_store(&config)).await
        }
        Command::Weights(WeightsCommand::Set(set)) => {
            cli::cmd_weights_set(&cli::weight_store(&config), &set).await?
        }
        Command::Weights(WeightsCommand::Check { file }) => cli::cmd_weights_check(&file)?,
    };

    print!("{output}");
    Ok(())
}
