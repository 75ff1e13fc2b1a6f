use anyhow::Context;
use clap::Parser;
use kanban_board::cli::Cli;
use kanban_board::config::ServerConfig;
use kanban_board::logging::{init_logging, LoggingConfig};
use kanban_board::server::ApiServer;

#[tokio::main]
async fn main() {
    // Parse CLI arguments first to get logging configuration
    let cli = Cli::parse();

    let log_config = LoggingConfig::from_args(cli.quiet, cli.verbose > 0, cli.json)
        .with_file_output(cli.log_file.clone());

    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ServerConfig::resolve(&cli).context("Invalid server configuration")?;
    ApiServer::new(config).run().await
}
