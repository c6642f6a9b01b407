//! CLI entry point - the composition root.
//!
//! Configuration is loaded and validated here, once, before any command
//! runs. A missing endpoint name stops the process before it binds a port.

use clap::{CommandFactory, Parser};
use sagegate_cli::{Cli, Commands, handlers};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = cli.gateway_config(|key| std::env::var(key).ok())?;

    match command {
        Commands::Serve => handlers::serve::execute(&config).await?,
        Commands::Probe {
            prompt,
            max_tokens,
            temperature,
        } => handlers::probe::execute(&config, prompt, *max_tokens, *temperature).await?,
    }

    Ok(())
}
