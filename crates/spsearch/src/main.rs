//! spsearch - species search across the IUCN Red List, GBIF, iNaturalist and EOL
//!
//! Configuration comes from the environment (tokens, dictionary locations,
//! HTTP timeout); everything else is a command line flag.

mod cli;
mod config;
mod error;
mod render;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    cli.run(&config).await
}

fn init_logging() -> Result<()> {
    let env_filter = EnvFilter::from_default_env().add_directive("spsearch=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    };

    Ok(())
}
