//! dbsweep - truncate tables and reset sequences in a PostgreSQL schema

use clap::Parser;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dbsweep::cli::{Cli, Commands};
use dbsweep::lifecycle::ProcessHost;
use dbsweep::{tools, with_client, Config, Error, MaintenanceDbClient, Result};

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the JSON output.
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    let config = match Config::from_env(cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let host = Arc::new(ProcessHost::new());
    let command = cli.command;

    let result = with_client(&config, |client| {
        client.register_shutdown(host.clone());
        Box::pin(async move {
            tokio::select! {
                result = run(client, command) => result,
                _ = tokio::signal::ctrl_c() => Err(Error::Interrupted),
            }
        })
    })
    .await;

    match result {
        Ok((output, success)) => {
            println!("{}", output);
            if !success {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Run one command, returning its JSON output and whether the process should exit cleanly
async fn run(client: &MaintenanceDbClient, command: Commands) -> Result<(String, bool)> {
    match command {
        // ====================================================================
        // Maintenance Commands
        // ====================================================================
        Commands::Truncate { dry_run, strict } => {
            let output = tools::truncate_tables(client, dry_run).await?;
            let success = output.success || !strict;
            Ok((serde_json::to_string_pretty(&output)?, success))
        }

        Commands::ResetSequences { dry_run } => {
            let output = tools::reset_sequences(client, dry_run).await?;
            Ok((serde_json::to_string_pretty(&output)?, true))
        }

        Commands::Clean { strict } => {
            let output = tools::clean_schema(client).await?;
            let success = output.success || !strict;
            Ok((serde_json::to_string_pretty(&output)?, success))
        }

        // ====================================================================
        // Info Commands
        // ====================================================================
        Commands::List => {
            let output = tools::list_objects(client).await?;
            Ok((serde_json::to_string_pretty(&output)?, true))
        }

        Commands::Status => {
            let output = tools::get_status(client).await?;
            Ok((serde_json::to_string_pretty(&output)?, true))
        }
    }
}
