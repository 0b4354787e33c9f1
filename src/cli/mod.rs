//! CLI module for dbsweep
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

use crate::config::Overrides;

#[derive(Parser)]
#[command(name = "dbsweep")]
#[command(about = "Truncate tables and reset sequences in a PostgreSQL schema")]
#[command(version)]
pub struct Cli {
    /// PostgreSQL connection URL (overrides DATABASE_URL)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Target schema (overrides DBSWEEP_SCHEMA)
    #[arg(long, global = true)]
    pub schema: Option<String>,

    /// Table that is never truncated (overrides DBSWEEP_MIGRATIONS_TABLE)
    #[arg(long, global = true)]
    pub migrations_table: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            database_url: self.database_url.clone(),
            schema: self.schema.clone(),
            migrations_table: self.migrations_table.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    // ========================================================================
    // Maintenance Commands
    // ========================================================================

    /// Truncate every table except the migrations table
    Truncate {
        /// Print the statements without running them
        #[arg(long)]
        dry_run: bool,
        /// Exit non-zero if any table failed to truncate
        #[arg(long)]
        strict: bool,
    },

    /// Restart every sequence at 1
    ResetSequences {
        /// Print the statements without running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Truncate tables, then reset sequences
    Clean {
        /// Exit non-zero if any table failed to truncate
        #[arg(long)]
        strict: bool,
    },

    // ========================================================================
    // Info Commands
    // ========================================================================

    /// List tables and sequences in the schema
    List,

    /// Show connection and schema status
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "dbsweep",
            "truncate",
            "--dry-run",
            "--schema",
            "tenant_a",
        ])
        .unwrap();

        assert_eq!(cli.schema.as_deref(), Some("tenant_a"));
        assert!(matches!(
            cli.command,
            Commands::Truncate {
                dry_run: true,
                strict: false
            }
        ));
    }

    #[test]
    fn test_reset_sequences_command_name() {
        let cli = Cli::try_parse_from(["dbsweep", "reset-sequences"]).unwrap();
        assert!(matches!(cli.command, Commands::ResetSequences { dry_run: false }));
        assert!(cli.overrides().database_url.is_none());
    }
}
