//! Mobilizer CLI library
//!
//! The binary in `main.rs` is a thin wrapper; commands live here so
//! integration tests can drive them.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;

use clap::{Parser, Subcommand};

use config::CliConfig;
use error::CliResult;

/// Mobilizer CLI - reference data and membership scopes
#[derive(Parser, Debug)]
#[command(name = "mobilizer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report duplicate delimitations in a dump without writing anything
    CheckDuplicates(commands::check_duplicates::CheckDuplicatesArgs),

    /// Build the location hierarchy from a dump, optionally committing it
    Seed(commands::seed::SeedArgs),

    /// Resolve a user's roles and support groups from a directory snapshot
    UserRoles(commands::user_roles::UserRolesArgs),

    /// Evaluate the scope guard for one operation
    CheckScope(commands::check_scope::CheckScopeArgs),
}

/// Run a parsed command and return what it printed.
pub async fn run(cli: Cli, config: &CliConfig) -> CliResult<String> {
    match cli.command {
        Commands::CheckDuplicates(args) => commands::check_duplicates::execute(args, config),
        Commands::Seed(args) => commands::seed::execute(args, config).await,
        Commands::UserRoles(args) => commands::user_roles::execute(args, config).await,
        Commands::CheckScope(args) => commands::check_scope::execute(args, config),
    }
}
