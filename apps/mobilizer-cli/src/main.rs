//! mobilizer - operator CLI for Mobilizer
//!
//! - Report duplicate polling-unit delimitations in reference dumps
//! - Preview or commit the seeded location hierarchy
//! - Resolve a user's roles and support groups from a directory snapshot
//! - Evaluate scope requirements for an operation

use clap::Parser;

use mobilizer_cli::config::CliConfig;
use mobilizer_cli::error::CliError;
use mobilizer_cli::{logging, run, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => fail(e.into()),
    };

    if let Err(e) = logging::init_logging(&config.log_filter, config.log_json) {
        fail(e);
    }

    match run(cli, &config).await {
        Ok(output) => {
            print!("{output}");
            std::process::exit(0);
        }
        Err(e) => fail(e),
    }
}

fn fail(e: CliError) -> ! {
    e.print();
    std::process::exit(e.exit_code());
}
