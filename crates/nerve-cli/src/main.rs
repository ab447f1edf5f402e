mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(e.exit_code());
    }

    match run_app(cli) {
        Ok(()) => {
            info!("✅ Command completed successfully.");
            println!("✅ Command completed successfully.");
        }
        Err(e) => {
            error!("❌ Command failed: {}", e);
            eprintln!("❌ Command failed: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn run_app(cli: Cli) -> Result<()> {
    info!(
        "🚀 NerveModel CLI v{} starting up.",
        env!("CARGO_PKG_VERSION")
    );
    debug!("Full CLI arguments parsed: {:?}", &cli);

    match cli.command {
        Commands::Build(args) => {
            info!("Dispatching to 'build' command.");
            commands::build::run(args)
        }
        Commands::Plan(args) => {
            info!("Dispatching to 'plan' command.");
            commands::plan::run(args)
        }
    }
}
