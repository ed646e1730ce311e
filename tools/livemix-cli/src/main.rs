//! LiveMix CLI: command-line interface for the preview controller.
//!
//! Usage:
//!   livemix replay <SCRIPT>    Replay a scripted preview session
//!   livemix presets            Show output canvas presets
//!   livemix config             Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "livemix",
    about = "Live compositing preview controller",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scripted preview session against the dry-run engine
    Replay {
        /// Path to the replay script (JSON)
        script: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the output canvas presets
    Presets,

    /// Show the effective configuration
    Config {
        /// Write the default configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logging = livemix_common::config::AppConfig::load().logging;
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    livemix_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Replay { script, json } => commands::replay::run(script, json).await,
        Commands::Presets => commands::presets::run(),
        Commands::Config { init } => commands::config::run(init),
    }
}
