//! Trail of History CLI - Command-line interface
//!
//! Follows the live POI feed, lists snapshots with distances, and manages
//! configuration.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;

use commands::common::{FeedArgs, LocationArgs};
use commands::config::ConfigCommands;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "trailhistory")]
#[command(version = trailhistory::VERSION)]
#[command(about = "Historical points of interest along the Trail of History", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow the POI feed and the current POI until Ctrl+C
    Watch {
        #[command(flatten)]
        feed: FeedArgs,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Load a POI snapshot and print it west to east
    List {
        /// POI snapshot file
        #[arg(long)]
        file: PathBuf,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Show the trail region described by a bounds file
    Bounds {
        /// Trail bounds file (midCoord, topLeftCoord, topRightCoord, bottomLeftCoord)
        #[arg(long)]
        file: PathBuf,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Print the bundled offline POI list
    Offline {
        /// Offline POI list (object mapping names to latitude, longitude and description)
        #[arg(long)]
        file: PathBuf,

        #[command(flatten)]
        location: LocationArgs,

        /// Also print each description
        #[arg(long)]
        describe: bool,
    },

    /// View and modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Watch { feed, location } => {
            let runner = CliRunner::new(cli.verbose)?;
            commands::watch::run(&runner, feed, location)
        }
        Commands::List { file, location } => {
            let runner = CliRunner::new(cli.verbose)?;
            commands::list::run(&runner, file, location)
        }
        Commands::Bounds { file, location } => commands::bounds::run(file, location),
        Commands::Offline {
            file,
            location,
            describe,
        } => commands::offline::run(file, location, describe),
        Commands::Config { command } => commands::config::run(command),
    }
}
