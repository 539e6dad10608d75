//! Ad dispatch CLI.
//!
//! This tool provides commands for:
//! - Validating dispatch settings files
//! - Simulating interstitial sessions against a settings file

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

use ad_dispatch_common::logging::init_logger;

mod config;
mod error;
mod simulate;

use error::CliError;
use simulate::SimulationPlan;

#[derive(Parser)]
#[command(name = "adcli")]
#[command(about = "Ad dispatch CLI for settings validation and session simulation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a settings file
    Validate {
        /// Path to the TOML configuration file
        #[arg(long, short)]
        file: PathBuf,

        /// Print the effective settings after environment overrides
        #[arg(long)]
        print: bool,
    },

    /// Simulate a session of interstitial requests
    Simulate {
        /// Path to the TOML configuration file
        #[arg(long, short, env = "AD_DISPATCH_SETTINGS")]
        file: PathBuf,

        /// Number of interstitial requests
        #[arg(long, short, default_value_t = 10)]
        calls: u32,

        /// Call-site interval passed with every request (0 shows on every call)
        #[arg(long, short, default_value_t = 0)]
        interval: u32,

        /// Remove all ads after this many requests
        #[arg(long)]
        remove_after: Option<u32>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Clone, ValueEnum, Debug)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = init_logger(level) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Validate { file, print } => config::validate(&file, print, cli.verbose),
        Commands::Simulate {
            file,
            calls,
            interval,
            remove_after,
            format,
        } => {
            let plan = SimulationPlan {
                calls,
                interval,
                remove_after,
            };
            simulate::simulate(&file, plan, &format, cli.verbose)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_simulate_args() {
        let cli = Cli::try_parse_from([
            "adcli",
            "simulate",
            "-f",
            "ad-dispatch.toml",
            "--calls",
            "6",
            "--interval",
            "2",
            "--remove-after",
            "4",
            "--format",
            "json",
        ])
        .expect("should parse");

        match cli.command {
            Commands::Simulate {
                calls,
                interval,
                remove_after,
                format,
                ..
            } => {
                assert_eq!(calls, 6);
                assert_eq!(interval, 2);
                assert_eq!(remove_after, Some(4));
                assert!(matches!(format, OutputFormat::Json));
            }
            Commands::Validate { .. } => unreachable!("expected simulate"),
        }
    }
}
