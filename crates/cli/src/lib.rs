pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use stayscore_core::Domain;

#[derive(Debug, Parser)]
#[command(
    name = "stayscore",
    about = "Stayscore reservation assessment CLI",
    long_about = "Assess hotel and restaurant reservations against historical spend, \
                  seed synthetic histories, and inspect runtime readiness.",
    after_help = "Examples:\n  stayscore seed --out-dir data\n  \
                  stayscore predict hotel --input stay.json\n  stayscore doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Train on the domain history and assess one reservation (JSON output)")]
    Predict {
        #[arg(help = "Reservation domain: hotel or restaurant")]
        domain: Domain,
        #[arg(long, help = "Path to the reservation description (JSON)")]
        input: PathBuf,
        #[arg(long, help = "Historical dataset to train on instead of the configured one")]
        dataset: Option<PathBuf>,
    },
    #[command(about = "Write deterministic synthetic histories for both domains")]
    Seed {
        #[arg(long, default_value_t = 240, help = "Rows per dataset")]
        rows: usize,
        #[arg(long, default_value_t = 42, help = "Generator seed")]
        seed: u64,
        #[arg(long, help = "Directory to write into instead of the configured dataset paths")]
        out_dir: Option<PathBuf>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config and check both historical datasets can train a model")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Predict { domain, input, dataset } => {
            commands::predict::run(domain, &input, dataset.as_deref())
        }
        Command::Seed { rows, seed, out_dir } => {
            commands::seed::run(rows, seed, out_dir.as_deref())
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
