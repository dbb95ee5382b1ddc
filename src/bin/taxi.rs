//! Taxi CLI - scripted and learned agents for the Taxi grid world
//!
//! This CLI provides a unified interface for:
//! - Solving episodes with the scripted corner solver
//! - Training Q-learning and SARSA value tables
//! - Evaluating saved tables
//! - Tuning TD hyperparameters

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taxi")]
#[command(version, about = "Scripted and learned agents for the Taxi grid world", long_about = None)]
struct Cli {
    /// Log debug events (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve random episodes with the scripted corner solver
    Bruteforce(taxi_agents::cli::commands::bruteforce::BruteforceArgs),

    /// Train a Q-learning or SARSA value table
    Train(Box<taxi_agents::cli::commands::train::TrainArgs>),

    /// Evaluate a saved value table
    Evaluate(taxi_agents::cli::commands::evaluate::EvaluateArgs),

    /// Tune TD hyperparameters by random search
    Tune(taxi_agents::cli::commands::tune::TuneArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Bruteforce(args) => {
            taxi_agents::cli::commands::bruteforce::execute(args).map(|_| ())
        }
        Commands::Train(args) => taxi_agents::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => taxi_agents::cli::commands::evaluate::execute(args).map(|_| ()),
        Commands::Tune(args) => taxi_agents::cli::commands::tune::execute(args).map(|_| ()),
    }
}
