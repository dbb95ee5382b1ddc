//! Tune command - random search over TD hyperparameters

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::InMemoryRepository,
    cli::output::{print_kv, print_section, sanitize_summary_path, write_json},
    pipeline::{Tuner, TuningReport},
    q_learning::TdAlgorithm,
    taxi::TaxiEnv,
};

#[derive(Parser, Debug)]
#[command(about = "Tune TD hyperparameters by random search")]
pub struct TuneArgs {
    /// Algorithm to tune (q-learning or sarsa)
    pub algorithm: TdAlgorithm,

    /// Number of trials
    #[arg(long, short = 't', default_value_t = 10)]
    pub trials: usize,

    /// Evaluation episodes per trial
    #[arg(long, default_value_t = 10_000)]
    pub testing: usize,

    /// Random seed for sampling and trial simulations
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the full report as JSON
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

pub fn execute(args: TuneArgs) -> Result<TuningReport> {
    print_section(&format!("Tuning {}", args.algorithm));
    print_kv("Trials", &args.trials.to_string());
    print_kv("Testing episodes", &args.testing.to_string());

    let mut tuner = Tuner::new(args.algorithm, InMemoryRepository::new(), args.testing);
    if let Some(seed) = args.seed {
        tuner = tuner.with_seed(seed);
    }
    let report = tuner
        .run(args.trials, |_, seed| TaxiEnv::new().with_seed(seed))
        .context("Tuning failed")?;

    print_section("Trials");
    for trial in &report.trials {
        let hp = trial.hyperparameters;
        println!(
            "  #{:<3} score {:>10.3}  success {:>6.2}%  alpha {:.3} gamma {:.3} epsilon {:.3} min {:.3} decay {:.3} training {}",
            trial.trial,
            trial.score,
            trial.quantifier.success_rate,
            hp.alpha(),
            hp.gamma(),
            hp.epsilon(),
            hp.min_epsilon(),
            hp.epsilon_decay_rate(),
            hp.episodes_training(),
        );
    }

    if let Some(best) = report.best() {
        print_section("Best Trial");
        print_kv("Trial", &best.trial.to_string());
        print_kv("Score", &format!("{:.3}", best.score));
        println!(
            "{}",
            serde_json::to_string_pretty(&best.hyperparameters)
                .context("Failed to format hyperparameters")?
        );
    }

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw, "tuning_report.json");
        write_json(&path, &report)?;
        println!("\nReport written to {}", path.display());
    }

    Ok(report)
}
