//! Bruteforce command - solve episodes with the scripted corner solver

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    bruteforce::CornerSolver,
    cli::output::{
        BatchReport, create_batch_progress, print_batch, print_kv, print_section,
        sanitize_summary_path, write_json,
    },
    pipeline::{BatchResult, run_batch},
    session::{EnvironmentSession, SessionConfig},
    taxi::TaxiEnv,
};

#[derive(Parser, Debug)]
#[command(about = "Solve random episodes with the scripted corner solver")]
pub struct BruteforceArgs {
    /// Number of episodes to solve
    #[arg(long, short = 'e', default_value_t = 100)]
    pub episodes: usize,

    /// Random seed for the episode starts
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write a JSON summary of the batch
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

pub fn execute(args: BruteforceArgs) -> Result<BatchResult> {
    let env = match args.seed {
        Some(seed) => TaxiEnv::new().with_seed(seed),
        None => TaxiEnv::new(),
    };
    let mut session = EnvironmentSession::new(env, SessionConfig::default());
    let solver = CornerSolver::default();

    print_section("Bruteforce");
    print_kv("Episodes", &args.episodes.to_string());
    if let Some(seed) = args.seed {
        print_kv("Seed", &seed.to_string());
    }

    let progress = create_batch_progress(args.episodes as u64)?;
    let batch = run_batch(args.episodes, |_| {
        let outcome = solver.solve(&mut session);
        progress.inc(1);
        outcome
    })
    .context("Scripted solver failed")?;
    progress.finish_and_clear();

    let summary = batch.summary();
    print_section("Results");
    print_batch(&batch, &summary);

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw, "bruteforce_summary.json");
        write_json(&path, &BatchReport::new(&batch))?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(batch)
}
