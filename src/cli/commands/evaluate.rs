//! Evaluate command - run a saved value table greedily

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::MsgPackRepository,
    cli::output::{
        BatchReport, create_batch_progress, print_batch, print_kv, print_section,
        sanitize_summary_path, write_json,
    },
    pipeline::{BatchResult, run_batch},
    ports::TableRepository,
    q_learning::ValuePolicyRunner,
    session::{EnvironmentSession, SessionConfig},
    taxi::TaxiEnv,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained value table")]
pub struct EvaluateArgs {
    /// Name of the saved table
    pub name: String,

    /// Directory the table was saved in
    #[arg(long, default_value = "tables")]
    pub dir: PathBuf,

    /// Number of evaluation episodes
    #[arg(long, short = 'e', default_value_t = 100)]
    pub episodes: usize,

    /// Random seed for the episode starts
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write a JSON summary of the batch
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Print the frames of one solved episode
    #[arg(long)]
    pub show_playback: bool,
}

pub fn execute(args: EvaluateArgs) -> Result<BatchResult> {
    let repository = MsgPackRepository::new(&args.dir);
    let saved = repository
        .load(&args.name)
        .with_context(|| format!("Failed to load table '{}'", args.name))?;

    print_section("Loaded Table");
    print_kv("Name", &args.name);
    print_kv("Algorithm", &saved.algorithm.to_string());
    print_kv(
        "Episodes trained",
        &saved.metadata.episodes_trained.to_string(),
    );
    if let Some(seed) = saved.metadata.seed {
        print_kv("Training seed", &seed.to_string());
    }

    let env = match args.seed {
        Some(seed) => TaxiEnv::new().with_seed(seed),
        None => TaxiEnv::new(),
    };
    let mut session = EnvironmentSession::new(env, SessionConfig::default());
    if args.show_playback {
        session = session.with_playback();
    }

    let table = saved
        .into_table(session.state_count(), session.action_count())
        .context("Saved table does not fit the Taxi simulation")?;
    let runner = ValuePolicyRunner::for_session(table, &session)?;

    let progress = create_batch_progress(args.episodes as u64)?;
    let mut playback: Option<Vec<String>> = None;
    let batch = run_batch(args.episodes, |_| {
        let outcome = runner.solve(&mut session)?;
        if args.show_playback && outcome.solved && playback.is_none() {
            playback = Some(session.playback().to_vec());
        }
        progress.inc(1);
        Ok(outcome)
    })
    .context("Evaluation failed")?;
    progress.finish_and_clear();

    if let Some(frames) = &playback {
        print_section("Playback");
        for (step, frame) in frames.iter().enumerate() {
            println!("Step {}:", step + 1);
            print!("{frame}");
        }
    }

    let summary = batch.summary();
    print_section("Results");
    print_batch(&batch, &summary);

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw, "evaluation_summary.json");
        write_json(&path, &BatchReport::new(&batch))?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(batch)
}
