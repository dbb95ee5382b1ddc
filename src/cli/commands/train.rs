//! Train command - learn a value table with Q-learning or SARSA

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::{
    adapters::MsgPackRepository,
    cli::{
        config::{HyperparameterOverrides, resolve_hyperparameters},
        output::{
            BatchReport, create_batch_progress, print_batch, print_kv, print_section,
            sanitize_summary_path, write_json,
        },
    },
    pipeline::{ProgressObserver, TracingObserver, run_batch},
    ports::TableRepository,
    q_learning::{Hyperparameters, TdAlgorithm, TdTrainer, TrainingSummary, ValuePolicyRunner},
    session::{EnvironmentSession, SessionConfig},
    taxi::TaxiEnv,
};

#[derive(Parser, Debug)]
#[command(about = "Train a TD agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Algorithm to train (q-learning or sarsa)
    pub algorithm: TdAlgorithm,

    /// JSON file with (a subset of) the hyperparameters
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Learning rate
    #[arg(long, short = 'a')]
    pub alpha: Option<f64>,

    /// Discount factor
    #[arg(long, short = 'g')]
    pub gamma: Option<f64>,

    /// Initial exploration rate
    #[arg(long, short = 'e')]
    pub epsilon: Option<f64>,

    /// Minimum exploration rate
    #[arg(long)]
    pub min_epsilon: Option<f64>,

    /// Exponential decay rate of the exploration rate
    #[arg(long)]
    pub decay_rate: Option<f64>,

    /// Number of training episodes
    #[arg(long)]
    pub training: Option<usize>,

    /// Number of evaluation episodes after training
    #[arg(long)]
    pub testing: Option<usize>,

    /// Directory the table is saved in
    #[arg(long, default_value = "tables")]
    pub dir: PathBuf,

    /// Table name (defaults to the algorithm name)
    #[arg(long)]
    pub name: Option<String>,

    /// Random seed for training and evaluation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Write a JSON summary of training and evaluation
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

impl TrainArgs {
    fn overrides(&self) -> HyperparameterOverrides {
        HyperparameterOverrides {
            alpha: self.alpha,
            gamma: self.gamma,
            epsilon: self.epsilon,
            min_epsilon: self.min_epsilon,
            epsilon_decay_rate: self.decay_rate,
            episodes_training: self.training,
            episodes_testing: self.testing,
        }
    }
}

#[derive(Debug, Serialize)]
struct TrainReport {
    algorithm: TdAlgorithm,
    name: String,
    hyperparameters: Hyperparameters,
    seed: Option<u64>,
    training: TrainingSummary,
    evaluation: BatchReport,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let hyperparameters = resolve_hyperparameters(args.config.as_deref(), args.overrides())?;
    let name = args
        .name
        .clone()
        .unwrap_or_else(|| args.algorithm.default_table_name().to_string());

    print_section(&format!("Training {}", args.algorithm));
    print_kv("Alpha", &hyperparameters.alpha().to_string());
    print_kv("Gamma", &hyperparameters.gamma().to_string());
    print_kv("Epsilon", &hyperparameters.epsilon().to_string());
    print_kv("Min epsilon", &hyperparameters.min_epsilon().to_string());
    print_kv("Decay rate", &hyperparameters.epsilon_decay_rate().to_string());
    print_kv(
        "Training episodes",
        &hyperparameters.episodes_training().to_string(),
    );
    if let Some(seed) = args.seed {
        print_kv("Seed", &seed.to_string());
    }

    let env = match args.seed {
        Some(seed) => TaxiEnv::new().with_seed(seed),
        None => TaxiEnv::new(),
    };
    let mut session = EnvironmentSession::new(env, SessionConfig::default());

    let mut trainer = TdTrainer::for_session(args.algorithm, hyperparameters, &session)
        .with_observer(Box::new(TracingObserver::default()));
    if let Some(seed) = args.seed {
        trainer = trainer.with_seed(seed);
    }
    if !args.no_progress {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }

    let training = trainer.train(&mut session).context("Training failed")?;

    let repository = MsgPackRepository::new(&args.dir);
    repository
        .save(&name, &trainer.to_saved(training.episodes))
        .with_context(|| format!("Failed to save table '{name}'"))?;
    println!(
        "\nSaved table '{name}' to {}",
        repository.path_for(&name).display()
    );

    let runner = ValuePolicyRunner::load(&repository, &name, &session)
        .with_context(|| format!("Failed to load table '{name}'"))?;
    let testing = hyperparameters.episodes_testing();
    let progress = create_batch_progress(testing as u64)?;
    if args.no_progress {
        progress.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }
    let batch = run_batch(testing, |_| {
        let outcome = runner.solve(&mut session);
        progress.inc(1);
        outcome
    })
    .context("Evaluation failed")?;
    progress.finish_and_clear();

    let summary = batch.summary();
    print_section("Evaluation");
    print_batch(&batch, &summary);

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw, "training_summary.json");
        let report = TrainReport {
            algorithm: args.algorithm,
            name,
            hyperparameters,
            seed: args.seed,
            training,
            evaluation: BatchReport::new(&batch),
        };
        write_json(&path, &report)?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}
