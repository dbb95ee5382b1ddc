//! Hyperparameter tuning by seeded random search
//!
//! Every trial trains a fresh table in its own session, stores it under
//! `trial-<n>`, evaluates the greedy policy, deletes the table again and
//! reduces the batch to one score with [`TuningQuantifier`].

use std::ops::{Range, RangeInclusive};

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    pipeline::batch::{BatchResult, BatchSummary, run_batch},
    ports::{Simulation, TableRepository},
    q_learning::{Hyperparameters, TdAlgorithm, TdTrainer, ValuePolicyRunner},
    session::{EnvironmentSession, SessionConfig},
};

/// Weighted score of an evaluation batch. Higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuningQuantifier {
    /// Percentage of solved episodes (0-100)
    pub success_rate: f64,
    pub mean_reward_per_step: f64,
    pub mean_penalties_per_episode: f64,
    pub mean_steps_per_episode: f64,
}

impl TuningQuantifier {
    pub const SUCCESS_RATE_WEIGHT: f64 = 2.0;
    pub const REWARD_PER_STEP_WEIGHT: f64 = 1.5;
    pub const PENALTIES_WEIGHT: f64 = 3.0;
    pub const STEPS_WEIGHT: f64 = 1.0;

    pub fn from_batch(batch: &BatchResult) -> Self {
        let summary = batch.summary();
        Self {
            success_rate: batch.success_rate,
            mean_reward_per_step: summary.mean_reward_per_step,
            mean_penalties_per_episode: summary.mean_penalties_per_episode,
            mean_steps_per_episode: summary.mean_steps_per_episode,
        }
    }

    pub fn score(&self) -> f64 {
        Self::SUCCESS_RATE_WEIGHT * self.success_rate
            + Self::REWARD_PER_STEP_WEIGHT * self.mean_reward_per_step
            - Self::STEPS_WEIGHT * self.mean_steps_per_episode
            - Self::PENALTIES_WEIGHT * self.mean_penalties_per_episode
    }
}

/// Ranges the random search samples from.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSpace {
    pub alpha: Range<f64>,
    pub gamma: Range<f64>,
    pub epsilon: Range<f64>,
    pub min_epsilon: Range<f64>,
    pub epsilon_decay_rate: Range<f64>,
    pub episodes_training: RangeInclusive<usize>,
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self {
            alpha: 0.1..0.9,
            gamma: 0.1..0.9,
            epsilon: 0.1..0.9,
            min_epsilon: 0.01..0.1,
            epsilon_decay_rate: 0.01..0.9,
            episodes_training: 1000..=30_000,
        }
    }
}

impl SearchSpace {
    /// Draw one validated hyperparameter set.
    pub fn sample<R: Rng>(&self, rng: &mut R, episodes_testing: usize) -> Result<Hyperparameters> {
        Hyperparameters::new(
            rng.random_range(self.alpha.clone()),
            rng.random_range(self.gamma.clone()),
            rng.random_range(self.epsilon.clone()),
            rng.random_range(self.min_epsilon.clone()),
            rng.random_range(self.epsilon_decay_rate.clone()),
            rng.random_range(self.episodes_training.clone()),
            episodes_testing,
        )
    }
}

/// Score of one tuning trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub trial: usize,
    pub hyperparameters: Hyperparameters,
    pub quantifier: TuningQuantifier,
    pub score: f64,
    pub summary: BatchSummary,
}

/// All trials of a tuning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningReport {
    pub algorithm: TdAlgorithm,
    pub trials: Vec<TrialResult>,
}

impl TuningReport {
    /// Highest-scoring trial; the earliest one wins ties.
    pub fn best(&self) -> Option<&TrialResult> {
        self.trials
            .iter()
            .fold(None, |best: Option<&TrialResult>, trial| match best {
                Some(current) if current.score >= trial.score => Some(current),
                _ => Some(trial),
            })
    }
}

/// Sequential random-search tuner.
pub struct Tuner<R: TableRepository> {
    algorithm: TdAlgorithm,
    repository: R,
    config: SessionConfig,
    search: SearchSpace,
    episodes_testing: usize,
    rng: StdRng,
}

impl<R: TableRepository> Tuner<R> {
    pub fn new(algorithm: TdAlgorithm, repository: R, episodes_testing: usize) -> Self {
        Self {
            algorithm,
            repository,
            config: SessionConfig::default(),
            search: SearchSpace::default(),
            episodes_testing,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_search_space(mut self, search: SearchSpace) -> Self {
        self.search = search;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Run `trials` trials. `make_simulation(trial, seed)` builds each trial's
    /// private simulation.
    pub fn run<S, F>(&mut self, trials: usize, mut make_simulation: F) -> Result<TuningReport>
    where
        S: Simulation,
        F: FnMut(usize, u64) -> S,
    {
        let mut results = Vec::with_capacity(trials);
        for trial in 0..trials {
            let hyperparameters = self.search.sample(&mut self.rng, self.episodes_testing)?;
            let seed = self.rng.random::<u64>();
            let result = self.run_trial(trial, hyperparameters, seed, make_simulation(trial, seed))?;
            info!(
                algorithm = %self.algorithm,
                trial,
                score = result.score,
                success_rate = result.quantifier.success_rate,
                "trial finished"
            );
            results.push(result);
        }
        Ok(TuningReport {
            algorithm: self.algorithm,
            trials: results,
        })
    }

    fn run_trial<S: Simulation>(
        &self,
        trial: usize,
        hyperparameters: Hyperparameters,
        seed: u64,
        simulation: S,
    ) -> Result<TrialResult> {
        let name = format!("trial-{trial}");
        let mut session = EnvironmentSession::new(simulation, self.config);

        let mut trainer = TdTrainer::for_session(self.algorithm, hyperparameters, &session)
            .with_seed(seed);
        trainer.train(&mut session)?;
        self.repository
            .save(&name, &trainer.to_saved(hyperparameters.episodes_training()))?;

        let runner = ValuePolicyRunner::load(&self.repository, &name, &session)?;
        let batch = run_batch(hyperparameters.episodes_testing(), |_| {
            runner.solve(&mut session)
        })?;
        self.repository.delete(&name)?;

        let quantifier = TuningQuantifier::from_batch(&batch);
        Ok(TrialResult {
            trial,
            hyperparameters,
            quantifier,
            score: quantifier.score(),
            summary: batch.summary(),
        })
    }
}
