//! Epsilon-greedy TD control training loop

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Result,
    ports::{Simulation, TrainingObserver},
    q_learning::{Hyperparameters, SavedValueTable, TdAlgorithm, TrainingMetadata, ValueTable},
    session::EnvironmentSession,
    taxi::Action,
    types::StateId,
};

const PROGRESS_INTERVAL: usize = 1000;

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Aggregate statistics of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub algorithm: TdAlgorithm,
    pub episodes: usize,
    pub total_steps: usize,
    pub total_penalties: usize,
    /// Exploration rate of the last episode
    pub final_epsilon: f64,
    /// Table entries that moved away from zero
    pub visited_entries: usize,
}

impl TrainingSummary {
    pub fn mean_steps(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_steps as f64 / self.episodes as f64
        }
    }
}

/// Tabular Q-learning / SARSA trainer.
///
/// Owns the value table being learned. Episodes run until the simulation
/// reports `terminated` or `truncated`; there is no step cap while training.
pub struct TdTrainer {
    algorithm: TdAlgorithm,
    hyperparameters: Hyperparameters,
    table: ValueTable,
    rng: StdRng,
    seed: Option<u64>,
    observers: Vec<Box<dyn TrainingObserver>>,
}

impl TdTrainer {
    /// Create a trainer with a zero table of `states` x `actions`.
    pub fn new(
        algorithm: TdAlgorithm,
        hyperparameters: Hyperparameters,
        states: usize,
        actions: usize,
    ) -> Self {
        Self {
            algorithm,
            hyperparameters,
            table: ValueTable::new(states, actions),
            rng: build_rng(None),
            seed: None,
            observers: Vec::new(),
        }
    }

    /// Create a trainer sized for the session's simulation.
    pub fn for_session<S: Simulation>(
        algorithm: TdAlgorithm,
        hyperparameters: Hyperparameters,
        session: &EnvironmentSession<S>,
    ) -> Self {
        Self::new(
            algorithm,
            hyperparameters,
            session.state_count(),
            session.action_count(),
        )
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.seed = Some(seed);
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn TrainingObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn algorithm(&self) -> TdAlgorithm {
        self.algorithm
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn into_table(self) -> ValueTable {
        self.table
    }

    /// Package the learned table with its provenance.
    pub fn to_saved(&self, episodes_trained: usize) -> SavedValueTable {
        SavedValueTable::new(
            self.algorithm,
            self.hyperparameters,
            TrainingMetadata {
                episodes_trained,
                seed: self.seed,
            },
            self.table.clone(),
        )
    }

    /// ε-greedy action selection
    pub fn select_action(&mut self, state: StateId, epsilon: f64) -> Result<usize> {
        if self.rng.random::<f64>() < epsilon {
            Ok(self.rng.random_range(0..self.table.actions()))
        } else {
            self.table.greedy_action(state)
        }
    }

    /// Train for `episodes_training` episodes on the session.
    pub fn train<S: Simulation>(
        &mut self,
        session: &mut EnvironmentSession<S>,
    ) -> Result<TrainingSummary> {
        self.table
            .check_shape(session.state_count(), session.action_count())?;

        let episodes = self.hyperparameters.episodes_training();
        let schedule = self.hyperparameters.schedule();
        let alpha = self.hyperparameters.alpha();
        let gamma = self.hyperparameters.gamma();

        for observer in &mut self.observers {
            observer.on_training_start(episodes)?;
        }
        debug!(algorithm = %self.algorithm, episodes, alpha, gamma, "training started");

        let mut total_steps = 0;
        let mut total_penalties = 0;
        let mut epsilon = schedule.initial();

        for episode in 1..=episodes {
            let (mut state, _) = session.reset()?;
            epsilon = schedule.epsilon_at(episode);

            // SARSA commits to its first action before stepping.
            let mut pending = match self.algorithm {
                TdAlgorithm::Sarsa => Some(self.select_action(state, epsilon)?),
                TdAlgorithm::QLearning => None,
            };

            loop {
                let action = match pending.take() {
                    Some(action) => action,
                    None => self.select_action(state, epsilon)?,
                };
                let transition = session.step(Action::from_index(action)?)?;

                match self.algorithm {
                    TdAlgorithm::QLearning => {
                        self.table.q_learning_update(
                            state,
                            action,
                            transition.reward,
                            transition.state,
                            alpha,
                            gamma,
                        )?;
                    }
                    TdAlgorithm::Sarsa => {
                        let next_action = self.select_action(transition.state, epsilon)?;
                        self.table.sarsa_update(
                            state,
                            action,
                            transition.reward,
                            transition.state,
                            next_action,
                            alpha,
                            gamma,
                        )?;
                        pending = Some(next_action);
                    }
                }

                state = transition.state;
                if transition.terminated || transition.truncated {
                    break;
                }
            }

            let metrics = session.metrics();
            total_steps += metrics.steps;
            total_penalties += metrics.penalties;

            for observer in &mut self.observers {
                observer.on_episode_end(episode, epsilon, &metrics)?;
            }
            if episode.is_multiple_of(PROGRESS_INTERVAL) {
                info!(
                    algorithm = %self.algorithm,
                    episode,
                    epsilon,
                    mean_steps = total_steps as f64 / episode as f64,
                    "training progress"
                );
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(TrainingSummary {
            algorithm: self.algorithm,
            episodes,
            total_steps,
            total_penalties,
            final_epsilon: epsilon,
            visited_entries: self.table.visited_entries(),
        })
    }
}
