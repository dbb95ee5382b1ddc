//! Q-learning and SARSA temporal difference learning
//!
//! Both algorithms learn a dense [`ValueTable`] indexed by `[state][action]`
//! and differ only in the backup target:
//!
//! | Aspect | Q-learning | SARSA |
//! |--------|------------|-------|
//! | Policy | Off-policy | On-policy |
//! | Target | `r + γ·max_a' Q(s',a')` | `r + γ·Q(s',a')` for the next chosen action |
//!
//! ## Usage Example
//!
//! ```no_run
//! use taxi_agents::{
//!     q_learning::{Hyperparameters, TdAlgorithm, TdTrainer, ValuePolicyRunner},
//!     session::{EnvironmentSession, SessionConfig},
//!     taxi::TaxiEnv,
//! };
//!
//! let mut session = EnvironmentSession::new(TaxiEnv::new().with_seed(1), SessionConfig::default());
//! let mut trainer =
//!     TdTrainer::for_session(TdAlgorithm::QLearning, Hyperparameters::default(), &session)
//!         .with_seed(1);
//! trainer.train(&mut session)?;
//!
//! let runner = ValuePolicyRunner::for_session(trainer.into_table(), &session)?;
//! let outcome = runner.solve(&mut session)?;
//! println!("solved: {}", outcome.solved);
//! # Ok::<(), taxi_agents::Error>(())
//! ```

pub mod hyperparameters;
pub mod runner;
pub mod serialization;
pub mod trainer;
pub mod value_table;

pub use hyperparameters::{ExplorationSchedule, HyperparameterFields, Hyperparameters};
pub use runner::ValuePolicyRunner;
pub use serialization::{SavedValueTable, TdAlgorithm, TrainingMetadata};
pub use trainer::{TdTrainer, TrainingSummary};
pub use value_table::ValueTable;
