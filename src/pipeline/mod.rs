//! Batch evaluation, training observers and hyperparameter tuning
//!
//! This module provides:
//! - Running batches of episodes and summarizing their outcomes
//! - Observers that report training progress
//! - Scoring and random-search tuning of TD hyperparameters

pub mod batch;
pub mod observers;
pub mod tuning;

pub use batch::{BatchResult, BatchSummary, run_batch};
pub use observers::{MetricsObserver, ProgressObserver, TracingObserver};
pub use tuning::{SearchSpace, TrialResult, Tuner, TuningQuantifier, TuningReport};

pub use crate::ports::TrainingObserver;
