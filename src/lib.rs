//! Agents for the Taxi grid world
//!
//! This crate provides:
//! - An environment session that wraps a discrete simulation and tracks
//!   per-episode metrics
//! - A deterministic scripted solver (corner resolution plus scripted tours)
//! - Tabular Q-learning and SARSA training with a greedy inference runner
//! - Batch evaluation, hyperparameter tuning and a CLI
//! - A built-in Taxi simulation

pub mod adapters;
pub mod bruteforce;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod session;
pub mod taxi;
pub mod types;

pub use error::{Error, Result};
pub use types::{StateId, StepInfo};
