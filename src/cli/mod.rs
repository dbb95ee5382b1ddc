//! CLI infrastructure for the taxi agents
//!
//! This module provides the command-line interface for running the scripted
//! solver, training and evaluating TD agents, and tuning hyperparameters.

pub mod commands;
pub mod config;
pub mod output;
