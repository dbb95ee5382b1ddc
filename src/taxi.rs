//! Taxi grid world: action vocabulary and simulation

pub mod action;
pub mod env;

pub use action::{Action, Direction, ScriptedAction};
pub use env::{LANDMARKS, STATE_COUNT, TaxiEnv, TaxiState, valid_start_states};
