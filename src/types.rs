//! Newtype wrappers shared between the simulation boundary and the agents.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque discrete state produced by a simulation.
///
/// Agents never look inside a state. They only compare states for equality
/// (to detect that a move was blocked) and use them as value-table row indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(usize);

impl StateId {
    pub fn new(value: usize) -> Self {
        StateId(value)
    }

    /// Row index into a value table.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for StateId {
    fn from(value: usize) -> Self {
        StateId(value)
    }
}

impl From<StateId> for usize {
    fn from(state: StateId) -> Self {
        state.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Auxiliary information attached to a reset or a step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StepInfo {
    /// Probability of the transition that occurred
    pub prob: f64,
    /// Per-action flag: `true` when the action would change the state
    pub action_mask: Vec<bool>,
}

impl StepInfo {
    pub fn new(prob: f64, action_mask: Vec<bool>) -> Self {
        Self { prob, action_mask }
    }
}
