//! Dense state-action value table for temporal difference learning

use serde::{Deserialize, Serialize};

use crate::{Error, Result, types::StateId};

/// Return estimates indexed by `[state][action]`, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawValueTable")]
pub struct ValueTable {
    states: usize,
    actions: usize,
    values: Vec<f64>,
}

/// Unchecked wire form; the value count must equal `states * actions`.
#[derive(Deserialize)]
struct RawValueTable {
    states: usize,
    actions: usize,
    values: Vec<f64>,
}

impl TryFrom<RawValueTable> for ValueTable {
    type Error = Error;

    fn try_from(raw: RawValueTable) -> Result<Self> {
        let expected = raw.states.checked_mul(raw.actions);
        if expected != Some(raw.values.len()) {
            return Err(Error::TableLengthMismatch {
                states: raw.states,
                actions: raw.actions,
                len: raw.values.len(),
                expected: expected.unwrap_or(usize::MAX),
            });
        }
        Ok(Self {
            states: raw.states,
            actions: raw.actions,
            values: raw.values,
        })
    }
}

impl ValueTable {
    /// Create a zero-initialized table.
    pub fn new(states: usize, actions: usize) -> Self {
        Self {
            states,
            actions,
            values: vec![0.0; states * actions],
        }
    }

    pub fn states(&self) -> usize {
        self.states
    }

    pub fn actions(&self) -> usize {
        self.actions
    }

    /// Check that the table matches a simulation's cardinality.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableShapeMismatch`] when either dimension differs.
    pub fn check_shape(&self, states: usize, actions: usize) -> Result<()> {
        if self.states == states && self.actions == actions {
            Ok(())
        } else {
            Err(Error::TableShapeMismatch {
                states: self.states,
                actions: self.actions,
                expected_states: states,
                expected_actions: actions,
            })
        }
    }

    fn offset(&self, state: StateId, action: usize) -> Result<usize> {
        if state.index() >= self.states {
            return Err(Error::StateOutOfRange {
                state: state.index(),
                state_count: self.states,
            });
        }
        if action >= self.actions {
            return Err(Error::InvalidAction {
                index: action,
                action_count: self.actions,
            });
        }
        Ok(state.index() * self.actions + action)
    }

    /// All action values for one state.
    pub fn row(&self, state: StateId) -> Result<&[f64]> {
        let start = self.offset(state, 0)?;
        Ok(&self.values[start..start + self.actions])
    }

    pub fn get(&self, state: StateId, action: usize) -> Result<f64> {
        self.offset(state, action).map(|idx| self.values[idx])
    }

    pub fn set(&mut self, state: StateId, action: usize, value: f64) -> Result<()> {
        let idx = self.offset(state, action)?;
        self.values[idx] = value;
        Ok(())
    }

    /// Highest value in a state's row.
    pub fn max_value(&self, state: StateId) -> Result<f64> {
        Ok(self
            .row(state)?
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max))
    }

    /// Index of the highest-valued action; ties go to the lowest index.
    pub fn greedy_action(&self, state: StateId) -> Result<usize> {
        let row = self.row(state)?;
        let mut best = 0;
        for (action, &value) in row.iter().enumerate().skip(1) {
            if value > row[best] {
                best = action;
            }
        }
        Ok(best)
    }

    /// Q-learning backup (off-policy):
    ///
    /// Q(s,a) ← (1-α)·Q(s,a) + α·[r + γ·max_a' Q(s',a')]
    ///
    /// Returns the updated value.
    pub fn q_learning_update(
        &mut self,
        state: StateId,
        action: usize,
        reward: f64,
        next_state: StateId,
        alpha: f64,
        gamma: f64,
    ) -> Result<f64> {
        let old = self.get(state, action)?;
        let next_max = self.max_value(next_state)?;
        let new = (1.0 - alpha) * old + alpha * (reward + gamma * next_max);
        self.set(state, action, new)?;
        Ok(new)
    }

    /// SARSA backup (on-policy):
    ///
    /// Q(s,a) ← Q(s,a) + α·[r + γ·Q(s',a') - Q(s,a)]
    ///
    /// Returns the updated value.
    #[allow(clippy::too_many_arguments)]
    pub fn sarsa_update(
        &mut self,
        state: StateId,
        action: usize,
        reward: f64,
        next_state: StateId,
        next_action: usize,
        alpha: f64,
        gamma: f64,
    ) -> Result<f64> {
        let old = self.get(state, action)?;
        let target = reward + gamma * self.get(next_state, next_action)?;
        let new = old + alpha * (target - old);
        self.set(state, action, new)?;
        Ok(new)
    }

    /// Number of entries that moved away from zero.
    pub fn visited_entries(&self) -> usize {
        self.values.iter().filter(|value| **value != 0.0).count()
    }
}
