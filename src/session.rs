//! Environment session: the single point of contact with a simulation
//!
//! The session wraps a [`Simulation`], turns raw step tuples into
//! [`Transition`] records and keeps the running episode metrics. Every
//! metric update goes through [`EnvironmentSession::record`], so the counters
//! can only move when the session itself steps the simulation.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    Error, Result,
    ports::{RawTransition, Simulation},
    taxi::{Action, Direction},
    types::{StateId, StepInfo},
};

/// Reward conventions and grid geometry of the simulation being driven.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Reward that marks an illegal action (counted as a penalty)
    pub illegal_action_reward: f64,
    /// Reward returned by a pickup that actually collected the passenger
    pub pickup_success_reward: f64,
    /// Number of cells in the grid, used for the inference step budget
    pub grid_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            illegal_action_reward: -10.0,
            pickup_success_reward: -1.0,
            grid_size: 25,
        }
    }
}

/// Result of one primitive step.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: StateId,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub info: StepInfo,
}

impl From<RawTransition> for Transition {
    fn from((state, reward, terminated, truncated, info): RawTransition) -> Self {
        Self {
            state,
            reward,
            terminated,
            truncated,
            info,
        }
    }
}

/// Running counters for the current episode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EpisodeMetrics {
    pub steps: usize,
    pub total_reward: f64,
    pub penalties: usize,
}

/// Final record of one episode, produced by every solving path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    pub solved: bool,
    pub steps: usize,
    pub total_reward: f64,
    pub penalties: usize,
}

/// Result of interpreting one handle-location step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleOutcome {
    pub terminated: bool,
    pub passenger_acquired: bool,
    pub state: StateId,
}

/// Upper bound on the steps needed for the given pickups and dropoffs.
///
/// Each pickup and each dropoff may require crossing the grid and coming back.
pub fn max_steps(grid_size: usize, pickups: usize, dropoffs: usize) -> usize {
    let crossing = grid_size.saturating_sub(1) * 2;
    crossing * pickups + crossing * dropoffs
}

/// Stateful wrapper around one simulation instance.
///
/// A session serves one episode at a time; call [`reset`](Self::reset)
/// before anything else and at the start of every episode.
pub struct EnvironmentSession<S: Simulation> {
    simulation: S,
    config: SessionConfig,
    metrics: EpisodeMetrics,
    passenger_acquired: bool,
    started: bool,
    playback: Option<Vec<String>>,
}

impl<S: Simulation> EnvironmentSession<S> {
    pub fn new(simulation: S, config: SessionConfig) -> Self {
        Self {
            simulation,
            config,
            metrics: EpisodeMetrics::default(),
            passenger_acquired: false,
            started: false,
            playback: None,
        }
    }

    /// Record a rendered frame after every step.
    pub fn with_playback(mut self) -> Self {
        self.playback = Some(Vec::new());
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn metrics(&self) -> EpisodeMetrics {
        self.metrics
    }

    pub fn passenger_acquired(&self) -> bool {
        self.passenger_acquired
    }

    pub fn state_count(&self) -> usize {
        self.simulation.state_count()
    }

    pub fn action_count(&self) -> usize {
        self.simulation.action_count()
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    /// Frames recorded since the last reset (empty when playback is off).
    pub fn playback(&self) -> &[String] {
        self.playback.as_deref().unwrap_or(&[])
    }

    pub fn render(&self) -> String {
        self.simulation.render()
    }

    /// Build the outcome record from the metrics accumulated so far.
    pub fn outcome(&self, solved: bool) -> EpisodeOutcome {
        EpisodeOutcome {
            solved,
            steps: self.metrics.steps,
            total_reward: self.metrics.total_reward,
            penalties: self.metrics.penalties,
        }
    }

    /// Reset the simulation and zero the episode metrics.
    pub fn reset(&mut self) -> Result<(StateId, StepInfo)> {
        self.metrics = EpisodeMetrics::default();
        self.passenger_acquired = false;
        if let Some(frames) = self.playback.as_mut() {
            frames.clear();
        }
        let initial = self.simulation.reset()?;
        self.started = true;
        Ok(initial)
    }

    /// Execute one primitive action and update the metrics.
    pub fn step(&mut self, action: Action) -> Result<Transition> {
        if !self.started {
            return Err(Error::SessionNotReset);
        }
        let transition = Transition::from(self.simulation.step(action)?);
        self.record(&transition);
        trace!(%action, state = %transition.state, reward = transition.reward, "step");
        Ok(transition)
    }

    fn record(&mut self, transition: &Transition) {
        self.metrics.steps += 1;
        self.metrics.total_reward += transition.reward;
        if transition.reward == self.config.illegal_action_reward {
            self.metrics.penalties += 1;
        }
        if let Some(frames) = self.playback.as_mut() {
            frames.push(self.simulation.render());
        }
    }

    /// Step `direction` until a step leaves the state unchanged.
    ///
    /// Returns the blocked state and the number of steps that moved.
    pub fn probe_until_blocked(
        &mut self,
        start: StateId,
        direction: Direction,
    ) -> Result<(StateId, usize)> {
        let action = Action::from(direction);
        let mut state = start;
        let mut moved = 0;
        loop {
            let transition = self.step(action)?;
            if transition.state == state {
                return Ok((state, moved));
            }
            state = transition.state;
            moved += 1;
        }
    }

    /// Saturate movement in `direction` and return the final state.
    pub fn move_until_blocked(&mut self, start: StateId, direction: Direction) -> Result<StateId> {
        self.probe_until_blocked(start, direction)
            .map(|(state, _)| state)
    }

    /// Issue one pickup and return its reward.
    pub fn attempt_pickup(&mut self) -> Result<f64> {
        self.step(Action::Pickup).map(|transition| transition.reward)
    }

    /// Interpret a pickup reward; a success latches the passenger flag.
    pub fn is_passenger_acquired(&mut self, reward: f64) -> bool {
        let acquired = reward == self.config.pickup_success_reward;
        if acquired {
            self.passenger_acquired = true;
        }
        acquired
    }

    /// Handle a landmark: drop off if carrying, otherwise (or if the dropoff
    /// did not finish the task) try a pickup.
    ///
    /// Unless the dropoff terminates, the returned state is `state` unchanged.
    pub fn try_dropoff_or_pickup(&mut self, state: StateId) -> Result<HandleOutcome> {
        if self.passenger_acquired {
            let transition = self.step(Action::Dropoff)?;
            if transition.terminated {
                return Ok(HandleOutcome {
                    terminated: true,
                    passenger_acquired: true,
                    state: transition.state,
                });
            }
        }
        let reward = self.attempt_pickup()?;
        Ok(HandleOutcome {
            terminated: false,
            passenger_acquired: self.is_passenger_acquired(reward),
            state,
        })
    }
}
