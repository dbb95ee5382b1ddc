//! Simulation port - the discrete environment the agents act in
//!
//! The agents only see a simulation through this trait: reset it, step it
//! with a primitive [`Action`], and ask for its state and action cardinality.

use crate::{
    Result,
    taxi::Action,
    types::{StateId, StepInfo},
};

/// Raw outcome of one simulation step:
/// `(state, reward, terminated, truncated, info)`.
pub type RawTransition = (StateId, f64, bool, bool, StepInfo);

/// Discrete, enumerable environment with reset/step semantics.
///
/// Implementations must keep states inside `0..state_count()` and must be
/// idempotent when an agent moves against a wall (the state is unchanged).
///
/// # Examples
///
/// ```no_run
/// use taxi_agents::{ports::Simulation, taxi::{Action, TaxiEnv}};
///
/// let mut env = TaxiEnv::new().with_seed(7);
/// let (state, _info) = env.reset()?;
/// let (next, reward, terminated, _truncated, _info) = env.step(Action::North)?;
/// # let _ = (state, next, reward, terminated);
/// # Ok::<(), taxi_agents::Error>(())
/// ```
pub trait Simulation {
    /// Start a new episode and return the initial state.
    fn reset(&mut self) -> Result<(StateId, StepInfo)>;

    /// Apply one primitive action.
    ///
    /// # Errors
    ///
    /// Failures are fatal for the episode; callers propagate them unchanged.
    fn step(&mut self, action: Action) -> Result<RawTransition>;

    /// Number of distinct states.
    fn state_count(&self) -> usize;

    /// Number of distinct primitive actions.
    fn action_count(&self) -> usize;

    /// Text rendering of the current state, for diagnostics and playback.
    fn render(&self) -> String;
}
