//! Interpreter for scripted sequences with a backtrack pass

use tracing::debug;

use crate::{
    Error, Result,
    bruteforce::ScriptedSequence,
    ports::Simulation,
    session::{EnvironmentSession, HandleOutcome},
    types::StateId,
};

/// Which script of a sequence is being interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Primary,
    Backtrack,
}

/// Replays a [`ScriptedSequence`] against a session.
///
/// The primary script runs first. If it ends without delivering the
/// passenger, the backtrack script runs from wherever the primary left off.
#[derive(Debug, Clone, Copy)]
pub struct SequenceResolver<'a> {
    sequence: &'a ScriptedSequence,
}

impl<'a> SequenceResolver<'a> {
    pub fn new(sequence: &'a ScriptedSequence) -> Self {
        Self { sequence }
    }

    /// Returns `true` when a dropoff terminated the episode.
    ///
    /// Exhausting both scripts is an ordinary unsolved episode (`Ok(false)`).
    ///
    /// # Errors
    ///
    /// Propagates simulation failures, and returns
    /// [`Error::MissingHandleLocation`] if a script never handled a landmark.
    pub fn solve<S: Simulation>(
        &self,
        session: &mut EnvironmentSession<S>,
        state: StateId,
    ) -> Result<bool> {
        let primary = self.run_phase(session, Phase::Primary, state)?;
        if primary.terminated {
            return Ok(true);
        }

        debug!(
            sequence = self.sequence.name(),
            passenger_acquired = primary.passenger_acquired,
            "primary script exhausted, backtracking"
        );
        let backtrack = self.run_phase(session, Phase::Backtrack, primary.state)?;
        Ok(backtrack.terminated)
    }

    fn run_phase<S: Simulation>(
        &self,
        session: &mut EnvironmentSession<S>,
        phase: Phase,
        mut state: StateId,
    ) -> Result<HandleOutcome> {
        let script = match phase {
            Phase::Primary => self.sequence.primary(),
            Phase::Backtrack => self.sequence.backtrack(),
        };

        let mut last_handled = None;
        for &action in script {
            match action.direction() {
                Some(direction) => state = session.move_until_blocked(state, direction)?,
                None => {
                    let outcome = session.try_dropoff_or_pickup(state)?;
                    if outcome.terminated {
                        debug!(sequence = self.sequence.name(), ?phase, "passenger delivered");
                        return Ok(outcome);
                    }
                    last_handled = Some(outcome);
                }
            }
        }

        last_handled
            .map(|outcome| HandleOutcome { state, ..outcome })
            .ok_or_else(|| Error::MissingHandleLocation {
                script: format!("{}/{phase:?}", self.sequence.name()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        session::SessionConfig,
        taxi::{ScriptedAction, TaxiEnv, TaxiState},
    };

    #[test]
    fn test_primary_script_delivers_from_r() {
        // Taxi at R with passenger at R, destination Y
        let mut session = EnvironmentSession::new(
            TaxiEnv::new().with_start(TaxiState::new(0, 0, 0, 2)),
            SessionConfig::default(),
        );
        let (start, _) = session.reset().unwrap();
        let sequence = ScriptedSequence::top_left();

        assert!(SequenceResolver::new(&sequence).solve(&mut session, start).unwrap());
        // pickup, 4 moves south + blocked step, dropoff
        assert_eq!(session.metrics().steps, 7);
    }

    #[test]
    fn test_backtrack_reaches_earlier_destination() {
        // Taxi at G with passenger at Y, destination G: the primary tour
        // collects at Y last, so delivery happens on the way back.
        let mut session = EnvironmentSession::new(
            TaxiEnv::new().with_start(TaxiState::new(0, 4, 2, 1)),
            SessionConfig::default(),
        );
        let (start, _) = session.reset().unwrap();
        let sequence = ScriptedSequence::top_right();

        assert!(SequenceResolver::new(&sequence).solve(&mut session, start).unwrap());
        assert!(session.passenger_acquired());
    }

    #[test]
    fn test_wrong_corner_script_can_fail_without_error() {
        // Handling a cell that is not a landmark never delivers, so the
        // episode ends unsolved rather than erroring.
        let mut session = EnvironmentSession::new(
            TaxiEnv::new().with_start(TaxiState::new(2, 2, 0, 1)),
            SessionConfig::default(),
        );
        let (start, _) = session.reset().unwrap();
        let sequence = ScriptedSequence::new(
            "stuck",
            vec![ScriptedAction::HandleLocation],
            vec![ScriptedAction::HandleLocation],
        )
        .unwrap();

        assert!(!SequenceResolver::new(&sequence).solve(&mut session, start).unwrap());
        assert_eq!(session.metrics().penalties, 2);
    }
}
