//! Corner-resolution solver
//!
//! The taxi spawns at an unknown cell. Saturating north then west always
//! lands it in one of two top-row pockets; the number of free eastward steps
//! from there (1 or 2) tells the pockets apart.

use std::fmt;

use tracing::debug;

use crate::{
    Error, Result,
    bruteforce::{ScriptedSequence, SequenceResolver},
    ports::Simulation,
    session::{EnvironmentSession, EpisodeOutcome},
    taxi::Direction,
    types::StateId,
};

/// Normalized starting corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
}

impl Corner {
    /// Classify from the number of successful eastward probe steps.
    ///
    /// # Errors
    ///
    /// Any count other than 1 or 2 means the grid does not have the expected
    /// wall layout; this returns [`Error::CornerClassification`].
    pub fn from_east_steps(east_steps: usize) -> Result<Self> {
        match east_steps {
            1 => Ok(Corner::TopLeft),
            2 => Ok(Corner::TopRight),
            _ => Err(Error::CornerClassification { east_steps }),
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corner::TopLeft => f.write_str("top-left"),
            Corner::TopRight => f.write_str("top-right"),
        }
    }
}

/// Deterministic solver: locate the taxi, then replay the matching tour.
#[derive(Debug, Clone)]
pub struct CornerSolver {
    top_left: ScriptedSequence,
    top_right: ScriptedSequence,
}

impl CornerSolver {
    pub fn new(top_left: ScriptedSequence, top_right: ScriptedSequence) -> Self {
        Self {
            top_left,
            top_right,
        }
    }

    pub fn sequence(&self, corner: Corner) -> &ScriptedSequence {
        match corner {
            Corner::TopLeft => &self.top_left,
            Corner::TopRight => &self.top_right,
        }
    }

    /// Normalize the taxi's position and classify its corner.
    ///
    /// Returns the corner together with the state the matching script must
    /// start from (R for top-left, G for top-right).
    pub fn locate<S: Simulation>(
        &self,
        session: &mut EnvironmentSession<S>,
        start: StateId,
    ) -> Result<(Corner, StateId)> {
        let state = session.move_until_blocked(start, Direction::North)?;
        let state = session.move_until_blocked(state, Direction::West)?;
        let (state, east_steps) = session.probe_until_blocked(state, Direction::East)?;

        let corner = Corner::from_east_steps(east_steps)?;
        debug!(%corner, east_steps, "classified starting corner");

        let state = match corner {
            Corner::TopLeft => session.move_until_blocked(state, Direction::West)?,
            Corner::TopRight => state,
        };
        Ok((corner, state))
    }

    /// Run one full episode from reset to outcome.
    pub fn solve<S: Simulation>(
        &self,
        session: &mut EnvironmentSession<S>,
    ) -> Result<EpisodeOutcome> {
        let (start, _) = session.reset()?;
        let (corner, state) = self.locate(session, start)?;
        let solved = SequenceResolver::new(self.sequence(corner)).solve(session, state)?;
        Ok(session.outcome(solved))
    }
}

impl Default for CornerSolver {
    fn default() -> Self {
        Self::new(ScriptedSequence::top_left(), ScriptedSequence::top_right())
    }
}
