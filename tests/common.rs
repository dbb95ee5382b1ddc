//! Common test utilities for the taxi agents test suite.
//!
//! Provides a deterministic one-row corridor simulation whose optimal policy
//! is unique and known: walk east until the goal cell.

#![allow(dead_code)]

use taxi_agents::{
    Error, Result, StateId, StepInfo,
    ports::{RawTransition, Simulation},
    session::{EnvironmentSession, SessionConfig},
    taxi::Action,
};

/// Number of cells in the corridor; the last one is the goal.
pub const CORRIDOR_LENGTH: usize = 5;

pub const GOAL: usize = CORRIDOR_LENGTH - 1;

/// One-row corridor.
///
/// East moves one cell (reaching the goal pays +20 and terminates), West
/// moves back, North/South bump into walls. Pickup and dropoff are always
/// illegal (-10). Resets cycle through the non-goal cells unless a start is
/// pinned.
#[derive(Debug, Clone)]
pub struct Corridor {
    position: Option<usize>,
    fixed_start: Option<usize>,
    next_start: usize,
}

impl Corridor {
    pub fn new() -> Self {
        Self {
            position: None,
            fixed_start: None,
            next_start: 0,
        }
    }

    pub fn with_start(start: usize) -> Self {
        Self {
            fixed_start: Some(start),
            ..Self::new()
        }
    }
}

impl Simulation for Corridor {
    fn reset(&mut self) -> Result<(StateId, StepInfo)> {
        let start = match self.fixed_start {
            Some(start) => start,
            None => {
                let start = self.next_start;
                self.next_start = (self.next_start + 1) % GOAL;
                start
            }
        };
        self.position = Some(start);
        Ok((StateId::new(start), StepInfo::new(1.0, vec![true; Action::COUNT])))
    }

    fn step(&mut self, action: Action) -> Result<RawTransition> {
        let position = self.position.ok_or_else(|| Error::Simulation {
            message: "corridor stepped before reset".to_string(),
        })?;
        let (next, reward, terminated) = match action {
            Action::East if position + 1 == GOAL => (GOAL, 20.0, true),
            Action::East => ((position + 1).min(GOAL), -1.0, false),
            Action::West => (position.saturating_sub(1), -1.0, false),
            Action::North | Action::South => (position, -1.0, false),
            Action::Pickup | Action::Dropoff => (position, -10.0, false),
        };
        self.position = Some(next);
        Ok((
            StateId::new(next),
            reward,
            terminated,
            false,
            StepInfo::new(1.0, vec![true; Action::COUNT]),
        ))
    }

    fn state_count(&self) -> usize {
        CORRIDOR_LENGTH
    }

    fn action_count(&self) -> usize {
        Action::COUNT
    }

    fn render(&self) -> String {
        let mut cells = vec!['.'; CORRIDOR_LENGTH];
        cells[GOAL] = 'G';
        if let Some(position) = self.position {
            cells[position] = 'T';
        }
        let mut out: String = cells.into_iter().collect();
        out.push('\n');
        out
    }
}

/// Session config matching the corridor: one row of cells.
pub fn corridor_config() -> SessionConfig {
    SessionConfig {
        grid_size: CORRIDOR_LENGTH,
        ..SessionConfig::default()
    }
}

pub fn corridor_session(simulation: Corridor) -> EnvironmentSession<Corridor> {
    EnvironmentSession::new(simulation, corridor_config())
}
