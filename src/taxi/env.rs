//! Taxi grid-world simulation
//!
//! A 5x5 grid with four landmarks (R, G, Y, B). The taxi must collect a
//! passenger waiting at one landmark and drop them at another. Walls are
//! drawn as `|` in the map; `:` marks an open crossing.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    Error, Result,
    ports::{RawTransition, Simulation},
    taxi::Action,
    types::{StateId, StepInfo},
};

const MAP: [&str; 7] = [
    "+---------+",
    "|R: | : :G|",
    "| : | : : |",
    "| : : : : |",
    "| | : | : |",
    "|Y| : |B: |",
    "+---------+",
];

/// Grid side length
pub const GRID_SIDE: usize = 5;

/// Landmark cells (row, col) in R, G, Y, B order
pub const LANDMARKS: [(usize, usize); 4] = [(0, 0), (0, 4), (4, 0), (4, 3)];

const LANDMARK_NAMES: [char; 4] = ['R', 'G', 'Y', 'B'];

/// Passenger index meaning "inside the taxi"
pub const IN_TAXI: usize = 4;

/// Total number of encoded states
pub const STATE_COUNT: usize = GRID_SIDE * GRID_SIDE * 5 * 4;

/// Reward for every step that does not finish the task
pub const STEP_REWARD: f64 = -1.0;
/// Reward for an illegal pickup or dropoff
pub const ILLEGAL_REWARD: f64 = -10.0;
/// Reward for delivering the passenger
pub const DELIVERY_REWARD: f64 = 20.0;

/// Decoded taxi state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaxiState {
    pub row: usize,
    pub col: usize,
    /// Landmark index 0-3, or [`IN_TAXI`]
    pub passenger: usize,
    /// Landmark index 0-3
    pub destination: usize,
}

impl TaxiState {
    pub fn new(row: usize, col: usize, passenger: usize, destination: usize) -> Self {
        Self {
            row,
            col,
            passenger,
            destination,
        }
    }

    pub fn encode(&self) -> StateId {
        StateId::new(
            ((self.row * GRID_SIDE + self.col) * 5 + self.passenger) * 4 + self.destination,
        )
    }

    /// # Errors
    ///
    /// Returns [`Error::StateOutOfRange`] for ids outside the state space.
    pub fn decode(state: StateId) -> Result<Self> {
        let mut value = state.index();
        if value >= STATE_COUNT {
            return Err(Error::StateOutOfRange {
                state: value,
                state_count: STATE_COUNT,
            });
        }
        let destination = value % 4;
        value /= 4;
        let passenger = value % 5;
        value /= 5;
        let col = value % GRID_SIDE;
        let row = value / GRID_SIDE;
        Ok(Self::new(row, col, passenger, destination))
    }

    /// Whether this is a legal episode start (passenger waiting away from the destination).
    pub fn is_valid_start(&self) -> bool {
        self.passenger < IN_TAXI && self.passenger != self.destination
    }

    fn landmark_here(&self) -> Option<usize> {
        LANDMARKS
            .iter()
            .position(|&cell| cell == (self.row, self.col))
    }
}

/// All valid start states in encoding order.
pub fn valid_start_states() -> Vec<TaxiState> {
    let mut states = Vec::new();
    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            for passenger in 0..IN_TAXI {
                for destination in 0..4 {
                    let state = TaxiState::new(row, col, passenger, destination);
                    if state.is_valid_start() {
                        states.push(state);
                    }
                }
            }
        }
    }
    states
}

fn open_east(row: usize, col: usize) -> bool {
    MAP[row + 1].as_bytes()[2 * col + 2] == b':'
}

fn open_west(row: usize, col: usize) -> bool {
    MAP[row + 1].as_bytes()[2 * col] == b':'
}

/// Deterministic transition function: `(next, reward, terminated)`.
fn transition(state: TaxiState, action: Action) -> (TaxiState, f64, bool) {
    let mut next = state;
    let mut reward = STEP_REWARD;
    let mut terminated = false;
    match action {
        Action::South => next.row = (state.row + 1).min(GRID_SIDE - 1),
        Action::North => next.row = state.row.saturating_sub(1),
        Action::East => {
            if open_east(state.row, state.col) {
                next.col = (state.col + 1).min(GRID_SIDE - 1);
            }
        }
        Action::West => {
            if open_west(state.row, state.col) {
                next.col = state.col.saturating_sub(1);
            }
        }
        Action::Pickup => {
            if state.passenger < IN_TAXI
                && LANDMARKS[state.passenger] == (state.row, state.col)
            {
                next.passenger = IN_TAXI;
            } else {
                reward = ILLEGAL_REWARD;
            }
        }
        Action::Dropoff => match state.landmark_here() {
            Some(here) if state.passenger == IN_TAXI && here == state.destination => {
                next.passenger = state.destination;
                terminated = true;
                reward = DELIVERY_REWARD;
            }
            Some(here) if state.passenger == IN_TAXI => next.passenger = here,
            _ => reward = ILLEGAL_REWARD,
        },
    }
    (next, reward, terminated)
}

fn action_mask(state: TaxiState) -> Vec<bool> {
    Action::ALL
        .iter()
        .map(|&action| transition(state, action).0 != state)
        .collect()
}

/// Taxi simulation with seeded random starts.
#[derive(Debug, Clone)]
pub struct TaxiEnv {
    state: Option<TaxiState>,
    last_action: Option<Action>,
    fixed_start: Option<TaxiState>,
    rng: StdRng,
}

impl TaxiEnv {
    /// Create a simulation with an entropy-seeded start sampler.
    pub fn new() -> Self {
        Self {
            state: None,
            last_action: None,
            fixed_start: None,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Seed the start sampler for reproducible episodes.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Pin every reset to the given start.
    pub fn with_start(mut self, start: TaxiState) -> Self {
        self.fixed_start = Some(start);
        self
    }

    /// Decoded current state, if the episode has started.
    pub fn current(&self) -> Option<TaxiState> {
        self.state
    }

    fn sample_start(&mut self) -> TaxiState {
        loop {
            let candidate = TaxiState::new(
                self.rng.random_range(0..GRID_SIDE),
                self.rng.random_range(0..GRID_SIDE),
                self.rng.random_range(0..IN_TAXI),
                self.rng.random_range(0..4),
            );
            if candidate.is_valid_start() {
                return candidate;
            }
        }
    }
}

impl Default for TaxiEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation for TaxiEnv {
    fn reset(&mut self) -> Result<(StateId, StepInfo)> {
        let start = match self.fixed_start {
            Some(start) => start,
            None => self.sample_start(),
        };
        self.state = Some(start);
        self.last_action = None;
        Ok((start.encode(), StepInfo::new(1.0, action_mask(start))))
    }

    fn step(&mut self, action: Action) -> Result<RawTransition> {
        let current = self.state.ok_or_else(|| Error::Simulation {
            message: "step called before reset".to_string(),
        })?;
        let (next, reward, terminated) = transition(current, action);
        self.state = Some(next);
        self.last_action = Some(action);
        Ok((
            next.encode(),
            reward,
            terminated,
            false,
            StepInfo::new(1.0, action_mask(next)),
        ))
    }

    fn state_count(&self) -> usize {
        STATE_COUNT
    }

    fn action_count(&self) -> usize {
        Action::COUNT
    }

    fn render(&self) -> String {
        let Some(state) = self.state else {
            return String::from("(not started)\n");
        };
        let mut rows: Vec<Vec<char>> = MAP.iter().map(|line| line.chars().collect()).collect();
        for (idx, &(row, col)) in LANDMARKS.iter().enumerate() {
            let mark = if idx == state.destination {
                LANDMARK_NAMES[idx].to_ascii_lowercase()
            } else {
                LANDMARK_NAMES[idx]
            };
            rows[row + 1][2 * col + 1] = mark;
        }
        if state.passenger < IN_TAXI {
            let (row, col) = LANDMARKS[state.passenger];
            rows[row + 1][2 * col + 1] = '*';
        }
        let taxi = if state.passenger == IN_TAXI { '@' } else { 'T' };
        rows[state.row + 1][2 * state.col + 1] = taxi;

        let mut out = String::new();
        for row in rows {
            out.extend(row);
            out.push('\n');
        }
        if let Some(action) = self.last_action {
            out.push_str(&format!("  ({action})\n"));
        }
        out
    }
}
