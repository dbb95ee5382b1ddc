//! Action vocabulary: primitive simulation actions and scripted macro actions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Primitive action understood by the simulation.
///
/// The discriminants match the simulation's action indices, which are also
/// the column indices of a value table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    South = 0,
    North = 1,
    East = 2,
    West = 3,
    Pickup = 4,
    Dropoff = 5,
}

impl Action {
    /// Number of primitive actions
    pub const COUNT: usize = 6;

    /// All primitive actions in index order
    pub const ALL: [Action; Action::COUNT] = [
        Action::South,
        Action::North,
        Action::East,
        Action::West,
        Action::Pickup,
        Action::Dropoff,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Convert a table column index back into an action.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAction`] if `index` is outside the action space.
    pub fn from_index(index: usize) -> Result<Self> {
        Action::ALL
            .get(index)
            .copied()
            .ok_or(Error::InvalidAction {
                index,
                action_count: Action::COUNT,
            })
    }
}

impl TryFrom<usize> for Action {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        Action::from_index(index)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::South => "South",
            Action::North => "North",
            Action::East => "East",
            Action::West => "West",
            Action::Pickup => "Pickup",
            Action::Dropoff => "Dropoff",
        };
        f.write_str(name)
    }
}

/// Compass direction of a movement action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::North => Action::North,
            Direction::South => Action::South,
            Direction::East => Action::East,
            Direction::West => Action::West,
        }
    }
}

/// Step of a hand-authored script.
///
/// Directions expand into "move until blocked"; `HandleLocation` expands
/// into a dropoff or pickup depending on whether the passenger is aboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptedAction {
    North,
    South,
    East,
    West,
    HandleLocation,
}

impl ScriptedAction {
    /// Movement direction, or `None` for `HandleLocation`.
    pub fn direction(self) -> Option<Direction> {
        match self {
            ScriptedAction::North => Some(Direction::North),
            ScriptedAction::South => Some(Direction::South),
            ScriptedAction::East => Some(Direction::East),
            ScriptedAction::West => Some(Direction::West),
            ScriptedAction::HandleLocation => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_index_roundtrip() {
        for action in Action::ALL {
            assert_eq!(Action::from_index(action.index()).unwrap(), action);
        }
    }

    #[test]
    fn test_invalid_action_index() {
        let err = Action::from_index(6).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidAction {
                index: 6,
                action_count: 6
            }
        ));
    }

    #[test]
    fn test_scripted_direction() {
        assert_eq!(
            ScriptedAction::East.direction().map(Action::from),
            Some(Action::East)
        );
        assert_eq!(ScriptedAction::HandleLocation.direction(), None);
    }
}
