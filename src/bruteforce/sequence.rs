//! Hand-authored landmark tours used by the scripted solver
//!
//! Each tour starts from a known top corner and visits all four landmarks.
//! The backtrack tour walks them in reverse so a passenger collected late in
//! the primary tour can still reach a destination visited earlier.

use crate::{
    Error, Result,
    taxi::ScriptedAction::{self, East, HandleLocation, North, South, West},
};

/// Immutable pair of scripts for one starting corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedSequence {
    name: String,
    primary: Vec<ScriptedAction>,
    backtrack: Vec<ScriptedAction>,
}

impl ScriptedSequence {
    /// Build a sequence, rejecting scripts that never handle a landmark.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingHandleLocation`] if either script has no
    /// [`ScriptedAction::HandleLocation`].
    pub fn new(
        name: impl Into<String>,
        primary: Vec<ScriptedAction>,
        backtrack: Vec<ScriptedAction>,
    ) -> Result<Self> {
        let name = name.into();
        for (label, script) in [("primary", &primary), ("backtrack", &backtrack)] {
            if !script.contains(&HandleLocation) {
                return Err(Error::MissingHandleLocation {
                    script: format!("{name}/{label}"),
                });
            }
        }
        Ok(Self {
            name,
            primary,
            backtrack,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary(&self) -> &[ScriptedAction] {
        &self.primary
    }

    pub fn backtrack(&self) -> &[ScriptedAction] {
        &self.backtrack
    }

    /// Tour starting at R: R, Y, R, G, B; backtrack B, G, R, Y.
    pub fn top_left() -> Self {
        Self {
            name: "top-left".to_string(),
            primary: vec![
                HandleLocation, // R
                South,
                HandleLocation, // Y
                North,
                HandleLocation, // R
                East,
                South,
                East,
                North,
                East,
                HandleLocation, // G
                South,
                West,
                HandleLocation, // B
            ],
            backtrack: vec![
                HandleLocation, // B
                East,
                North,
                HandleLocation, // G
                West,
                South,
                West,
                North,
                West,
                HandleLocation, // R
                South,
                HandleLocation, // Y
            ],
        }
    }

    /// Tour starting at G: G, B, R, Y; backtrack Y, R, G, B.
    pub fn top_right() -> Self {
        Self {
            name: "top-right".to_string(),
            primary: vec![
                HandleLocation, // G
                South,
                West,
                HandleLocation, // B
                North,
                West,
                South,
                West,
                North,
                West,
                HandleLocation, // R
                South,
                HandleLocation, // Y
            ],
            backtrack: vec![
                HandleLocation, // Y
                North,
                HandleLocation, // R
                East,
                South,
                East,
                North,
                East,
                HandleLocation, // G
                South,
                West,
                HandleLocation, // B
            ],
        }
    }
}
