//! Error types for the taxi agents crate

use thiserror::Error;

/// Main error type for the taxi agents crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(
        "corner classification failed: probed {east_steps} eastward step(s) after normalizing (expected 1 or 2)"
    )]
    CornerClassification { east_steps: usize },

    #[error("scripted sequence '{script}' contains no handle-location action")]
    MissingHandleLocation { script: String },

    #[error("invalid hyperparameter {name}={value}: must satisfy {constraint}")]
    InvalidHyperparameter {
        name: &'static str,
        value: f64,
        constraint: &'static str,
    },

    #[error("invalid episode count {name}={value}: must be greater than zero")]
    InvalidEpisodeCount { name: &'static str, value: usize },

    #[error("invalid action index {index} (action space has {action_count} actions)")]
    InvalidAction { index: usize, action_count: usize },

    #[error("state {state} is out of range (state space has {state_count} states)")]
    StateOutOfRange { state: usize, state_count: usize },

    #[error("environment session used before reset")]
    SessionNotReset,

    #[error(
        "value table shape {states}x{actions} does not match simulation shape {expected_states}x{expected_actions}"
    )]
    TableShapeMismatch {
        states: usize,
        actions: usize,
        expected_states: usize,
        expected_actions: usize,
    },

    #[error("value table {states}x{actions} holds {len} values (expected {expected})")]
    TableLengthMismatch {
        states: usize,
        actions: usize,
        len: usize,
        expected: usize,
    },

    #[error("no value table named '{name}'")]
    TableNotFound { name: String },

    #[error("unsupported value table format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("invalid algorithm '{input}'. Expected one of: {expected}")]
    ParseAlgorithm { input: String, expected: String },

    #[error("simulation failure: {message}")]
    Simulation { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
