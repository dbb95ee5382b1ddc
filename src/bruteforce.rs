//! Deterministic scripted solver
//!
//! Infers where the taxi started by probing walls, then replays a
//! hand-authored tour of the four landmarks (with a reverse tour as
//! fallback).

pub mod corner;
pub mod resolver;
pub mod sequence;

pub use corner::{Corner, CornerSolver};
pub use resolver::{Phase, SequenceResolver};
pub use sequence::ScriptedSequence;
