//! Ports (trait boundaries) for external dependencies.
//!
//! The agents own these traits; simulations, storage backends and progress
//! reporters implement them.

pub mod observer;
pub mod simulation;
pub mod table_repository;

pub use observer::TrainingObserver;
pub use simulation::{RawTransition, Simulation};
pub use table_repository::TableRepository;
