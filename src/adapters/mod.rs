//! Adapters implementing domain ports.
//!
//! Storage backends for [`crate::ports::TableRepository`]. The Taxi
//! simulation adapter lives in [`crate::taxi`].

pub mod in_memory_repository;
pub mod msgpack_repository;

pub use in_memory_repository::InMemoryRepository;
pub use msgpack_repository::MsgPackRepository;
