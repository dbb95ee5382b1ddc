//! Subcommands of the `taxi` binary

pub mod bruteforce;
pub mod evaluate;
pub mod train;
pub mod tune;
