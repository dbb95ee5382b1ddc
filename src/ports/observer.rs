//! Observer port - abstraction for watching a training run
//!
//! Training code reports progress through this trait so it never has to know
//! whether anyone draws a progress bar, logs, or ignores the events entirely.

use crate::{Result, session::EpisodeMetrics};

/// Observer trait for monitoring TD training.
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once at the beginning
/// 2. `on_episode_end(episode, epsilon, metrics)` - after every episode,
///    with the 1-based episode index
/// 3. `on_training_end()` - once at the end
///
/// # Examples
///
/// ```
/// use taxi_agents::{ports::TrainingObserver, session::EpisodeMetrics};
///
/// struct StepCounter {
///     steps: usize,
/// }
///
/// impl TrainingObserver for StepCounter {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         _epsilon: f64,
///         metrics: &EpisodeMetrics,
///     ) -> taxi_agents::Result<()> {
///         self.steps += metrics.steps;
///         Ok(())
///     }
/// }
/// ```
pub trait TrainingObserver: Send {
    /// Called once before the first episode.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each episode finishes.
    ///
    /// `epsilon` is the exploration rate the episode was played with.
    fn on_episode_end(
        &mut self,
        _episode: usize,
        _epsilon: f64,
        _metrics: &EpisodeMetrics,
    ) -> Result<()> {
        Ok(())
    }

    /// Called once after the last episode.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
