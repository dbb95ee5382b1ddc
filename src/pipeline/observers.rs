//! Observers for training runs
//!
//! Observers allow composable progress reporting during training without
//! coupling the training loop to a particular output.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::{Result, ports::TrainingObserver, session::EpisodeMetrics};

/// Progress bar observer - shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    total_steps: usize,
    penalties: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            total_steps: 0,
            penalties: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingObserver for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(
        &mut self,
        episode: usize,
        epsilon: f64,
        metrics: &EpisodeMetrics,
    ) -> Result<()> {
        self.total_steps += metrics.steps;
        self.penalties += metrics.penalties;

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64);
            pb.set_message(format!(
                "ε {epsilon:.3}, mean steps {:.1}",
                self.total_steps as f64 / episode.max(1) as f64
            ));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("{} penalties", self.penalties));
        }
        Ok(())
    }
}

/// Emits one debug event per `interval` episodes.
pub struct TracingObserver {
    interval: usize,
}

impl TracingObserver {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new(100)
    }
}

impl TrainingObserver for TracingObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        debug!(total_episodes, "training observer attached");
        Ok(())
    }

    fn on_episode_end(
        &mut self,
        episode: usize,
        epsilon: f64,
        metrics: &EpisodeMetrics,
    ) -> Result<()> {
        if episode.is_multiple_of(self.interval) {
            debug!(
                episode,
                epsilon,
                steps = metrics.steps,
                reward = metrics.total_reward,
                penalties = metrics.penalties,
                "episode finished"
            );
        }
        Ok(())
    }
}

/// Metrics observer - keeps per-episode step counts and penalties
#[derive(Debug, Clone, Default)]
pub struct MetricsObserver {
    steps: Vec<usize>,
    penalties: usize,
    epsilons: Vec<f64>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn episodes(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[usize] {
        &self.steps
    }

    pub fn epsilons(&self) -> &[f64] {
        &self.epsilons
    }

    pub fn total_penalties(&self) -> usize {
        self.penalties
    }

    /// Mean episode length over the last `window` episodes.
    pub fn recent_mean_steps(&self, window: usize) -> f64 {
        let start = self.steps.len().saturating_sub(window);
        let recent = &self.steps[start..];
        if recent.is_empty() {
            0.0
        } else {
            recent.iter().sum::<usize>() as f64 / recent.len() as f64
        }
    }
}

impl TrainingObserver for MetricsObserver {
    fn on_episode_end(
        &mut self,
        _episode: usize,
        epsilon: f64,
        metrics: &EpisodeMetrics,
    ) -> Result<()> {
        self.steps.push(metrics.steps);
        self.penalties += metrics.penalties;
        self.epsilons.push(epsilon);
        Ok(())
    }
}
