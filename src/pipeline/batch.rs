//! Batch evaluation: run many episodes and aggregate their outcomes

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, session::EpisodeOutcome};

/// Outcomes of a batch of episodes plus their counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub total_solved: usize,
    pub total_unsolved: usize,
    pub total_attempts: usize,
    /// Percentage of solved episodes (0-100)
    pub success_rate: f64,
    pub results: Vec<EpisodeOutcome>,
}

/// Aggregate statistics of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Mean cumulative reward divided by mean step count
    pub mean_reward_per_step: f64,
    pub mean_penalties_per_episode: f64,
    pub mean_steps_per_episode: f64,
    /// First episode with the highest cumulative reward
    pub best: Option<EpisodeOutcome>,
    /// First episode with the lowest cumulative reward
    pub worst: Option<EpisodeOutcome>,
}

impl BatchResult {
    pub fn new(results: Vec<EpisodeOutcome>) -> Self {
        let total_attempts = results.len();
        let total_solved = results.iter().filter(|outcome| outcome.solved).count();
        let success_rate = if total_attempts > 0 {
            total_solved as f64 / total_attempts as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total_solved,
            total_unsolved: total_attempts - total_solved,
            total_attempts,
            success_rate,
            results,
        }
    }

    pub fn summary(&self) -> BatchSummary {
        let count = self.results.len();
        if count == 0 {
            return BatchSummary {
                mean_reward_per_step: 0.0,
                mean_penalties_per_episode: 0.0,
                mean_steps_per_episode: 0.0,
                best: None,
                worst: None,
            };
        }

        let n = count as f64;
        let mean_reward = self.results.iter().map(|r| r.total_reward).sum::<f64>() / n;
        let mean_steps = self.results.iter().map(|r| r.steps).sum::<usize>() as f64 / n;
        let mean_penalties = self.results.iter().map(|r| r.penalties).sum::<usize>() as f64 / n;

        let mut best = self.results[0];
        let mut worst = self.results[0];
        for outcome in &self.results[1..] {
            if outcome.total_reward > best.total_reward {
                best = *outcome;
            }
            if outcome.total_reward < worst.total_reward {
                worst = *outcome;
            }
        }

        BatchSummary {
            mean_reward_per_step: if mean_steps > 0.0 {
                mean_reward / mean_steps
            } else {
                0.0
            },
            mean_penalties_per_episode: mean_penalties,
            mean_steps_per_episode: mean_steps,
            best: Some(best),
            worst: Some(worst),
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

impl FromIterator<EpisodeOutcome> for BatchResult {
    fn from_iter<I: IntoIterator<Item = EpisodeOutcome>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Run `episodes` episodes through `episode` and collect the outcomes.
///
/// The first error aborts the batch.
pub fn run_batch<F>(episodes: usize, episode: F) -> Result<BatchResult>
where
    F: FnMut(usize) -> Result<EpisodeOutcome>,
{
    (0..episodes)
        .map(episode)
        .collect::<Result<Vec<_>>>()
        .map(BatchResult::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(solved: bool, steps: usize, total_reward: f64, penalties: usize) -> EpisodeOutcome {
        EpisodeOutcome {
            solved,
            steps,
            total_reward,
            penalties,
        }
    }

    #[test]
    fn test_counts_and_success_rate() {
        let batch = BatchResult::new(vec![
            outcome(true, 10, 11.0, 0),
            outcome(false, 96, -96.0, 0),
            outcome(true, 12, 9.0, 0),
            outcome(true, 20, -10.0, 1),
        ]);
        assert_eq!(batch.total_solved, 3);
        assert_eq!(batch.total_unsolved, 1);
        assert_eq!(batch.total_attempts, 4);
        assert_eq!(batch.success_rate, 75.0);
    }

    #[test]
    fn test_summary_means_and_extremes() {
        let batch = BatchResult::new(vec![
            outcome(true, 10, 10.0, 0),
            outcome(true, 14, 10.0, 2),
            outcome(false, 30, -30.0, 1),
            outcome(true, 6, -30.0, 0),
        ]);
        let summary = batch.summary();
        // mean reward -10, mean steps 15
        assert!((summary.mean_reward_per_step - (-10.0 / 15.0)).abs() < 1e-12);
        assert_eq!(summary.mean_steps_per_episode, 15.0);
        assert_eq!(summary.mean_penalties_per_episode, 0.75);
        // First occurrences win ties.
        assert_eq!(summary.best.unwrap().steps, 10);
        assert_eq!(summary.worst.unwrap().steps, 30);
    }

    #[test]
    fn test_empty_batch() {
        let batch = BatchResult::new(Vec::new());
        assert_eq!(batch.success_rate, 0.0);
        let summary = batch.summary();
        assert!(summary.best.is_none());
        assert_eq!(summary.mean_reward_per_step, 0.0);
    }

    #[test]
    fn test_run_batch_passes_index_and_stops_on_error() {
        let batch = run_batch(3, |i| Ok(outcome(i != 1, i + 1, i as f64, 0))).unwrap();
        assert_eq!(batch.total_attempts, 3);
        assert_eq!(batch.total_solved, 2);
        assert_eq!(batch.results[2].steps, 3);

        let mut calls = 0;
        let result = run_batch(5, |i| {
            calls += 1;
            if i == 2 {
                Err(crate::Error::SessionNotReset)
            } else {
                Ok(outcome(true, 1, 1.0, 0))
            }
        });
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.json");
        let batch = BatchResult::new(vec![outcome(true, 13, 8.0, 0)]);
        batch.save(&path).unwrap();
        assert_eq!(BatchResult::load(&path).unwrap(), batch);
    }

    #[test]
    fn test_io_errors_name_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        match BatchResult::load(&missing) {
            Err(Error::Io { operation, .. }) => assert!(operation.contains("missing.json")),
            other => panic!("expected an IO error, got {other:?}"),
        }

        let nested = dir.path().join("no-such-dir").join("batch.json");
        match BatchResult::new(Vec::new()).save(&nested) {
            Err(Error::Io { operation, .. }) => assert!(operation.starts_with("create file")),
            other => panic!("expected an IO error, got {other:?}"),
        }
    }
}
