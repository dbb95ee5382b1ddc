//! Hyperparameter configuration shared by the `train` and `tune` commands

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::q_learning::{HyperparameterFields, Hyperparameters};

/// Partial hyperparameter set.
///
/// Used both for `--config` JSON files (any subset of keys) and for the
/// individual command-line flags. Later layers override earlier ones:
/// defaults, then the file, then the flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HyperparameterOverrides {
    pub alpha: Option<f64>,
    pub gamma: Option<f64>,
    pub epsilon: Option<f64>,
    pub min_epsilon: Option<f64>,
    pub epsilon_decay_rate: Option<f64>,
    pub episodes_training: Option<usize>,
    pub episodes_testing: Option<usize>,
}

impl HyperparameterOverrides {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Layer `other` on top of `self`.
    pub fn merge(self, other: Self) -> Self {
        Self {
            alpha: other.alpha.or(self.alpha),
            gamma: other.gamma.or(self.gamma),
            epsilon: other.epsilon.or(self.epsilon),
            min_epsilon: other.min_epsilon.or(self.min_epsilon),
            epsilon_decay_rate: other.epsilon_decay_rate.or(self.epsilon_decay_rate),
            episodes_training: other.episodes_training.or(self.episodes_training),
            episodes_testing: other.episodes_testing.or(self.episodes_testing),
        }
    }

    pub fn apply(&self, base: HyperparameterFields) -> HyperparameterFields {
        HyperparameterFields {
            alpha: self.alpha.unwrap_or(base.alpha),
            gamma: self.gamma.unwrap_or(base.gamma),
            epsilon: self.epsilon.unwrap_or(base.epsilon),
            min_epsilon: self.min_epsilon.unwrap_or(base.min_epsilon),
            epsilon_decay_rate: self.epsilon_decay_rate.unwrap_or(base.epsilon_decay_rate),
            episodes_training: self.episodes_training.unwrap_or(base.episodes_training),
            episodes_testing: self.episodes_testing.unwrap_or(base.episodes_testing),
        }
    }
}

/// Resolve defaults, an optional config file and flag overrides into a
/// validated set.
pub fn resolve_hyperparameters(
    config: Option<&Path>,
    flags: HyperparameterOverrides,
) -> Result<Hyperparameters> {
    let file = match config {
        Some(path) => HyperparameterOverrides::from_json_file(path)?,
        None => HyperparameterOverrides::default(),
    };
    let fields = file.merge(flags).apply(HyperparameterFields::default());
    Hyperparameters::try_from(fields).context("Invalid hyperparameters")
}
