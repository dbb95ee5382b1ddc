//! Hyperparameters and the exploration schedule for TD training

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Unvalidated hyperparameter values, as read from a config file or flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HyperparameterFields {
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Initial exploration rate ε₀
    pub epsilon: f64,
    /// Exploration floor
    pub min_epsilon: f64,
    /// Exponential decay rate of ε per episode
    pub epsilon_decay_rate: f64,
    pub episodes_training: usize,
    pub episodes_testing: usize,
}

impl Default for HyperparameterFields {
    fn default() -> Self {
        Self {
            alpha: 0.16711067947621416,
            gamma: 0.8995533760334706,
            epsilon: 0.42597524846219625,
            min_epsilon: 0.010230558452100824,
            epsilon_decay_rate: 0.28218249628800446,
            episodes_training: 9210,
            episodes_testing: 10_000,
        }
    }
}

/// Validated hyperparameter set.
///
/// Every construction path (including deserialization) checks that α, γ, ε₀
/// and the decay rate lie in the open interval (0, 1), that the exploration
/// floor sits in [0, ε₀), and that both episode counts are positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HyperparameterFields", into = "HyperparameterFields")]
pub struct Hyperparameters {
    fields: HyperparameterFields,
}

fn open_unit(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidHyperparameter {
            name,
            value,
            constraint: "0 < value < 1",
        })
    }
}

fn positive(name: &'static str, value: usize) -> Result<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(Error::InvalidEpisodeCount { name, value })
    }
}

impl HyperparameterFields {
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        open_unit("alpha", self.alpha)?;
        open_unit("gamma", self.gamma)?;
        open_unit("epsilon", self.epsilon)?;
        open_unit("epsilon_decay_rate", self.epsilon_decay_rate)?;
        if !(self.min_epsilon >= 0.0 && self.min_epsilon < self.epsilon) {
            return Err(Error::InvalidHyperparameter {
                name: "min_epsilon",
                value: self.min_epsilon,
                constraint: "0 <= min_epsilon < epsilon",
            });
        }
        positive("episodes_training", self.episodes_training)?;
        positive("episodes_testing", self.episodes_testing)?;
        Ok(())
    }
}

impl TryFrom<HyperparameterFields> for Hyperparameters {
    type Error = Error;

    fn try_from(fields: HyperparameterFields) -> Result<Self> {
        fields.validate()?;
        Ok(Self { fields })
    }
}

impl From<Hyperparameters> for HyperparameterFields {
    fn from(hyperparameters: Hyperparameters) -> Self {
        hyperparameters.fields
    }
}

impl Hyperparameters {
    /// Create a validated hyperparameter set.
    ///
    /// # Examples
    ///
    /// ```
    /// use taxi_agents::q_learning::Hyperparameters;
    ///
    /// let hp = Hyperparameters::new(0.1, 0.6, 0.5, 0.01, 0.05, 2_000, 100)?;
    /// assert_eq!(hp.episodes_training(), 2_000);
    ///
    /// assert!(Hyperparameters::new(1.0, 0.6, 0.5, 0.01, 0.05, 2_000, 100).is_err());
    /// # Ok::<(), taxi_agents::Error>(())
    /// ```
    pub fn new(
        alpha: f64,
        gamma: f64,
        epsilon: f64,
        min_epsilon: f64,
        epsilon_decay_rate: f64,
        episodes_training: usize,
        episodes_testing: usize,
    ) -> Result<Self> {
        Self::try_from(HyperparameterFields {
            alpha,
            gamma,
            epsilon,
            min_epsilon,
            epsilon_decay_rate,
            episodes_training,
            episodes_testing,
        })
    }

    /// Load and validate a JSON hyperparameter file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open hyperparameter file {path:?}"),
            source,
        })?;
        let fields: HyperparameterFields = serde_json::from_reader(BufReader::new(file))?;
        Self::try_from(fields)
    }

    pub fn fields(&self) -> HyperparameterFields {
        self.fields
    }

    pub fn alpha(&self) -> f64 {
        self.fields.alpha
    }

    pub fn gamma(&self) -> f64 {
        self.fields.gamma
    }

    pub fn epsilon(&self) -> f64 {
        self.fields.epsilon
    }

    pub fn min_epsilon(&self) -> f64 {
        self.fields.min_epsilon
    }

    pub fn epsilon_decay_rate(&self) -> f64 {
        self.fields.epsilon_decay_rate
    }

    pub fn episodes_training(&self) -> usize {
        self.fields.episodes_training
    }

    pub fn episodes_testing(&self) -> usize {
        self.fields.episodes_testing
    }

    pub fn schedule(&self) -> ExplorationSchedule {
        ExplorationSchedule {
            initial: self.fields.epsilon,
            minimum: self.fields.min_epsilon,
            decay_rate: self.fields.epsilon_decay_rate,
        }
    }
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            fields: HyperparameterFields::default(),
        }
    }
}

/// Exponential exploration decay.
///
/// ε(k) = ε_min + (ε₀ - ε_min)·exp(-decay·k), always computed from ε₀ so
/// repeated evaluation never compounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplorationSchedule {
    initial: f64,
    minimum: f64,
    decay_rate: f64,
}

impl ExplorationSchedule {
    pub fn initial(&self) -> f64 {
        self.initial
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    /// Exploration rate for a 1-based episode index.
    pub fn epsilon_at(&self, episode: usize) -> f64 {
        self.minimum + (self.initial - self.minimum) * (-self.decay_rate * episode as f64).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> HyperparameterFields {
        HyperparameterFields {
            alpha: 0.1,
            gamma: 0.6,
            epsilon: 0.5,
            min_epsilon: 0.01,
            epsilon_decay_rate: 0.05,
            episodes_training: 100,
            episodes_testing: 10,
        }
    }

    #[test]
    fn test_default_is_valid() {
        assert!(HyperparameterFields::default().validate().is_ok());
    }

    #[test]
    fn test_alpha_bounds_rejected() {
        for alpha in [0.0, 1.0, -0.2, 1.5] {
            let err = Hyperparameters::try_from(HyperparameterFields { alpha, ..fields() })
                .unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidHyperparameter { name: "alpha", .. }
            ));
        }
    }

    #[test]
    fn test_min_epsilon_must_be_below_epsilon() {
        for min_epsilon in [0.5, 0.7] {
            let err = Hyperparameters::try_from(HyperparameterFields {
                min_epsilon,
                ..fields()
            })
            .unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidHyperparameter {
                    name: "min_epsilon",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_zero_episode_counts_rejected() {
        let err = Hyperparameters::try_from(HyperparameterFields {
            episodes_training: 0,
            ..fields()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidEpisodeCount {
                name: "episodes_training",
                value: 0
            }
        ));

        assert!(
            Hyperparameters::try_from(HyperparameterFields {
                episodes_testing: 0,
                ..fields()
            })
            .is_err()
        );
    }

    #[test]
    fn test_deserialization_validates() {
        let json = r#"{"alpha":0.0,"gamma":0.6,"epsilon":0.5,"min_epsilon":0.01,
            "epsilon_decay_rate":0.05,"episodes_training":100,"episodes_testing":10}"#;
        assert!(serde_json::from_str::<Hyperparameters>(json).is_err());

        let valid = serde_json::to_string(&Hyperparameters::try_from(fields()).unwrap()).unwrap();
        let parsed: Hyperparameters = serde_json::from_str(&valid).unwrap();
        assert_eq!(parsed.alpha(), 0.1);
    }

    #[test]
    fn test_epsilon_decay_monotone_and_floored() {
        let schedule = Hyperparameters::try_from(fields()).unwrap().schedule();
        let values: Vec<f64> = (1..=500).map(|k| schedule.epsilon_at(k)).collect();
        assert!(values.windows(2).all(|pair| pair[1] <= pair[0]));
        assert!(values[0] < 0.5);
        assert!((schedule.epsilon_at(10_000) - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_epsilon_recomputed_from_initial() {
        let schedule = Hyperparameters::try_from(fields()).unwrap().schedule();
        let first = schedule.epsilon_at(7);
        let _ = schedule.epsilon_at(100);
        assert_eq!(schedule.epsilon_at(7), first);
        assert_eq!(schedule.epsilon_at(0), 0.5);
    }
}
