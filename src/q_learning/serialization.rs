//! Serialization support for trained value tables.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::{Hyperparameters, ValueTable},
};

/// Temporal difference control algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TdAlgorithm {
    QLearning,
    Sarsa,
}

impl TdAlgorithm {
    /// Default artifact name for tables trained with this algorithm.
    pub fn default_table_name(self) -> &'static str {
        match self {
            TdAlgorithm::QLearning => "q-learning",
            TdAlgorithm::Sarsa => "sarsa",
        }
    }
}

impl fmt::Display for TdAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_table_name())
    }
}

impl FromStr for TdAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "q-learning" | "qlearning" | "q" => Ok(TdAlgorithm::QLearning),
            "sarsa" => Ok(TdAlgorithm::Sarsa),
            _ => Err(Error::ParseAlgorithm {
                input: s.to_string(),
                expected: "q-learning, sarsa".to_string(),
            }),
        }
    }
}

/// Provenance recorded next to a trained table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Number of training episodes played
    pub episodes_trained: usize,
    /// Random seed used (if any)
    pub seed: Option<u64>,
}

/// On-disk form of a trained value table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedValueTable {
    pub version: u32,
    pub algorithm: TdAlgorithm,
    pub hyperparameters: Hyperparameters,
    pub metadata: TrainingMetadata,
    table: ValueTable,
}

impl SavedValueTable {
    pub const VERSION: u32 = 1;

    pub fn new(
        algorithm: TdAlgorithm,
        hyperparameters: Hyperparameters,
        metadata: TrainingMetadata,
        table: ValueTable,
    ) -> Self {
        Self {
            version: Self::VERSION,
            algorithm,
            hyperparameters,
            metadata,
            table,
        }
    }

    /// Check the format version.
    pub fn check_version(&self) -> Result<()> {
        if self.version == Self::VERSION {
            Ok(())
        } else {
            Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            })
        }
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    /// Unwrap the table after checking the version and its shape against a
    /// simulation's `states` x `actions`.
    pub fn into_table(self, states: usize, actions: usize) -> Result<ValueTable> {
        self.check_version()?;
        self.table.check_shape(states, actions)?;
        Ok(self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StateId;

    fn saved() -> SavedValueTable {
        let mut table = ValueTable::new(4, 2);
        table.set(StateId::new(3), 1, -2.5).unwrap();
        SavedValueTable::new(
            TdAlgorithm::Sarsa,
            Hyperparameters::default(),
            TrainingMetadata {
                episodes_trained: 12,
                seed: Some(5),
            },
            table,
        )
    }

    #[test]
    fn test_msgpack_roundtrip() {
        let bytes = rmp_serde::to_vec(&saved()).unwrap();
        let loaded: SavedValueTable = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(loaded, saved());
        let table = loaded.into_table(4, 2).unwrap();
        assert_eq!(table.get(StateId::new(3), 1).unwrap(), -2.5);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let err = saved().into_table(500, 6).unwrap_err();
        assert!(matches!(
            err,
            Error::TableShapeMismatch {
                states: 4,
                actions: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut artifact = saved();
        artifact.version = 99;
        assert!(matches!(
            artifact.into_table(4, 2),
            Err(Error::UnsupportedVersion {
                found: 99,
                expected: 1
            })
        ));
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!(
            "q-learning".parse::<TdAlgorithm>().unwrap(),
            TdAlgorithm::QLearning
        );
        assert_eq!("Q_LEARNING".parse::<TdAlgorithm>().unwrap(), TdAlgorithm::QLearning);
        assert_eq!("sarsa".parse::<TdAlgorithm>().unwrap(), TdAlgorithm::Sarsa);
        assert!("td-lambda".parse::<TdAlgorithm>().is_err());
    }
}
