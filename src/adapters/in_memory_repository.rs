//! In-memory table repository for tuning trials and tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, ports::TableRepository, q_learning::SavedValueTable};

/// Repository that keeps encoded artifacts in a shared map.
///
/// Artifacts are stored as MessagePack bytes, so a round trip exercises the
/// same encoding as [`super::MsgPackRepository`]. Clones share storage.
///
/// # Examples
///
/// ```
/// use taxi_agents::{
///     adapters::InMemoryRepository,
///     ports::TableRepository,
///     q_learning::{Hyperparameters, SavedValueTable, TdAlgorithm, TrainingMetadata, ValueTable},
/// };
///
/// let repo = InMemoryRepository::new();
/// let saved = SavedValueTable::new(
///     TdAlgorithm::Sarsa,
///     Hyperparameters::default(),
///     TrainingMetadata::default(),
///     ValueTable::new(500, 6),
/// );
/// repo.save("sarsa", &saved)?;
/// assert_eq!(repo.load("sarsa")?, saved);
/// # Ok::<(), taxi_agents::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of artifacts currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    pub fn clear(&self) {
        self.storage().clear();
    }
}

impl TableRepository for InMemoryRepository {
    fn save(&self, name: &str, saved: &SavedValueTable) -> Result<()> {
        let bytes = rmp_serde::to_vec(saved).map_err(|e| Error::SerializationContext {
            operation: "serialize value table for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage().insert(name.to_string(), bytes);
        Ok(())
    }

    fn load(&self, name: &str) -> Result<SavedValueTable> {
        let storage = self.storage();
        let bytes = storage.get(name).ok_or_else(|| Error::TableNotFound {
            name: name.to_string(),
        })?;

        let saved: SavedValueTable =
            rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
                operation: "deserialize value table from in-memory storage".to_string(),
                message: e.to_string(),
            })?;
        saved.check_version()?;
        Ok(saved)
    }

    fn delete(&self, name: &str) -> Result<()> {
        self.storage()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::TableNotFound {
                name: name.to_string(),
            })
    }

    fn exists(&self, name: &str) -> bool {
        self.storage().contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_learning::{Hyperparameters, TdAlgorithm, TrainingMetadata, ValueTable};

    fn saved() -> SavedValueTable {
        SavedValueTable::new(
            TdAlgorithm::QLearning,
            Hyperparameters::default(),
            TrainingMetadata::default(),
            ValueTable::new(8, 6),
        )
    }

    #[test]
    fn test_in_memory_save_load_delete() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.count(), 0);

        repo.save("a", &saved()).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.exists("a"));
        assert_eq!(repo.load("a").unwrap(), saved());

        repo.delete("a").unwrap();
        assert!(!repo.exists("a"));
        assert!(matches!(repo.load("a"), Err(Error::TableNotFound { .. })));
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();
        repo1.save("shared", &saved()).unwrap();
        assert!(repo2.load("shared").is_ok());

        repo2.clear();
        assert_eq!(repo1.count(), 0);
    }
}
