//! Repository port - abstraction for value table persistence

use crate::{Result, q_learning::SavedValueTable};

/// Named storage for trained value tables.
///
/// Implementations decide where artifacts live (files, memory, ...). Names
/// are plain identifiers such as `"q-learning"` or `"trial-3"`.
pub trait TableRepository {
    /// Store an artifact under `name`, replacing any previous one.
    fn save(&self, name: &str, saved: &SavedValueTable) -> Result<()>;

    /// Load the artifact stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TableNotFound`] if nothing is stored under `name`.
    fn load(&self, name: &str) -> Result<SavedValueTable>;

    /// Remove the artifact stored under `name`.
    fn delete(&self, name: &str) -> Result<()>;

    /// Whether an artifact exists under `name`.
    fn exists(&self, name: &str) -> bool;
}
