use async_trait::async_trait;
use thiserror::Error;

use crate::models::{HistoryEntry, NewHistoryEntry, Preferences};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Storage for the calculation history log and remembered preferences.
///
/// The computation engine never touches this trait; only the presentation
/// layer persists accepted results.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    // History log (append-only)
    async fn append_entry(
        &self,
        entry: NewHistoryEntry,
    ) -> Result<HistoryEntry, RepositoryError>;

    /// Entries in the order they were appended.
    async fn list_entries(&self) -> Result<Vec<HistoryEntry>, RepositoryError>;

    /// Removes every entry and returns how many were removed.
    async fn clear_entries(&self) -> Result<u64, RepositoryError>;

    // Preferences
    async fn load_preferences(&self) -> Result<Option<Preferences>, RepositoryError>;

    async fn save_preferences(
        &self,
        preferences: &Preferences,
    ) -> Result<(), RepositoryError>;

    async fn clear_preferences(&self) -> Result<(), RepositoryError>;
}
