use async_trait::async_trait;
use chrono::{DateTime, Utc};
use course_core::model::{AppSettings, ModuleId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A module the learner has finished reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCompletion {
    pub module_id: ModuleId,
    pub completed_at: DateTime<Utc>,
}

/// Completion flags keyed by module id.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Completion record for a module, if it has been marked.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn get_completion(
        &self,
        module_id: &ModuleId,
    ) -> Result<Option<ModuleCompletion>, StorageError>;

    /// Flag a module as complete. The first call wins; later calls keep the
    /// first timestamp and return `false`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the flag cannot be stored.
    async fn mark_complete(
        &self,
        module_id: &ModuleId,
        completed_at: DateTime<Utc>,
    ) -> Result<bool, StorageError>;

    /// All completed modules, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn list_completions(&self) -> Result<Vec<ModuleCompletion>, StorageError>;
}

/// Single-row tutor settings.
#[async_trait]
pub trait AppSettingsRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the settings cannot be read or decoded.
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the settings cannot be stored.
    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    completions: Arc<Mutex<HashMap<ModuleId, DateTime<Utc>>>>,
    settings: Arc<Mutex<Option<AppSettings>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_completion(
        &self,
        module_id: &ModuleId,
    ) -> Result<Option<ModuleCompletion>, StorageError> {
        let guard = self
            .completions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(module_id).map(|completed_at| ModuleCompletion {
            module_id: module_id.clone(),
            completed_at: *completed_at,
        }))
    }

    async fn mark_complete(
        &self,
        module_id: &ModuleId,
        completed_at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let mut guard = self
            .completions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(module_id) {
            return Ok(false);
        }
        guard.insert(module_id.clone(), completed_at);
        Ok(true)
    }

    async fn list_completions(&self) -> Result<Vec<ModuleCompletion>, StorageError> {
        let guard = self
            .completions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut items: Vec<ModuleCompletion> = guard
            .iter()
            .map(|(module_id, completed_at)| ModuleCompletion {
                module_id: module_id.clone(),
                completed_at: *completed_at,
            })
            .collect();
        items.sort_by(|a, b| {
            (a.completed_at, a.module_id.as_str()).cmp(&(b.completed_at, b.module_id.as_str()))
        });
        Ok(items)
    }
}

#[async_trait]
impl AppSettingsRepository for InMemoryRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        let mut guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(settings.clone());
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub app_settings: Arc<dyn AppSettingsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let app_settings: Arc<dyn AppSettingsRepository> = Arc::new(repo);
        Self {
            progress,
            app_settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::AppSettingsDraft;
    use course_core::time::fixed_now;

    fn module(id: &str) -> ModuleId {
        ModuleId::new(id).unwrap()
    }

    #[tokio::test]
    async fn first_mark_wins() {
        let repo = InMemoryRepository::new();
        let id = module("Student_Notes");
        let first = fixed_now();
        let later = first + chrono::Duration::hours(1);

        assert!(repo.get_completion(&id).await.unwrap().is_none());
        assert!(repo.mark_complete(&id, first).await.unwrap());
        assert!(!repo.mark_complete(&id, later).await.unwrap());

        let stored = repo.get_completion(&id).await.unwrap().unwrap();
        assert_eq!(stored.completed_at, first);
    }

    #[tokio::test]
    async fn lists_completions_oldest_first() {
        let repo = InMemoryRepository::new();
        let now = fixed_now();
        repo.mark_complete(&module("week2"), now).await.unwrap();
        repo.mark_complete(&module("week1"), now - chrono::Duration::days(1))
            .await
            .unwrap();

        let ids: Vec<String> = repo
            .list_completions()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.module_id.to_string())
            .collect();
        assert_eq!(ids, vec!["week1", "week2"]);
    }

    #[tokio::test]
    async fn settings_round_trip() {
        let storage = Storage::in_memory();
        assert!(storage.app_settings.get_settings().await.unwrap().is_none());

        let settings = AppSettingsDraft::with_api_key("abc").validate().unwrap();
        storage.app_settings.save_settings(&settings).await.unwrap();
        let loaded = storage.app_settings.get_settings().await.unwrap();
        assert_eq!(loaded.as_ref().and_then(AppSettings::api_key), Some("abc"));
    }
}
