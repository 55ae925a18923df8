use async_trait::async_trait;
use chrono::{DateTime, Utc};
use course_core::model::ModuleId;
use sqlx::Row;

use crate::repository::{ModuleCompletion, ProgressRepository, StorageError};

use super::SqliteRepository;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn map_completion_row(row: &sqlx::sqlite::SqliteRow) -> Result<ModuleCompletion, StorageError> {
    let module_id: String = row.try_get("module_id").map_err(ser)?;
    let completed_at: DateTime<Utc> = row.try_get("completed_at").map_err(ser)?;
    Ok(ModuleCompletion {
        module_id: ModuleId::new(module_id).map_err(ser)?,
        completed_at,
    })
}

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_completion(
        &self,
        module_id: &ModuleId,
    ) -> Result<Option<ModuleCompletion>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT module_id, completed_at
            FROM module_progress
            WHERE module_id = ?1
            ",
        )
        .bind(module_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        row.as_ref().map(map_completion_row).transpose()
    }

    async fn mark_complete(
        &self,
        module_id: &ModuleId,
        completed_at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            r"
            INSERT INTO module_progress (module_id, completed_at)
            VALUES (?1, ?2)
            ON CONFLICT(module_id) DO NOTHING
            ",
        )
        .bind(module_id.as_str())
        .bind(completed_at)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_completions(&self) -> Result<Vec<ModuleCompletion>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT module_id, completed_at
            FROM module_progress
            ORDER BY completed_at ASC, module_id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        rows.iter().map(map_completion_row).collect()
    }
}
