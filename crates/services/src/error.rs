//! Shared error types for the services crate.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use course_core::model::{AppSettingsError, QuizDataError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while loading a question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizLoadError {
    #[error("failed to read quiz file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Embedded(#[from] QuizDataError),
    #[error("quiz data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors emitted by the AI tutor.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TutorError {
    #[error("no API key configured for the tutor")]
    NotConfigured,
    #[error("course knowledge base not loaded")]
    MissingContext,
    #[error("rate limit exceeded: {message}")]
    RateLimited {
        message: String,
        /// Delay the API suggested, if any. Retries still follow `RetryPolicy`.
        retry_after: Option<Duration>,
    },
    #[error("API error: {message}")]
    Api { code: Option<i64>, message: String },
    #[error("connection error: {message}")]
    Network { message: String },
    #[error("the tutor returned no answer")]
    EmptyResponse,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl TutorError {
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

impl From<reqwest::Error> for TutorError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Errors emitted by `AppSettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppSettingsServiceError {
    #[error(transparent)]
    Settings(#[from] AppSettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
