use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::app_settings_service::AppSettingsService;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;
use crate::tutor::{TutorConfig, TutorService};

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressService>,
    app_settings: Arc<AppSettingsService>,
    tutor: Arc<TutorService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        tutor_config: TutorConfig,
        course_context: String,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        tracing::info!(db_url, "storage ready");
        Ok(Self::from_storage(&storage, clock, tutor_config, course_context))
    }

    /// Build services over an existing storage, e.g. `Storage::in_memory()`.
    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        tutor_config: TutorConfig,
        course_context: String,
    ) -> Self {
        let progress = Arc::new(ProgressService::new(clock, Arc::clone(&storage.progress)));
        let app_settings = Arc::new(AppSettingsService::new(Arc::clone(&storage.app_settings)));
        let tutor = Arc::new(TutorService::gemini(
            Arc::clone(&storage.app_settings),
            tutor_config,
            course_context,
        ));
        Self {
            progress,
            app_settings,
            tutor,
        }
    }

    #[must_use]
    pub fn with_tutor(mut self, tutor: TutorService) -> Self {
        self.tutor = Arc::new(tutor);
        self
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn app_settings(&self) -> Arc<AppSettingsService> {
        Arc::clone(&self.app_settings)
    }

    #[must_use]
    pub fn tutor(&self) -> Arc<TutorService> {
        Arc::clone(&self.tutor)
    }
}
