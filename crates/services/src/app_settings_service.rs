use std::sync::Arc;

use course_core::model::{AppSettings, AppSettingsDraft};
use storage::repository::AppSettingsRepository;

use crate::error::AppSettingsServiceError;

#[derive(Clone)]
pub struct AppSettingsService {
    repo: Arc<dyn AppSettingsRepository>,
}

impl AppSettingsService {
    #[must_use]
    pub fn new(repo: Arc<dyn AppSettingsRepository>) -> Self {
        Self { repo }
    }

    /// Load persisted settings (or defaults if missing).
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` on storage failures.
    pub async fn load(&self) -> Result<AppSettings, AppSettingsServiceError> {
        let settings = self.repo.get_settings().await?;
        Ok(settings.unwrap_or_default())
    }

    /// Validate and persist new settings.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` if validation fails or persistence fails.
    pub async fn save(
        &self,
        draft: AppSettingsDraft,
    ) -> Result<AppSettings, AppSettingsServiceError> {
        let settings = draft.validate()?;
        self.repo.save_settings(&settings).await?;
        tracing::info!(
            has_key = settings.api_key().is_some(),
            "tutor settings saved"
        );
        Ok(settings)
    }

    /// Replace only the stored API key, keeping the other fields.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` if loading or persistence fails.
    pub async fn save_api_key(
        &self,
        api_key: impl Into<String>,
    ) -> Result<AppSettings, AppSettingsServiceError> {
        let current = self.load().await?;
        self.save(AppSettingsDraft {
            api_key: Some(api_key.into()),
            api_model: current.api_model().map(str::to_owned),
            api_base_url: current.api_base_url().map(str::to_owned),
        })
        .await
    }
}
