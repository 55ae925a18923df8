use thiserror::Error;
use url::Url;

/// Tutor configuration saved by the learner (the API key entered in the chat settings).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppSettings {
    api_key: Option<String>,
    api_model: Option<String>,
    api_base_url: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct AppSettingsDraft {
    pub api_key: Option<String>,
    pub api_model: Option<String>,
    pub api_base_url: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AppSettingsError {
    #[error("invalid base URL")]
    InvalidBaseUrl,
}

impl AppSettingsDraft {
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Validate and normalize the draft into persisted settings.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError` if the base URL is present but invalid.
    pub fn validate(self) -> Result<AppSettings, AppSettingsError> {
        let api_key = normalize_optional(self.api_key);
        let api_model = normalize_optional(self.api_model);
        let api_base_url = normalize_optional(self.api_base_url);

        if let Some(url) = api_base_url.as_ref() {
            if Url::parse(url).is_err() {
                return Err(AppSettingsError::InvalidBaseUrl);
            }
        }

        Ok(AppSettings {
            api_key,
            api_model,
            api_base_url,
        })
    }
}

impl AppSettings {
    /// Rehydrate settings from storage, re-running validation.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError` if the stored base URL is invalid.
    pub fn from_persisted(
        api_key: Option<String>,
        api_model: Option<String>,
        api_base_url: Option<String>,
    ) -> Result<Self, AppSettingsError> {
        AppSettingsDraft {
            api_key,
            api_model,
            api_base_url,
        }
        .validate()
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[must_use]
    pub fn api_model(&self) -> Option<&str> {
        self.api_model.as_deref()
    }

    #[must_use]
    pub fn api_base_url(&self) -> Option<&str> {
        self.api_base_url.as_deref()
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
