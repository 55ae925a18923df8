use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use storage::repository::AppSettingsRepository;

use crate::error::TutorError;

use super::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient};
use super::prompt::build_prompt;

/// Where and as whom a tutor request is sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TutorEndpoint {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

/// Transport for tutor requests.
#[async_trait]
pub trait TutorBackend: Send + Sync {
    /// Send one prompt and return the model's answer text.
    async fn generate(&self, endpoint: &TutorEndpoint, prompt: &str) -> Result<String, TutorError>;

    /// Model names the key has access to.
    async fn list_models(&self, endpoint: &TutorEndpoint) -> Result<Vec<String>, TutorError>;
}

/// Values fixed at launch. Each one wins over the stored settings.
#[derive(Clone, Debug, Default)]
pub struct TutorConfig {
    pub embedded_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl TutorConfig {
    #[must_use]
    pub fn from_env() -> Self {
        fn var(name: &str) -> Option<String> {
            env::var(name)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        }
        Self {
            embedded_key: var("COURSE_AI_API_KEY"),
            model: var("COURSE_AI_MODEL"),
            base_url: var("COURSE_AI_BASE_URL"),
        }
    }
}

/// Backoff for rate-limited requests: wait `(attempt + 1) * base_delay`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt.saturating_add(1))
    }
}

/// Emitted right before the tutor waits to retry a rate-limited request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryNotice {
    /// One-based number of the retry about to happen.
    pub attempt: u32,
    pub max_retries: u32,
    pub wait: Duration,
    /// `retryDelay` the API suggested. Informational; `wait` follows the retry policy.
    pub server_hint: Option<Duration>,
}

impl RetryNotice {
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Rate limit hit. Auto-retrying in {}s... (Attempt {}/{})",
            self.wait.as_secs(),
            self.attempt,
            self.max_retries
        )
    }
}

/// Course tutor: builds the prompt, resolves the key and retries on rate limits.
#[derive(Clone)]
pub struct TutorService {
    backend: Arc<dyn TutorBackend>,
    settings: Arc<dyn AppSettingsRepository>,
    config: TutorConfig,
    context: Arc<str>,
    retry: RetryPolicy,
}

impl TutorService {
    #[must_use]
    pub fn new(
        backend: Arc<dyn TutorBackend>,
        settings: Arc<dyn AppSettingsRepository>,
        config: TutorConfig,
        context: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            backend,
            settings,
            config,
            context: context.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Gemini-backed tutor.
    #[must_use]
    pub fn gemini(
        settings: Arc<dyn AppSettingsRepository>,
        config: TutorConfig,
        context: impl Into<Arc<str>>,
    ) -> Self {
        Self::new(Arc::new(GeminiClient::new()), settings, config, context)
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// A key baked into the launch config; the settings form is hidden when present.
    #[must_use]
    pub fn has_embedded_key(&self) -> bool {
        self.config.embedded_key.is_some()
    }

    #[must_use]
    pub fn has_context(&self) -> bool {
        !self.context.trim().is_empty()
    }

    /// Endpoint for the next request.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::NotConfigured` if neither an embedded nor a saved key exists.
    pub async fn endpoint(&self) -> Result<TutorEndpoint, TutorError> {
        let stored = self.settings.get_settings().await?.unwrap_or_default();
        let api_key = self
            .config
            .embedded_key
            .clone()
            .or_else(|| stored.api_key().map(str::to_owned))
            .ok_or(TutorError::NotConfigured)?;
        let model = self
            .config
            .model
            .clone()
            .or_else(|| stored.api_model().map(str::to_owned))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = self
            .config
            .base_url
            .clone()
            .or_else(|| stored.api_base_url().map(str::to_owned))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(TutorEndpoint {
            base_url,
            model,
            api_key,
        })
    }

    /// # Errors
    ///
    /// Returns `TutorError` when no key is configured or the check cannot be made.
    pub async fn is_configured(&self) -> Result<bool, TutorError> {
        match self.endpoint().await {
            Ok(_) => Ok(true),
            Err(TutorError::NotConfigured) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Ask a question about the course notes.
    ///
    /// Rate-limited requests are retried per the retry policy, calling
    /// `on_retry` before each wait. Other failures return immediately.
    ///
    /// # Errors
    ///
    /// Returns `TutorError` when the tutor is not set up, the API rejects the
    /// request, the connection fails, or the retries run out.
    pub async fn send_question<F>(&self, question: &str, mut on_retry: F) -> Result<String, TutorError>
    where
        F: FnMut(RetryNotice),
    {
        if !self.has_context() {
            return Err(TutorError::MissingContext);
        }
        let endpoint = self.endpoint().await?;
        let prompt = build_prompt(&self.context, question);

        let mut attempt = 0;
        loop {
            match self.backend.generate(&endpoint, &prompt).await {
                Ok(answer) => {
                    tracing::debug!(attempt, chars = answer.len(), "tutor answered");
                    return Ok(answer);
                }
                Err(TutorError::RateLimited { retry_after, .. })
                    if attempt < self.retry.max_retries =>
                {
                    let wait = self.retry.delay_for(attempt);
                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        wait_secs = wait.as_secs(),
                        hint_secs = retry_after.map(|hint| hint.as_secs()),
                        "tutor rate limited, retrying"
                    );
                    on_retry(RetryNotice {
                        attempt,
                        max_retries: self.retry.max_retries,
                        wait,
                        server_hint: retry_after,
                    });
                    tokio::time::sleep(wait).await;
                }
                Err(err) => {
                    tracing::warn!(error = %err, attempt, "tutor request failed");
                    return Err(err);
                }
            }
        }
    }

    /// Models available to the configured key, for diagnosing API errors.
    ///
    /// # Errors
    ///
    /// Returns `TutorError` if the key is missing or the listing fails.
    pub async fn list_models(&self) -> Result<Vec<String>, TutorError> {
        let endpoint = self.endpoint().await?;
        self.backend.list_models(&endpoint).await
    }
}
