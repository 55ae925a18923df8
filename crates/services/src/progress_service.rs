use std::fmt;
use std::sync::Arc;

use course_core::model::ModuleId;
use storage::repository::{ModuleCompletion, ProgressRepository};

use crate::Clock;
use crate::error::ProgressServiceError;

/// Reading percentage a module must exceed to count as read.
pub const COMPLETION_THRESHOLD: f64 = 90.0;

/// How far down the page the reader is, as a percentage in `[0, 100]`.
///
/// A page that fits in the viewport has nothing left to scroll and counts as fully read.
#[must_use]
pub fn reading_percent(scroll_top: f64, viewport_height: f64, document_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if !scrollable.is_finite() || scrollable <= 0.0 {
        return 100.0;
    }
    let percent = scroll_top * 100.0 / scrollable;
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// Whether a module's quiz may be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizGate {
    Locked,
    Unlocked,
}

impl QuizGate {
    #[must_use]
    pub fn is_unlocked(self) -> bool {
        self == Self::Unlocked
    }

    /// Alert text for a locked quiz; `None` when unlocked.
    #[must_use]
    pub fn message(self) -> Option<&'static str> {
        match self {
            Self::Locked => Some(
                "Quiz Locked! Please read through the notes first. (Scroll to the bottom to unlock)",
            ),
            Self::Unlocked => None,
        }
    }
}

impl fmt::Display for QuizGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
        })
    }
}

/// Result of feeding one scroll position to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollUpdate {
    pub percent: f64,
    /// True only for the scroll event that first crossed the threshold.
    pub newly_completed: bool,
}

/// Tracks which course modules have been read and gates their quizzes.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    repo: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn ProgressRepository>) -> Self {
        Self { clock, repo }
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn is_module_complete(&self, module: &ModuleId) -> Result<bool, ProgressServiceError> {
        Ok(self.repo.get_completion(module).await?.is_some())
    }

    /// Flag the module as read. Returns `true` only the first time.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn mark_module_complete(
        &self,
        module: &ModuleId,
    ) -> Result<bool, ProgressServiceError> {
        let newly = self.repo.mark_complete(module, self.clock.now()).await?;
        if newly {
            tracing::info!(module = %module, key = %module.completion_key(), "module marked complete");
        } else {
            tracing::debug!(module = %module, "module already complete");
        }
        Ok(newly)
    }

    /// Record a scroll position and mark the module once reading passes the threshold.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn record_scroll(
        &self,
        module: &ModuleId,
        scroll_top: f64,
        viewport_height: f64,
        document_height: f64,
    ) -> Result<ScrollUpdate, ProgressServiceError> {
        let percent = reading_percent(scroll_top, viewport_height, document_height);
        let newly_completed = if percent > COMPLETION_THRESHOLD {
            self.mark_module_complete(module).await?
        } else {
            false
        };
        Ok(ScrollUpdate {
            percent,
            newly_completed,
        })
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn quiz_gate(&self, module: &ModuleId) -> Result<QuizGate, ProgressServiceError> {
        if self.is_module_complete(module).await? {
            Ok(QuizGate::Unlocked)
        } else {
            Ok(QuizGate::Locked)
        }
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn completed_modules(&self) -> Result<Vec<ModuleCompletion>, ProgressServiceError> {
        Ok(self.repo.list_completions().await?)
    }
}
