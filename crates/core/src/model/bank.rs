use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::question::{Question, QuestionError};

/// Where "Back to Course" points when the page does not say otherwise.
pub const DEFAULT_COURSE_INDEX_URL: &str = "../Course_Index.html";

/// Global the host page assigns its quiz data to.
const EMBEDDED_ASSIGNMENT: &str = "window.QUIZ_DATA";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizDataError {
    #[error("no window.QUIZ_DATA assignment found in script")]
    MissingAssignment,
}

/// A question-bank problem together with the position it was found at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankIssue {
    pub index: usize,
    pub error: QuestionError,
}

/// Quiz data embedded by the host page.
///
/// Both fields are optional on the wire: a page without `questions` gets an
/// empty quiz rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizData {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_index_url: Option<String>,
}

impl QuizData {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            course_index_url: None,
        }
    }

    #[must_use]
    pub fn with_course_index_url(mut self, url: impl Into<String>) -> Self {
        self.course_index_url = Some(url.into());
        self
    }

    /// Exit link shown on the results screen.
    #[must_use]
    pub fn course_index_url(&self) -> &str {
        self.course_index_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_COURSE_INDEX_URL)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Every malformed question in the bank, in order.
    #[must_use]
    pub fn validate(&self) -> Vec<BankIssue> {
        self.questions
            .iter()
            .enumerate()
            .filter_map(|(index, question)| {
                question
                    .validate()
                    .err()
                    .map(|error| BankIssue { index, error })
            })
            .collect()
    }

    /// Pull the JSON object out of a `window.QUIZ_DATA = {...};` script body.
    ///
    /// The returned slice still has to be parsed as JSON by the caller.
    ///
    /// # Errors
    ///
    /// Returns `QuizDataError::MissingAssignment` when the script does not assign the global.
    pub fn embedded_json(script: &str) -> Result<&str, QuizDataError> {
        let start = script
            .find(EMBEDDED_ASSIGNMENT)
            .ok_or(QuizDataError::MissingAssignment)?;
        let rest = &script[start + EMBEDDED_ASSIGNMENT.len()..];
        let rest = rest
            .trim_start()
            .strip_prefix('=')
            .ok_or(QuizDataError::MissingAssignment)?;
        Ok(rest.trim().trim_end_matches(';').trim_end())
    }
}
