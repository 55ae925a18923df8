use std::path::Path;
use std::sync::Arc;

use course_core::model::{BankIssue, QuizData};
use course_core::quiz::QuizSession;

use crate::error::QuizLoadError;

/// Parse quiz data from either a raw JSON document or a page script that
/// assigns `window.QUIZ_DATA`. Anything after the first JSON value is ignored,
/// so a whole HTML page with the inline script can be passed as-is.
///
/// # Errors
///
/// Returns `QuizLoadError` if no assignment is found or the JSON is invalid.
pub fn parse_quiz_source(source: &str) -> Result<QuizData, QuizLoadError> {
    let trimmed = source.trim_start();
    let json = if trimmed.starts_with('{') {
        trimmed
    } else {
        QuizData::embedded_json(source)?
    };

    let mut stream = serde_json::Deserializer::from_str(json).into_iter::<QuizData>();
    match stream.next() {
        Some(parsed) => Ok(parsed?),
        None => Ok(QuizData::default()),
    }
}

/// The question bank for the current page, plus session construction.
#[derive(Clone, Debug, Default)]
pub struct QuizService {
    data: Arc<QuizData>,
}

impl QuizService {
    /// Wrap already-parsed data, logging any malformed questions.
    #[must_use]
    pub fn new(data: QuizData) -> Self {
        let issues = data.validate();
        for issue in &issues {
            tracing::warn!(question = issue.index + 1, error = %issue.error, "malformed quiz question");
        }
        tracing::info!(
            questions = data.len(),
            malformed = issues.len(),
            "quiz bank loaded"
        );
        Self {
            data: Arc::new(data),
        }
    }

    /// # Errors
    ///
    /// Returns `QuizLoadError` if the source cannot be parsed.
    pub fn from_source(source: &str) -> Result<Self, QuizLoadError> {
        parse_quiz_source(source).map(Self::new)
    }

    /// # Errors
    ///
    /// Returns `QuizLoadError` if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, QuizLoadError> {
        let source = std::fs::read_to_string(path).map_err(|source| QuizLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(&source)
    }

    #[must_use]
    pub fn data(&self) -> &QuizData {
        &self.data
    }

    #[must_use]
    pub fn course_index_url(&self) -> &str {
        self.data.course_index_url()
    }

    #[must_use]
    pub fn issues(&self) -> Vec<BankIssue> {
        self.data.validate()
    }

    /// A fresh session over the loaded bank.
    #[must_use]
    pub fn new_session(&self) -> QuizSession {
        QuizSession::from_data(&self.data)
    }
}
