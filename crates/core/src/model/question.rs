use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::label::{MAX_OPTIONS, OptionLabel};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Problems found in a question record. Detection only: the quiz still runs
/// with a malformed question, which simply can never be answered correctly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question has no options")]
    NoOptions,

    #[error("question needs at least 2 options, has {0}")]
    TooFewOptions(usize),

    #[error("question has {0} options, at most 26 can be labelled")]
    TooManyOptions(usize),

    #[error("correct answer {0:?} is not a single letter A-Z")]
    InvalidCorrectLabel(String),

    #[error("correct answer {label} points past the last option (only {options} options)")]
    CorrectOutOfRange { label: OptionLabel, options: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question as supplied by the host page.
///
/// `correct` is kept exactly as supplied so that malformed keys survive
/// loading; use [`Question::correct_label`] for the resolved label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct: correct.into(),
            explanation: None,
        }
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// The answer key as a label, if it parses and points at an existing option.
    #[must_use]
    pub fn correct_label(&self) -> Option<OptionLabel> {
        self.correct
            .parse::<OptionLabel>()
            .ok()
            .filter(|label| label.index() < self.options.len())
    }

    /// Text of the option at `label`, if there is one.
    #[must_use]
    pub fn option_text(&self, label: OptionLabel) -> Option<&str> {
        self.options.get(label.index()).map(String::as_str)
    }

    #[must_use]
    pub fn is_correct(&self, answer: OptionLabel) -> bool {
        self.correct_label() == Some(answer)
    }

    /// Check the record against the question-bank invariants.
    ///
    /// # Errors
    ///
    /// Returns the first `QuestionError` found.
    pub fn validate(&self) -> Result<(), QuestionError> {
        match self.options.len() {
            0 => return Err(QuestionError::NoOptions),
            1 => return Err(QuestionError::TooFewOptions(1)),
            n if n > MAX_OPTIONS => return Err(QuestionError::TooManyOptions(n)),
            _ => {}
        }

        let label = self
            .correct
            .parse::<OptionLabel>()
            .map_err(|_| QuestionError::InvalidCorrectLabel(self.correct.clone()))?;
        if label.index() >= self.options.len() {
            return Err(QuestionError::CorrectOutOfRange {
                label,
                options: self.options.len(),
            });
        }
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn four_options(correct: &str) -> Question {
        Question::new("Which mode?", ["NAT", "Host-only", "Bridged", "Internal"], correct)
    }

    #[test]
    fn resolves_correct_label_positionally() {
        let q = four_options("C");
        assert_eq!(q.correct_label().map(OptionLabel::index), Some(2));
        assert_eq!(q.option_text(q.correct_label().unwrap()), Some("Bridged"));
        assert!(q.validate().is_ok());
    }

    #[test]
    fn out_of_range_key_never_resolves() {
        let q = four_options("E");
        assert_eq!(q.correct_label(), None);
        assert!(!q.is_correct("E".parse().unwrap()));
        assert!(matches!(
            q.validate(),
            Err(QuestionError::CorrectOutOfRange { options: 4, .. })
        ));
    }

    #[test]
    fn validate_flags_malformed_records() {
        let empty = Question::new("Q", Vec::<String>::new(), "A");
        assert_eq!(empty.validate(), Err(QuestionError::NoOptions));

        let single = Question::new("Q", ["only"], "A");
        assert_eq!(single.validate(), Err(QuestionError::TooFewOptions(1)));

        let lower = four_options("b");
        assert_eq!(
            lower.validate(),
            Err(QuestionError::InvalidCorrectLabel("b".into()))
        );
    }

    #[test]
    fn deserializes_without_explanation() {
        let q: Question = serde_json::from_str(
            r#"{"text":"DNS does?","options":["a","b"],"correct":"B"}"#,
        )
        .unwrap();
        assert_eq!(q.explanation, None);
        assert_eq!(q.correct_label().map(OptionLabel::index), Some(1));
    }
}
