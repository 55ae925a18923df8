use thiserror::Error;

use super::session::QuizPhase;

/// Everything the presentation layer can ask the quiz to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizEvent {
    Begin,
    /// `question` is the index the option was rendered for, not the live index.
    SelectOption { question: usize, option: usize },
    Previous,
    Retry,
}

/// Why an event left the session untouched.
///
/// These are never fatal: the session is guaranteed to be unchanged.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidTransition {
    #[error("quiz can only begin from the start screen (phase: {phase})")]
    NotAtStart { phase: QuizPhase },

    #[error("quiz is not in progress (phase: {phase})")]
    NotInProgress { phase: QuizPhase },

    #[error("quiz can only be retried from the results screen (phase: {phase})")]
    NotFinished { phase: QuizPhase },

    #[error("answer for question {got} arrived while question {expected} is showing")]
    StaleQuestion { expected: usize, got: usize },

    #[error("option {option} does not exist (question has {available} options)")]
    OptionOutOfRange { option: usize, available: usize },

    #[error("already at the first question")]
    AtFirstQuestion,
}
