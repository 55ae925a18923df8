#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod quiz;
pub mod scoring;
pub mod time;

pub use error::Error;
pub use quiz::{AvailableActions, InvalidTransition, QuizEvent, QuizPhase, QuizSession, dispatch};
pub use scoring::{AnswerReview, GradeTier, QuizResult, compute_score, percentage, review_answers};
pub use time::Clock;
