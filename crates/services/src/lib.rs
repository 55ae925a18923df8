#![forbid(unsafe_code)]

pub mod app_services;
pub mod app_settings_service;
pub mod error;
pub mod progress_service;
pub mod quiz_service;
pub mod tutor;

pub use course_core::Clock;

pub use app_services::AppServices;
pub use app_settings_service::AppSettingsService;
pub use error::{
    AppServicesError, AppSettingsServiceError, ProgressServiceError, QuizLoadError, TutorError,
};
pub use progress_service::{
    COMPLETION_THRESHOLD, ProgressService, QuizGate, ScrollUpdate, reading_percent,
};
pub use quiz_service::{QuizService, parse_quiz_source};
pub use storage::repository::ModuleCompletion;
pub use tutor::{RetryNotice, RetryPolicy, TutorBackend, TutorConfig, TutorService};
