use thiserror::Error;

use crate::model::{AppSettingsError, ModuleIdError, QuestionError, QuizDataError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    QuizData(#[from] QuizDataError),
    #[error(transparent)]
    ModuleId(#[from] ModuleIdError),
    #[error(transparent)]
    AppSettings(#[from] AppSettingsError),
}
