mod app_settings;
mod bank;
mod label;
mod module;
mod question;

pub use app_settings::{AppSettings, AppSettingsDraft, AppSettingsError};
pub use bank::{BankIssue, DEFAULT_COURSE_INDEX_URL, QuizData, QuizDataError};
pub use label::{LabelError, MAX_OPTIONS, OptionLabel};
pub use module::{COMPLETION_KEY_PREFIX, ModuleId, ModuleIdError};
pub use question::{Question, QuestionError};
