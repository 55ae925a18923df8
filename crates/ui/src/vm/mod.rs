mod markdown_vm;
mod progress_vm;
mod quiz_vm;
mod time_fmt;
mod tutor_vm;

pub use markdown_vm::{escape_text, markdown_to_html, sanitize_html};
pub use progress_vm::{
    CompletedModuleVm, ReadingProgressVm, map_completed_modules, map_reading_progress,
};
pub use quiz_vm::{
    QuizIntent, QuizOptionVm, QuizQuestionVm, QuizResultsVm, QuizScreenVm, QuizStartVm, QuizVm,
    ReviewRowVm, map_quiz_screen, progress_percent,
};
pub use time_fmt::format_datetime;
pub use tutor_vm::{
    ASK_SHORTCUTS, ChatMessageVm, ChatRole, KEY_SAVED, SETUP_GREETING, map_model_list,
    map_retry_notice, map_tutor_error, take_question, wants_model_diagnostics,
};
