use std::sync::Arc;

use course_core::model::ModuleId;
use services::{AppSettingsService, ProgressService, QuizService, TutorService};

/// What the composition root hands to the UI.
pub trait UiApp: Send + Sync {
    fn module_id(&self) -> ModuleId;
    fn course_notes(&self) -> Arc<str>;

    fn quiz(&self) -> Arc<QuizService>;
    fn progress(&self) -> Arc<ProgressService>;
    fn tutor(&self) -> Arc<TutorService>;
    fn app_settings(&self) -> Arc<AppSettingsService>;
}

#[derive(Clone)]
pub struct AppContext {
    module_id: ModuleId,
    course_notes: Arc<str>,

    quiz: Arc<QuizService>,
    progress: Arc<ProgressService>,
    tutor: Arc<TutorService>,
    app_settings: Arc<AppSettingsService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            module_id: app.module_id(),
            course_notes: app.course_notes(),
            quiz: app.quiz(),
            progress: app.progress(),
            tutor: app.tutor(),
            app_settings: app.app_settings(),
        }
    }

    #[must_use]
    pub fn module_id(&self) -> ModuleId {
        self.module_id.clone()
    }

    #[must_use]
    pub fn course_notes(&self) -> Arc<str> {
        Arc::clone(&self.course_notes)
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn tutor(&self) -> Arc<TutorService> {
        Arc::clone(&self.tutor)
    }

    #[must_use]
    pub fn app_settings(&self) -> Arc<AppSettingsService> {
        Arc::clone(&self.app_settings)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
