use std::sync::Arc;

use course_core::model::ModuleId;
use course_core::time::fixed_clock;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::tutor::TutorEndpoint;
use services::{
    AppSettingsService, ProgressService, QuizService, TutorBackend, TutorConfig, TutorError,
    TutorService,
};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::{ModuleView, QuizView, TutorView};

pub const TEST_QUIZ: &str = r#"{
    "questions": [
        {"text": "What does a hypervisor manage?", "options": ["Virtual machines", "DNS records"], "correct": "A"},
        {"text": "Where does a Type 1 hypervisor run?", "options": ["On a host OS", "On bare metal"], "correct": "B"}
    ],
    "courseIndexUrl": "../Course_Index.html"
}"#;

/// Answers every prompt with a fixed reply.
struct CannedBackend;

#[async_trait::async_trait]
impl TutorBackend for CannedBackend {
    async fn generate(&self, _endpoint: &TutorEndpoint, _prompt: &str) -> Result<String, TutorError> {
        Ok("A hypervisor runs virtual machines.".to_string())
    }

    async fn list_models(&self, _endpoint: &TutorEndpoint) -> Result<Vec<String>, TutorError> {
        Ok(vec!["gemini-1.5-flash".to_string()])
    }
}

#[derive(Clone)]
struct TestApp {
    module_id: ModuleId,
    course_notes: Arc<str>,
    quiz: Arc<QuizService>,
    progress: Arc<ProgressService>,
    tutor: Arc<TutorService>,
    app_settings: Arc<AppSettingsService>,
}

impl UiApp for TestApp {
    fn module_id(&self) -> ModuleId {
        self.module_id.clone()
    }

    fn course_notes(&self) -> Arc<str> {
        Arc::clone(&self.course_notes)
    }

    fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    fn tutor(&self) -> Arc<TutorService> {
        Arc::clone(&self.tutor)
    }

    fn app_settings(&self) -> Arc<AppSettingsService> {
        Arc::clone(&self.app_settings)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Module,
    Quiz,
    Tutor,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Module => rsx! { ModuleView {} },
        ViewKind::Quiz => rsx! { QuizView {} },
        ViewKind::Tutor => rsx! { TutorView {} },
    }
}

/// Knobs for building a harness.
#[derive(Clone, Debug)]
pub struct HarnessOptions {
    pub notes: &'static str,
    pub quiz_source: &'static str,
    pub tutor_context: &'static str,
    pub embedded_key: Option<&'static str>,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            notes: "# Virtualization\n\nA **hypervisor** runs virtual machines.",
            quiz_source: TEST_QUIZ,
            tutor_context: "Hypervisors come in two types.",
            embedded_key: None,
        }
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub module_id: ModuleId,
    pub progress: Arc<ProgressService>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild and let pending resources settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with(view, HarnessOptions::default())
}

/// # Panics
///
/// Panics if the quiz source does not parse.
pub fn setup_view_harness_with(view: ViewKind, options: HarnessOptions) -> ViewHarness {
    let storage = Storage::in_memory();
    let module_id = ModuleId::new("Student_Notes").expect("module id");
    let progress = Arc::new(ProgressService::new(
        fixed_clock(),
        Arc::clone(&storage.progress),
    ));
    let quiz = Arc::new(QuizService::from_source(options.quiz_source).expect("quiz source"));
    let config = TutorConfig {
        embedded_key: options.embedded_key.map(str::to_string),
        ..TutorConfig::default()
    };
    let tutor = Arc::new(TutorService::new(
        Arc::new(CannedBackend),
        Arc::clone(&storage.app_settings),
        config,
        options.tutor_context,
    ));
    let app_settings = Arc::new(AppSettingsService::new(Arc::clone(&storage.app_settings)));

    let app = Arc::new(TestApp {
        module_id: module_id.clone(),
        course_notes: Arc::from(options.notes),
        quiz,
        progress: Arc::clone(&progress),
        tutor,
        app_settings,
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness {
        dom,
        storage,
        module_id,
        progress,
    }
}
