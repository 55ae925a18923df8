use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use course_core::model::{ModuleId, QuizData};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    AppServices, AppSettingsService, Clock, ProgressService, QuizService, TutorConfig,
    TutorService,
};
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://course.sqlite3";
const FALLBACK_MODULE: &str = "course";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidModule { raw: String },
    MissingQuizPath,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidModule { raw } => write!(f, "invalid --module value: {raw}"),
            ArgsError::MissingQuizPath => write!(f, "check-quiz requires a path"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    module_id: ModuleId,
    course_notes: Arc<str>,
    quiz: Arc<QuizService>,
    progress: Arc<ProgressService>,
    tutor: Arc<TutorService>,
    app_settings: Arc<AppSettingsService>,
}

impl UiApp for DesktopApp {
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

struct Args {
    db_url: String,
    quiz_path: Option<PathBuf>,
    context_path: Option<PathBuf>,
    module: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- ui [--db <sqlite_url>] [--quiz <file>] [--context <file>] [--module <id>]"
    );
    eprintln!("  cargo run -p app -- check-quiz <file>");
    eprintln!();
    eprintln!("Defaults for ui:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --module derived from the --context or --quiz file name");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  COURSE_DB_URL, COURSE_QUIZ_FILE, COURSE_CONTEXT_FILE, COURSE_MODULE");
    eprintln!("  COURSE_AI_API_KEY, COURSE_AI_MODEL, COURSE_AI_BASE_URL, COURSE_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    CheckQuiz,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "check-quiz" => Some(Self::CheckQuiz),
            _ => None,
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Args {
    fn parse_ui(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = env_value("COURSE_DB_URL")
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut quiz_path = env_value("COURSE_QUIZ_FILE").map(PathBuf::from);
        let mut context_path = env_value("COURSE_CONTEXT_FILE").map(PathBuf::from);
        let mut module = env_value("COURSE_MODULE");

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--quiz" => quiz_path = Some(require_value(args, "--quiz")?.into()),
                "--context" => context_path = Some(require_value(args, "--context")?.into()),
                "--module" => module = Some(require_value(args, "--module")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            quiz_path,
            context_path,
            module,
        })
    }

    /// `--module` wins, then the notes page name, then the quiz page name.
    fn module_id(&self) -> Result<ModuleId, ArgsError> {
        if let Some(raw) = self.module.as_ref() {
            return ModuleId::new(raw.as_str())
                .map_err(|_| ArgsError::InvalidModule { raw: raw.clone() });
        }
        let from_path = [self.context_path.as_ref(), self.quiz_path.as_ref()]
            .into_iter()
            .flatten()
            .find_map(|path| ModuleId::from_page_path(&path.to_string_lossy()).ok());
        match from_path {
            Some(id) => Ok(id),
            None => ModuleId::new(FALLBACK_MODULE).map_err(|_| ArgsError::InvalidModule {
                raw: FALLBACK_MODULE.to_string(),
            }),
        }
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    let level = env_value("COURSE_LOG")
        .and_then(|raw| raw.parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_quiz(path: Option<&Path>) -> Result<QuizService, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(QuizService::from_path(path)?),
        None => {
            tracing::warn!("no quiz file given, starting with an empty quiz");
            Ok(QuizService::new(QuizData::default()))
        }
    }
}

fn load_course_notes(path: Option<&Path>) -> Result<String, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let notes = std::fs::read_to_string(path)?;
            tracing::info!(path = %path.display(), chars = notes.len(), "course notes loaded");
            Ok(notes)
        }
        None => {
            tracing::warn!("no course notes given, the tutor will be unavailable");
            Ok(String::new())
        }
    }
}

fn check_quiz(args: &mut impl Iterator<Item = String>) -> Result<(), Box<dyn std::error::Error>> {
    let path = args.next().ok_or(ArgsError::MissingQuizPath)?;
    if let Some(extra) = args.next() {
        return Err(ArgsError::UnknownArg(extra).into());
    }
    let quiz = QuizService::from_path(Path::new(&path))?;
    let issues = quiz.issues();
    println!(
        "{path}: {} question(s), course index {}",
        quiz.data().len(),
        quiz.course_index_url()
    );
    for issue in &issues {
        println!("  question {}: {}", issue.index + 1, issue.error);
    }
    if issues.is_empty() {
        println!("ok");
        Ok(())
    } else {
        Err(format!("{} malformed question(s)", issues.len()).into())
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }
    let mut iter = argv.into_iter();

    if cmd == Command::CheckQuiz {
        return check_quiz(&mut iter);
    }

    let parsed = Args::parse_ui(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let module_id = parsed.module_id()?;
    let quiz = load_quiz(parsed.quiz_path.as_deref())?;
    let course_notes = load_course_notes(parsed.context_path.as_deref())?;

    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(
        &parsed.db_url,
        Clock::system(),
        TutorConfig::from_env(),
        course_notes.clone(),
    )
    .await?;
    tracing::info!(module = %module_id, questions = quiz.data().len(), "launching course window");

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        module_id,
        course_notes: Arc::from(course_notes),
        quiz: Arc::new(quiz),
        progress: services.progress(),
        tutor: services.tutor(),
        app_settings: services.app_settings(),
    });
    let context = build_app_context(&app);

    // Some dev setups default to an always-on-top window.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Course Companion")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse_ui(&mut iter)
    }

    #[test]
    fn module_flag_wins_over_paths() {
        let args = parse(&["--quiz", "week1/Quiz.html", "--module", "week2"]).unwrap();
        assert_eq!(args.module_id().unwrap().as_str(), "week2");
    }

    #[test]
    fn module_falls_back_to_notes_page_name() {
        let args = parse(&["--context", "notes/Student_Notes.md", "--quiz", "q.json"]).unwrap();
        assert_eq!(args.module_id().unwrap().as_str(), "Student_Notes");
    }

    #[test]
    fn missing_flag_value_is_reported() {
        let err = parse(&["--quiz"]).err().unwrap();
        assert!(matches!(err, ArgsError::MissingValue { flag: "--quiz" }));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let err = parse(&["--deck"]).err().unwrap();
        assert!(matches!(err, ArgsError::UnknownArg(_)));
    }

    #[test]
    fn relative_db_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("data/course.sqlite3".to_string());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/course.sqlite3"));
        assert_eq!(normalize_sqlite_url(DEFAULT_DB_URL.into()), DEFAULT_DB_URL);
    }
}
