use course_core::model::ModuleId;
use course_core::time::fixed_clock;
use services::{ProgressService, QuizGate, QuizService};
use storage::repository::Storage;

#[tokio::test]
async fn reading_unlocks_quiz_and_survives_reconnect() {
    let url = "sqlite:file:memdb_progress_flow?mode=memory&cache=shared";
    let storage = Storage::sqlite(url).await.expect("connect sqlite");
    let progress = ProgressService::new(fixed_clock(), storage.progress.clone());
    let module = ModuleId::from_page_path("Week 7/Student_Notes.html").unwrap();

    assert_eq!(progress.quiz_gate(&module).await.unwrap(), QuizGate::Locked);
    let update = progress
        .record_scroll(&module, 950.0, 1000.0, 2000.0)
        .await
        .unwrap();
    assert!(update.newly_completed);

    let reopened = Storage::sqlite(url).await.expect("reconnect sqlite");
    let progress = ProgressService::new(fixed_clock(), reopened.progress);
    assert_eq!(progress.quiz_gate(&module).await.unwrap(), QuizGate::Unlocked);
    assert!(!progress.mark_module_complete(&module).await.unwrap());
}

#[test]
fn quiz_page_to_finished_session() {
    let page = r#"<script>
        window.QUIZ_DATA = {
            "questions": [
                {"text": "Q1", "options": ["a", "b", "c", "d"], "correct": "B"},
                {"text": "Q2", "options": ["a", "b", "c", "d"], "correct": "C"},
                {"text": "Q3", "options": ["a", "b", "c", "d"], "correct": "D"}
            ]
        };
    </script>"#;
    let quiz = QuizService::from_source(page).unwrap();
    assert_eq!(quiz.course_index_url(), "../Course_Index.html");

    let mut session = quiz.new_session();
    session.begin().unwrap();
    for (question, option) in [(0, 1), (1, 0), (2, 3)] {
        session.select_option(question, option).unwrap();
    }
    let result = session.result().unwrap();
    assert_eq!((result.score, result.percentage), (2, 67));
}
