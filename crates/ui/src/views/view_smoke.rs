use course_core::model::AppSettingsDraft;
use storage::repository::{AppSettingsRepository, ProgressRepository};

use super::test_harness::{HarnessOptions, ViewKind, setup_view_harness, setup_view_harness_with};

#[tokio::test(flavor = "current_thread")]
async fn module_view_smoke_renders_notes_and_locked_gate() {
    let mut harness = setup_view_harness(ViewKind::Module);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Student_Notes"), "missing title in {html}");
    assert!(html.contains("<strong>hypervisor</strong>"), "missing notes in {html}");
    assert!(html.contains("Quiz locked"), "missing gate label in {html}");
    assert!(html.contains("Start Quiz"), "missing start button in {html}");
    assert!(!html.contains("Completed modules"), "unexpected list in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn module_view_smoke_renders_unlocked_gate_and_history() {
    let mut harness = setup_view_harness(ViewKind::Module);
    harness
        .progress
        .mark_module_complete(&harness.module_id)
        .await
        .expect("mark complete");
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Quiz unlocked"), "missing gate label in {html}");
    assert!(html.contains("Completed modules"), "missing list in {html}");
    assert!(html.contains("Read 2023-11-14 22:13 UTC"), "missing timestamp in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn module_view_smoke_handles_missing_notes() {
    let mut harness = setup_view_harness_with(
        ViewKind::Module,
        HarnessOptions {
            notes: "   ",
            ..HarnessOptions::default()
        },
    );
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No course notes loaded."), "missing placeholder in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_blocks_unread_module() {
    let mut harness = setup_view_harness(ViewKind::Quiz);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Quiz Locked!"), "missing locked alert in {html}");
    assert!(html.contains("Back to Notes"), "missing back button in {html}");
    assert!(!html.contains("start-screen"), "quiz should stay hidden in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_start_screen_once_read() {
    let mut harness = setup_view_harness(ViewKind::Quiz);
    harness
        .storage
        .progress
        .mark_complete(&harness.module_id, course_core::time::fixed_now())
        .await
        .expect("mark complete");
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Knowledge Check"), "missing heading in {html}");
    assert!(html.contains("2 questions"), "missing count in {html}");
    assert!(html.contains("Start Quiz"), "missing start button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_goes_straight_to_results_for_empty_bank() {
    let mut harness = setup_view_harness_with(
        ViewKind::Quiz,
        HarnessOptions {
            quiz_source: "window.QUIZ_DATA = {};",
            ..HarnessOptions::default()
        },
    );
    harness
        .progress
        .mark_module_complete(&harness.module_id)
        .await
        .expect("mark complete");
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("You got 0 out of 0 correct."), "missing score in {html}");
    assert!(html.contains("Back to Course"), "missing course link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn tutor_view_smoke_greets_until_key_is_set() {
    let mut harness = setup_view_harness(ViewKind::Tutor);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("configure the API Key"), "missing greeting in {html}");
    assert!(html.contains("Hypervisor Types?"), "missing shortcut in {html}");
    assert!(html.contains("Settings"), "missing settings toggle in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn tutor_view_smoke_skips_greeting_with_saved_key() {
    let mut harness = setup_view_harness(ViewKind::Tutor);
    let settings = AppSettingsDraft::with_api_key("saved-key")
        .validate()
        .expect("valid settings");
    harness
        .storage
        .app_settings
        .save_settings(&settings)
        .await
        .expect("save settings");
    harness.settle().await;
    let html = harness.render();
    assert!(!html.contains("configure the API Key"), "unexpected greeting in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn tutor_view_smoke_hides_settings_for_embedded_key() {
    let mut harness = setup_view_harness_with(
        ViewKind::Tutor,
        HarnessOptions {
            embedded_key: Some("built-in"),
            ..HarnessOptions::default()
        },
    );
    harness.settle().await;
    let html = harness.render();
    assert!(!html.contains("tutor-settings-toggle"), "settings should be hidden in {html}");
    assert!(!html.contains("configure the API Key"), "unexpected greeting in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn tutor_view_smoke_reports_missing_context() {
    let mut harness = setup_view_harness_with(
        ViewKind::Tutor,
        HarnessOptions {
            tutor_context: "",
            ..HarnessOptions::default()
        },
    );
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("Course knowledge base not loaded."),
        "missing context error in {html}"
    );
}
