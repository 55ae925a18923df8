use dioxus::document::eval;
use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::QuizGate;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CompletedModuleVm, map_completed_modules, map_reading_progress, markdown_to_html};

use super::scripts::{READING_PROGRESS_SCRIPT, ScrollMetrics};

#[derive(Clone, Debug, PartialEq)]
struct ModuleData {
    gate: QuizGate,
    completed: Vec<CompletedModuleVm>,
}

#[component]
pub fn ModuleView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let module_id = ctx.module_id();
    let progress = ctx.progress();
    let notes = ctx.course_notes();
    let notes_html = use_hook(|| markdown_to_html(&notes));
    let has_notes = !notes.trim().is_empty();
    let mut reading = use_signal(|| 0.0_f64);
    let mut show_locked = use_signal(|| false);

    let progress_for_resource = progress.clone();
    let module_for_resource = module_id.clone();
    let resource = use_resource(move || {
        let progress = progress_for_resource.clone();
        let module_id = module_for_resource.clone();
        async move {
            let gate = progress
                .quiz_gate(&module_id)
                .await
                .map_err(|_| ViewError::Storage)?;
            let completed = progress
                .completed_modules()
                .await
                .map_err(|_| ViewError::Storage)?;
            Ok::<_, ViewError>(ModuleData {
                gate,
                completed: map_completed_modules(&completed),
            })
        }
    });

    let module_for_scroll = module_id.clone();
    use_future(move || {
        let progress = progress.clone();
        let module_id = module_for_scroll.clone();
        async move {
            let mut listener = eval(READING_PROGRESS_SCRIPT);
            while let Ok(metrics) = listener.recv::<ScrollMetrics>().await {
                match progress
                    .record_scroll(
                        &module_id,
                        metrics.scroll_top,
                        metrics.viewport_height,
                        metrics.document_height,
                    )
                    .await
                {
                    Ok(update) => {
                        reading.set(update.percent);
                        if update.newly_completed {
                            show_locked.set(false);
                            let mut resource = resource;
                            resource.restart();
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "could not record reading progress");
                    }
                }
            }
        }
    });

    let state = view_state_from_resource(&resource);
    let gate = match &state {
        ViewState::Ready(data) => data.gate,
        _ => QuizGate::Locked,
    };
    let bar = map_reading_progress(reading(), gate);

    rsx! {
        div { class: "page module-page",
            div { class: "read-progress-track",
                div { id: "read-progress", class: "read-progress-bar", style: "width: {bar.bar_width}" }
            }
            header { class: "view-header",
                h2 { class: "view-title", "{module_id}" }
                p { class: "view-subtitle", "Read to the bottom of the notes to unlock the quiz." }
            }
            div { class: "view-divider" }
            if has_notes {
                article { class: "module-notes", dangerous_inner_html: "{notes_html}" }
            } else {
                p { class: "module-notes-empty", "No course notes loaded." }
            }
            div { class: "module-quiz-entry",
                match state {
                    ViewState::Idle | ViewState::Loading => rsx! {
                        p { "Loading..." }
                    },
                    ViewState::Error(err) => rsx! {
                        p { "{err.message()}" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                let mut resource = resource;
                                resource.restart();
                            },
                            "Retry"
                        }
                    },
                    ViewState::Ready(data) => {
                        let locked = !data.gate.is_unlocked();
                        let button_class = if locked {
                            "btn btn-primary start-quiz-btn start-quiz-btn--locked"
                        } else {
                            "btn btn-primary start-quiz-btn"
                        };
                        rsx! {
                            p { class: "quiz-gate-status", "{bar.gate_label}" }
                            button {
                                id: "start-quiz-btn",
                                class: "{button_class}",
                                r#type: "button",
                                "data-locked": "{locked}",
                                onclick: move |_| {
                                    if locked {
                                        show_locked.set(true);
                                    } else {
                                        let _ = navigator.push(Route::Quiz {});
                                    }
                                },
                                "Start Quiz"
                            }
                            if show_locked() {
                                if let Some(message) = data.gate.message() {
                                    p { class: "quiz-locked-alert", role: "alert", "{message}" }
                                }
                            }
                            if !data.completed.is_empty() {
                                section { class: "completed-modules",
                                    h3 { "Completed modules" }
                                    ul {
                                        for row in data.completed.iter() {
                                            li { key: "{row.id}",
                                                span { class: "completed-module-id", "{row.id}" }
                                                span { class: "completed-module-when", "{row.completed_label}" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
