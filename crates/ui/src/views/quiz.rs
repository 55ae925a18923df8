use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::QuizGate;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizIntent, QuizScreenVm, QuizVm};

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let progress = ctx.progress();
    let module_id = ctx.module_id();

    let resource = use_resource(move || {
        let progress = progress.clone();
        let module_id = module_id.clone();
        async move {
            progress
                .quiz_gate(&module_id)
                .await
                .map_err(|_| ViewError::Storage)
        }
    });

    let state = view_state_from_resource(&resource);
    rsx! {
        div { class: "page quiz-page",
            header { class: "view-header",
                h2 { class: "view-title", "Knowledge Check" }
            }
            div { class: "view-divider" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
                ViewState::Ready(QuizGate::Locked) => rsx! {
                    div { class: "quiz-locked",
                        p { class: "quiz-locked-alert", role: "alert",
                            {QuizGate::Locked.message().unwrap_or_default()}
                        }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                let _ = navigator.push(Route::Module {});
                            },
                            "Back to Notes"
                        }
                    }
                },
                ViewState::Ready(QuizGate::Unlocked) => rsx! {
                    QuizPanel {}
                },
            }
        }
    }
}

/// Rejected intents leave the session as it was.
fn send(mut vm: Signal<QuizVm>, intent: QuizIntent) {
    let _ = vm.write().dispatch(intent);
}

#[component]
fn QuizPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz = ctx.quiz();
    let vm = use_signal(|| QuizVm::new(quiz.new_session(), quiz.course_index_url()));

    let screen = vm.read().screen();
    match screen {
        QuizScreenVm::Start(start) => rsx! {
            section { id: "start-screen", class: "quiz-screen quiz-start",
                p { class: "quiz-count", "{start.count_label}" }
                if start.is_empty {
                    p { class: "quiz-empty", "This quiz has no questions yet." }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| send(vm, QuizIntent::Start),
                    "Start Quiz"
                }
            }
        },
        QuizScreenVm::Question(question) => {
            let options = question.options.iter().map(|option| {
                let intent = QuizIntent::Select {
                    question: option.question,
                    option: option.option,
                };
                let class = if option.selected {
                    "quiz-option quiz-option--selected"
                } else {
                    "quiz-option"
                };
                rsx! {
                    button {
                        key: "{option.question}-{option.option}",
                        class: "{class}",
                        r#type: "button",
                        onclick: move |_| send(vm, intent),
                        span { class: "quiz-option-label", "{option.label}" }
                        span { class: "quiz-option-text", "{option.text}" }
                    }
                }
            });
            rsx! {
                section { id: "quiz-screen", class: "quiz-screen quiz-question",
                    div { class: "quiz-progress-track",
                        div {
                            class: "quiz-progress-bar",
                            style: "width: {question.progress_percent}%",
                        }
                    }
                    div { class: "quiz-progress-labels",
                        span { "{question.counter_label}" }
                        span { "{question.progress_label}" }
                    }
                    h3 { class: "quiz-question-text", "{question.text}" }
                    div { class: "quiz-options", {options} }
                    if question.can_go_previous {
                        button {
                            class: "btn btn-secondary quiz-previous",
                            r#type: "button",
                            onclick: move |_| send(vm, QuizIntent::Previous),
                            "Previous"
                        }
                    }
                }
            }
        }
        QuizScreenVm::Results(results) => {
            let rows = results.review.iter().map(|row| {
                let class = if row.is_correct {
                    "quiz-review-row quiz-review-row--correct"
                } else {
                    "quiz-review-row quiz-review-row--wrong"
                };
                rsx! {
                    li { key: "{row.number}", class: "{class}",
                        p { class: "quiz-review-question", "{row.number}. {row.question}" }
                        p { "Your answer: {row.given_label}" }
                        if !row.is_correct {
                            p { "Correct answer: {row.correct_label}" }
                        }
                        if let Some(explanation) = row.explanation.as_ref() {
                            p { class: "quiz-review-explanation", "{explanation}" }
                        }
                    }
                }
            });
            rsx! {
                section { id: "results-screen", class: "quiz-screen quiz-results",
                    p { class: "quiz-score", "{results.percentage_label}" }
                    p { class: "quiz-score-line", "{results.score_line}" }
                    p { class: "quiz-tier quiz-tier--{results.tier_class}", "{results.message}" }
                    ol { class: "quiz-review", {rows} }
                    div { class: "quiz-results-actions",
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            onclick: move |_| send(vm, QuizIntent::Retry),
                            "Retry Quiz"
                        }
                        a { class: "btn btn-secondary", href: "{results.course_index_url}", "Back to Course" }
                    }
                }
            }
        }
    }
}
