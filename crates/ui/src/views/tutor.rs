use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    ASK_SHORTCUTS, ChatMessageVm, KEY_SAVED, SETUP_GREETING, map_model_list, map_retry_notice,
    map_tutor_error, take_question, wants_model_diagnostics,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TutorStatus {
    configured: bool,
    has_context: bool,
}

#[component]
pub fn TutorView() -> Element {
    let ctx = use_context::<AppContext>();
    let tutor = ctx.tutor();
    let app_settings = ctx.app_settings();
    let show_key_form = !tutor.has_embedded_key();

    let mut messages = use_signal(Vec::<ChatMessageVm>::new);
    let mut input = use_signal(String::new);
    let mut typing = use_signal(|| false);
    let mut show_settings = use_signal(|| false);
    let mut key_input = use_signal(String::new);
    let mut settings_error = use_signal(|| None::<String>);

    let tutor_for_status = tutor.clone();
    let mut status = use_resource(move || {
        let tutor = tutor_for_status.clone();
        async move {
            let configured = tutor.is_configured().await.map_err(|_| ViewError::Storage)?;
            Ok::<_, ViewError>(TutorStatus {
                configured,
                has_context: tutor.has_context(),
            })
        }
    });

    let on_send = {
        let tutor = tutor.clone();
        use_callback(move |question: String| {
            let Some(question) = take_question(typing(), &question) else {
                return;
            };
            // In flight from here until the task finishes.
            typing.set(true);
            messages.write().push(ChatMessageVm::user(&question));
            let tutor = tutor.clone();
            let mut messages = messages;
            let mut typing = typing;
            spawn(async move {
                let outcome = tutor
                    .send_question(&question, move |notice| {
                        messages.write().push(map_retry_notice(notice));
                    })
                    .await;
                typing.set(false);
                match outcome {
                    Ok(answer) => messages.write().push(ChatMessageVm::tutor(&answer)),
                    Err(err) => {
                        messages.write().push(map_tutor_error(&err));
                        if wants_model_diagnostics(&err) {
                            match tutor.list_models().await {
                                Ok(models) => messages.write().push(map_model_list(&models)),
                                Err(list_err) => {
                                    tracing::debug!(error = %list_err, "model listing failed");
                                }
                            }
                        }
                    }
                }
            });
        })
    };

    let on_submit = use_callback(move |_: ()| {
        if let Some(question) = take_question(typing(), &input()) {
            input.set(String::new());
            on_send.call(question);
        }
    });

    let on_save_key = use_callback(move |_| {
        let key = key_input();
        if key.trim().is_empty() {
            settings_error.set(Some("Enter an API key first.".to_string()));
            return;
        }
        let app_settings = app_settings.clone();
        let mut key_input = key_input;
        let mut settings_error = settings_error;
        let mut show_settings = show_settings;
        let mut messages = messages;
        spawn(async move {
            match app_settings.save_api_key(key).await {
                Ok(_) => {
                    key_input.set(String::new());
                    settings_error.set(None);
                    show_settings.set(false);
                    messages.write().push(ChatMessageVm::tutor(KEY_SAVED));
                    status.restart();
                }
                Err(err) => {
                    tracing::warn!(error = %err, "could not save tutor key");
                    settings_error.set(Some("Could not save the key. Please try again.".to_string()));
                }
            }
        });
    });

    let banner = match view_state_from_resource(&status) {
        ViewState::Ready(status) if !status.has_context => {
            Some(ChatMessageVm::error("Error: Course knowledge base not loaded."))
        }
        ViewState::Ready(status) if !status.configured => Some(ChatMessageVm::tutor(SETUP_GREETING)),
        ViewState::Error(err) => Some(ChatMessageVm::error(err.message())),
        _ => None,
    };

    rsx! {
        div { class: "page tutor-page",
            header { class: "view-header",
                h2 { class: "view-title", "AI Tutor" }
                if show_key_form {
                    button {
                        class: "btn btn-secondary tutor-settings-toggle",
                        r#type: "button",
                        onclick: move |_| show_settings.set(!show_settings()),
                        "Settings"
                    }
                }
            }
            div { class: "view-divider" }
            if show_key_form && show_settings() {
                section { class: "tutor-settings",
                    label { r#for: "api-key-input", "Gemini API Key" }
                    input {
                        id: "api-key-input",
                        r#type: "password",
                        value: "{key_input}",
                        oninput: move |evt| key_input.set(evt.value()),
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| on_save_key.call(()),
                        "Save Key"
                    }
                    if let Some(error) = settings_error() {
                        p { class: "field-error", "{error}" }
                    }
                }
            }
            div { id: "chat-messages", class: "chat-messages",
                if let Some(message) = banner {
                    div { class: "{message.role.class()}", dangerous_inner_html: "{message.html}" }
                }
                for (index, message) in messages.read().iter().enumerate() {
                    div {
                        key: "{index}",
                        class: "{message.role.class()}",
                        dangerous_inner_html: "{message.html}",
                    }
                }
                if typing() {
                    div { id: "typing-indicator", class: "chat-message bot typing", "Thinking..." }
                }
            }
            div { class: "tutor-shortcuts",
                for (label, question) in ASK_SHORTCUTS {
                    button {
                        key: "{label}",
                        class: "btn btn-chip",
                        r#type: "button",
                        disabled: typing(),
                        onclick: move |_| on_send.call(question.to_string()),
                        "{label}"
                    }
                }
            }
            div { class: "chat-input-row",
                input {
                    id: "user-input",
                    r#type: "text",
                    placeholder: "Ask a question about the course...",
                    value: "{input}",
                    oninput: move |evt| input.set(evt.value()),
                    onkeydown: move |evt: KeyboardEvent| {
                        if evt.key() == Key::Enter {
                            on_submit.call(());
                        }
                    },
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: typing(),
                    onclick: move |_| on_submit.call(()),
                    "Send"
                }
            }
        }
    }
}
