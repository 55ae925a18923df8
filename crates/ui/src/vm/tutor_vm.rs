use services::{RetryNotice, TutorError};

use super::markdown_vm::{escape_text, markdown_to_html};

/// Canned questions offered under the chat input: (button label, question).
pub const ASK_SHORTCUTS: [(&str, &str); 3] = [
    (
        "Hypervisor Types?",
        "What is the difference between Type 1 and Type 2 hypervisors?",
    ),
    ("Containers vs VMs?", "Explain containers vs VMs"),
    ("OpenStack?", "What is OpenStack?"),
];

pub const SETUP_GREETING: &str =
    "Hi! To use the AI Tutor, please configure the API Key in settings.";
pub const KEY_SAVED: &str = "Key saved! Ask me anything about the course.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Tutor,
    Notice,
    Error,
}

impl ChatRole {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::User => "chat-message user",
            Self::Tutor => "chat-message bot",
            Self::Notice => "chat-message bot notice",
            Self::Error => "chat-message bot error",
        }
    }
}

/// One bubble in the chat log. `html` is always sanitized or escaped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessageVm {
    pub role: ChatRole,
    pub html: String,
}

impl ChatMessageVm {
    #[must_use]
    pub fn user(text: &str) -> Self {
        Self {
            role: ChatRole::User,
            html: escape_text(text),
        }
    }

    #[must_use]
    pub fn tutor(markdown: &str) -> Self {
        Self {
            role: ChatRole::Tutor,
            html: markdown_to_html(markdown),
        }
    }

    #[must_use]
    pub fn notice(text: &str) -> Self {
        Self {
            role: ChatRole::Notice,
            html: escape_text(text),
        }
    }

    #[must_use]
    pub fn error(text: &str) -> Self {
        Self {
            role: ChatRole::Error,
            html: escape_text(text),
        }
    }
}

/// The question to send from a draft, or `None` while a request is in flight
/// or the draft is blank. A refused draft stays in the input.
#[must_use]
pub fn take_question(in_flight: bool, draft: &str) -> Option<String> {
    let question = draft.trim();
    (!in_flight && !question.is_empty()).then(|| question.to_string())
}

#[must_use]
pub fn map_retry_notice(notice: RetryNotice) -> ChatMessageVm {
    ChatMessageVm::notice(&notice.message())
}

/// Whether a failed request warrants listing the models the key can use.
#[must_use]
pub fn wants_model_diagnostics(err: &TutorError) -> bool {
    matches!(err, TutorError::Api { .. })
}

#[must_use]
pub fn map_tutor_error(err: &TutorError) -> ChatMessageVm {
    let text = match err {
        TutorError::NotConfigured => SETUP_GREETING.to_string(),
        TutorError::MissingContext => "Error: Course knowledge base not loaded.".to_string(),
        TutorError::RateLimited { .. } => "Rate Limit Exceeded: Maximum retries reached. \
             Please wait a minute before trying again."
            .to_string(),
        TutorError::Api { message, .. } => format!("API Error: {message}"),
        TutorError::Network { message } => format!("Connection Error: {message}"),
        TutorError::EmptyResponse => "Sorry, I couldn't generate a response. Try again.".to_string(),
        other => format!("Error: {other}"),
    };
    ChatMessageVm::error(&text)
}

#[must_use]
pub fn map_model_list(models: &[String]) -> ChatMessageVm {
    ChatMessageVm::notice(&format!(
        "Debug Info: Your Key supports: {}",
        models.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn user_text_is_escaped_and_tutor_markdown_rendered() {
        assert!(!ChatMessageVm::user("<img src=x>").html.contains('<'));
        assert!(ChatMessageVm::tutor("**yes**").html.contains("<strong>yes</strong>"));
    }

    #[test]
    fn errors_map_to_messages() {
        let exhausted = map_tutor_error(&TutorError::RateLimited {
            message: "Quota".into(),
            retry_after: None,
        });
        assert_eq!(exhausted.role, ChatRole::Error);
        assert!(exhausted.html.contains("Maximum"));

        let api = TutorError::Api {
            code: Some(400),
            message: "bad key".into(),
        };
        assert!(map_tutor_error(&api).html.contains("bad"));
        assert!(wants_model_diagnostics(&api));
        assert!(!wants_model_diagnostics(&TutorError::EmptyResponse));
    }

    #[test]
    fn draft_is_held_while_a_request_is_in_flight() {
        assert_eq!(take_question(true, "What is KVM?"), None);
        assert_eq!(take_question(false, "  What is KVM? "), Some("What is KVM?".to_string()));
        assert_eq!(take_question(false, "   "), None);
    }

    #[test]
    fn retry_notice_is_a_notice() {
        let vm = map_retry_notice(RetryNotice {
            attempt: 1,
            max_retries: 3,
            wait: Duration::from_secs(3),
            server_hint: None,
        });
        assert_eq!(vm.role, ChatRole::Notice);
        assert!(vm.html.contains("Attempt"));
    }
}
