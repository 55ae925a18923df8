use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::TutorError;

use super::service::{TutorBackend, TutorEndpoint};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// HTTP client for the Gemini `generateContent` API.
#[derive(Clone, Default)]
pub struct GeminiClient {
    client: Client,
}

impl GeminiClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl TutorBackend for GeminiClient {
    async fn generate(&self, endpoint: &TutorEndpoint, prompt: &str) -> Result<String, TutorError> {
        let url = format!(
            "{}/models/{}:generateContent",
            endpoint.base_url.trim_end_matches('/'),
            endpoint.model
        );
        let payload = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(url)
            .query(&[("key", endpoint.api_key.as_str())])
            .json(&payload)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        classify_generate_response(status, &body)
    }

    async fn list_models(&self, endpoint: &TutorEndpoint) -> Result<Vec<String>, TutorError> {
        let url = format!("{}/models", endpoint.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .query(&[("key", endpoint.api_key.as_str())])
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        parse_model_list(status, &body)
    }
}

/// Map a `generateContent` reply to the answer text or a typed error.
///
/// # Errors
///
/// Returns `TutorError::RateLimited` for 429 or quota errors, `TutorError::Api`
/// for any other error body or non-JSON failure, and `TutorError::EmptyResponse`
/// when no candidate carries text.
pub fn classify_generate_response(status: u16, body: &str) -> Result<String, TutorError> {
    let parsed: GenerateResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) if !(200..300).contains(&status) => {
            return Err(TutorError::Api {
                code: Some(i64::from(status)),
                message: body.trim().to_string(),
            });
        }
        Err(_) => return Err(TutorError::EmptyResponse),
    };

    if let Some(error) = parsed.error {
        return Err(error.into_tutor_error());
    }
    if !(200..300).contains(&status) {
        return Err(TutorError::Api {
            code: Some(i64::from(status)),
            message: format!("request failed with status {status}"),
        });
    }

    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .filter(|text| !text.trim().is_empty())
        .ok_or(TutorError::EmptyResponse)
}

/// Model names from a `models` listing, without the `models/` prefix.
///
/// # Errors
///
/// Returns `TutorError` if the listing is an error body or cannot be parsed.
pub fn parse_model_list(status: u16, body: &str) -> Result<Vec<String>, TutorError> {
    let parsed: ModelList = serde_json::from_str(body).map_err(|err| TutorError::Api {
        code: Some(i64::from(status)),
        message: err.to_string(),
    })?;
    if let Some(error) = parsed.error {
        return Err(error.into_tutor_error());
    }
    Ok(parsed
        .models
        .into_iter()
        .map(|model| {
            model
                .name
                .strip_prefix("models/")
                .map_or_else(|| model.name.clone(), str::to_owned)
        })
        .collect())
}

/// `"7s"` or `"1.5s"` as used by `RetryInfo.retryDelay`.
fn parse_retry_delay(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().strip_suffix('s')?.parse().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<i64>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorDetail {
    retry_delay: Option<String>,
}

impl ApiErrorBody {
    fn into_tutor_error(self) -> TutorError {
        if self.code == Some(429) || self.message.contains("Quota") {
            let retry_after = self
                .details
                .iter()
                .find_map(|detail| detail.retry_delay.as_deref().and_then(parse_retry_delay));
            TutorError::RateLimited {
                message: self.message,
                retry_after,
            }
        } else {
            TutorError::Api {
                code: self.code,
                message: self.message,
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelEntry>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_candidate_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"A hypervisor runs VMs."}]}}]}"#;
        assert_eq!(
            classify_generate_response(200, body).unwrap(),
            "A hypervisor runs VMs."
        );
    }

    #[test]
    fn code_429_is_rate_limited_with_retry_delay() {
        let body = r#"{"error":{"code":429,"message":"Resource exhausted","status":"RESOURCE_EXHAUSTED",
            "details":[{"@type":"type.googleapis.com/google.rpc.RetryInfo","retryDelay":"7s"}]}}"#;
        match classify_generate_response(429, body).unwrap_err() {
            TutorError::RateLimited { retry_after, .. } => {
                assert_eq!(retry_after, Some(Duration::from_secs(7)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn quota_message_is_rate_limited() {
        let body = r#"{"error":{"code":403,"message":"Quota exceeded for metric"}}"#;
        assert!(classify_generate_response(403, body).unwrap_err().is_rate_limited());
    }

    #[test]
    fn other_error_is_api() {
        let body = r#"{"error":{"code":404,"message":"models/foo is not found"}}"#;
        match classify_generate_response(404, body).unwrap_err() {
            TutorError::Api { code, message } => {
                assert_eq!(code, Some(404));
                assert!(message.contains("not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_candidates_is_empty_response() {
        assert!(matches!(
            classify_generate_response(200, r#"{"candidates":[]}"#),
            Err(TutorError::EmptyResponse)
        ));
        assert!(matches!(
            classify_generate_response(200, r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            Err(TutorError::EmptyResponse)
        ));
    }

    #[test]
    fn non_json_failure_is_api() {
        assert!(matches!(
            classify_generate_response(502, "Bad Gateway"),
            Err(TutorError::Api { code: Some(502), .. })
        ));
    }

    #[test]
    fn model_list_strips_prefix() {
        let body = r#"{"models":[{"name":"models/gemini-2.0-flash-lite"},{"name":"gemini-pro"}]}"#;
        assert_eq!(
            parse_model_list(200, body).unwrap(),
            vec!["gemini-2.0-flash-lite", "gemini-pro"]
        );
    }

    #[test]
    fn retry_delay_parsing() {
        assert_eq!(parse_retry_delay("1.5s"), Some(Duration::from_millis(1500)));
        assert_eq!(parse_retry_delay("soon"), None);
        assert_eq!(parse_retry_delay("-3s"), None);
        assert_eq!(parse_retry_delay("NaNs"), None);
    }

    #[test]
    fn oversized_retry_delay_is_dropped() {
        let body = r#"{"error":{"code":429,"message":"Quota","details":[{"retryDelay":"1e30s"}]}}"#;
        match classify_generate_response(429, body).unwrap_err() {
            TutorError::RateLimited { retry_after, .. } => assert_eq!(retry_after, None),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
