/// LLM Client: the single point of entry for generation service calls.
///
/// ARCHITECTURAL RULE: No other module may call the generation API directly.
/// The pipeline depends on the `TextGenerator` trait; `GeminiClient` is the
/// production implementation.
///
/// Calls are single-shot. There is no retry loop; the HTTP client timeout is
/// the only bound on a call.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::errors::TailorError;

pub mod prompts;

const TEMPERATURE: f32 = 0.2;
const TOP_P: f32 = 0.9;
const CANDIDATE_COUNT: u32 = 1;
const MAX_OUTPUT_TOKENS: u32 = 4000;
/// Returned in place of an empty response so the validator rejects it.
const EMPTY_RESPONSE: &str = "{}";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("generation API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<LlmError> for TailorError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => {
                TailorError::Configuration("GEMINI_API_KEY not set".to_string())
            }
            LlmError::Http(e) if e.is_timeout() => {
                TailorError::Generation(format!("generation call timed out: {e}"))
            }
            other => TailorError::Generation(other.to_string()),
        }
    }
}

/// Anything that can turn a prompt plus a response schema into raw response text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<String, TailorError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    temperature: f32,
    top_p: f32,
    candidate_count: u32,
    max_output_tokens: u32,
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Gemini `generateContent` client configured for low-temperature,
/// single-candidate, schema-constrained JSON output.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Makes one call and returns the full response object.
    pub async fn call(
        &self,
        prompt: &str,
        schema: &Value,
    ) -> Result<GenerateContentResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                candidate_count: CANDIDATE_COUNT,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Generation call succeeded: prompt_tokens={}, output_tokens={}, finish_reason={:?}",
                usage.prompt_token_count,
                usage.candidates_token_count,
                parsed.candidates.first().and_then(|c| c.finish_reason.as_deref())
            );
        }

        Ok(parsed)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<String, TailorError> {
        let response = self.call(prompt, schema).await?;
        Ok(response
            .text()
            .unwrap_or_else(|| EMPTY_RESPONSE.to_string()))
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL: &str = "gemini-2.5-flash";
    const ENDPOINT: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn client_for(server: &MockServer, key: Option<&str>) -> GeminiClient {
        GeminiClient::new(
            key.map(str::to_string),
            server.uri(),
            MODEL,
            Duration::from_secs(5),
        )
    }

    fn candidate_body(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }], "role": "model" },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 5 }
        })
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("{\"ok\":true}")))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server, Some("test-key"))
            .generate("prompt", &json!({"type": "OBJECT"}))
            .await
            .unwrap();
        assert_eq!(text, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_request_carries_constrained_generation_config() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(body_partial_json(json!({
                "generationConfig": {
                    "temperature": 0.2,
                    "candidateCount": 1,
                    "maxOutputTokens": 4000,
                    "responseMimeType": "application/json",
                    "responseSchema": { "type": "OBJECT" }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("{}")))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server, Some("k"))
            .generate("prompt", &json!({"type": "OBJECT"}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_candidates_fall_back_to_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let text = client_for(&server, Some("k"))
            .generate("prompt", &json!({}))
            .await
            .unwrap();
        assert_eq!(text, "{}");
    }

    #[tokio::test]
    async fn test_missing_key_is_a_configuration_error() {
        let server = MockServer::start().await;
        let err = client_for(&server, None)
            .generate("prompt", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, TailorError::Configuration(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_api_error_is_a_generation_error_with_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server, Some("bad"))
            .generate("prompt", &json!({}))
            .await
            .unwrap_err();
        match err {
            TailorError::Generation(msg) => {
                assert!(msg.contains("400"));
                assert!(msg.contains("API key not valid"));
            }
            other => panic!("expected generation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server, Some("k"))
            .generate("prompt", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "generation");
    }

    #[tokio::test]
    async fn test_slow_service_times_out_as_generation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(candidate_body("{}"))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::new(
            Some("k".to_string()),
            server.uri(),
            MODEL,
            Duration::from_millis(50),
        );
        let err = client.generate("prompt", &json!({})).await.unwrap_err();
        match err {
            TailorError::Generation(msg) => assert!(msg.contains("timed out"), "{msg}"),
            other => panic!("expected generation error, got {other:?}"),
        }
    }
}
