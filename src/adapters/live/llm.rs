//! Live adapter for the `LlmClient` port using the Gemini `generateContent` API.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::ports::llm::{GenerateRequest, GenerateResponse, LlmClient, LlmError, LlmFuture};

/// Live LLM client that calls the Google Gemini REST API.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Creates a client for the given base URL and credential.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self { client: Client::new(), base_url: base_url.into(), api_key }
    }

    /// Creates a client from resolved configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.base_url.clone(), config.api_key.clone())
    }
}

/// Builds the `generateContent` URL, accepting ids with or without the `models/` prefix.
fn endpoint(base_url: &str, model: &str) -> String {
    let path =
        if model.starts_with("models/") { model.to_string() } else { format!("models/{model}") };
    format!("{}/{path}:generateContent", base_url.trim_end_matches('/'))
}

/// Request body sent to `generateContent`.
#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

/// Top-level response from `generateContent`.
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Error envelope returned by Google APIs.
#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

/// Formats a non-2xx response so that the HTTP code, the provider status and
/// any detail reasons (such as `API_KEY_INVALID`) survive into the message.
fn describe_http_error(code: u16, body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<GeminiError>(body) else {
        return format!("Gemini API error ({code}): {}", body.trim());
    };
    let detail = parsed.error;
    let mut markers: Vec<String> = detail.status.into_iter().collect();
    markers.extend(
        detail
            .details
            .iter()
            .filter_map(|d| d.get("reason").and_then(serde_json::Value::as_str))
            .map(String::from),
    );
    if markers.is_empty() {
        format!("Gemini API error ({code}): {}", detail.message)
    } else {
        format!("Gemini API error ({code} {}): {}", markers.join(", "), detail.message)
    }
}

fn response_text(response: GeminiResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    Some(text)
}

impl GeminiClient {
    async fn send(&self, model: String, prompt: String) -> Result<GenerateResponse, LlmError> {
        let api_key =
            self.api_key.as_deref().ok_or_else(|| LlmError::from("Gemini API key not configured"))?;

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: &prompt }],
            }],
        };

        let url = endpoint(&self.base_url, &model);
        tracing::debug!(%url, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Gemini API request failed: {e}"))?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read Gemini API response: {e}"))?;

        if !status.is_success() {
            return Err(describe_http_error(status.as_u16(), &response_body).into());
        }

        let parsed: GeminiResponse = serde_json::from_str(&response_body)
            .map_err(|e| format!("Failed to parse Gemini API response: {e}"))?;

        let text = response_text(parsed)
            .ok_or_else(|| format!("Gemini API returned no candidates for model {model}"))?;

        Ok(GenerateResponse { text })
    }
}

impl LlmClient for GeminiClient {
    fn generate(&self, request: &GenerateRequest) -> LlmFuture<'_> {
        Box::pin(self.send(request.model.clone(), request.prompt.clone()))
    }
}
