//! Google Gemini client over the `generateContent` REST endpoint.

use super::{ContentGenerator, GenerationRequest};
use crate::config::GeminiSettings;
use crate::error::{Result, VidlearnError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    FileData(FileData<'a>),
    Text(&'a str),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData<'a> {
    file_uri: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    status: Option<String>,
    message: String,
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    http: Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: Option<f32>,
}

impl GeminiClient {
    /// Create a client from settings and an API key.
    pub fn new(settings: &GeminiSettings, api_key: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| VidlearnError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    fn build_body<'a>(&self, request: &GenerationRequest<'a>) -> GenerateContentRequest<'a> {
        let mut parts = Vec::with_capacity(2);
        if let Some(url) = request.video_url {
            parts.push(Part::FileData(FileData { file_uri: url }));
        }
        parts.push(Part::Text(request.prompt));

        let structured = request.response_schema.is_some();
        let generation_config = if structured || self.temperature.is_some() {
            Some(GenerationConfig {
                response_mime_type: structured.then_some("application/json"),
                response_schema: request.response_schema.clone(),
                temperature: self.temperature,
            })
        } else {
            None
        };

        GenerateContentRequest {
            contents: vec![Content { role: "user", parts }],
            generation_config,
        }
    }
}

/// Concatenate the text parts of the first candidate.
fn reply_text(response: &GenerateContentResponse) -> String {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        warn!("Gemini blocked the prompt: {}", reason);
    }

    let Some(candidate) = response.candidates.first() else {
        return String::new();
    };

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason != "STOP" {
            warn!("Gemini finished with reason {}", reason);
        }
    }

    candidate
        .content
        .as_ref()
        .map(|c| {
            c.parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Extract a readable message from an error response body.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(kind) => format!("{} ({}): {}", status, kind, envelope.error.message),
            None => format!("{}: {}", status, envelope.error.message),
        },
        Err(_) => format!("{}: {}", status, crate::sanitize::snippet(body, 200)),
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    #[instrument(skip(self, request), fields(model = %self.model, video = ?request.video_url))]
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String> {
        let body = self.build_body(&request);

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VidlearnError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(VidlearnError::Provider(error_message(status, &text)));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| VidlearnError::Provider(format!("Unreadable response: {}", e)))?;

        let text = reply_text(&parsed);
        debug!("Raw Gemini response length: {}", text.len());
        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> GeminiClient {
        GeminiClient::new(&GeminiSettings::default(), "test-key".to_string()).unwrap()
    }

    #[test]
    fn test_structured_request_body() {
        let client = client();
        let schema = json!({ "type": "OBJECT" });
        let request = GenerationRequest::structured("https://youtu.be/abc", "Transcribe", schema.clone());
        let body = serde_json::to_value(client.build_body(&request)).unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "fileData": { "fileUri": "https://youtu.be/abc" } },
                        { "text": "Transcribe" }
                    ]
                }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": schema
                }
            })
        );
    }

    #[test]
    fn test_text_request_has_no_generation_config() {
        let body = serde_json::to_value(client().build_body(&GenerationRequest::text("Say hello"))).unwrap();
        assert_eq!(body["contents"][0]["parts"], json!([{ "text": "Say hello" }]));
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_endpoint_uses_model() {
        let client = client();
        assert_eq!(
            client.endpoint(),
            format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
                GeminiSettings::default().model
            )
        );
    }

    #[test]
    fn test_reply_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(reply_text(&response), "{\"a\":1}");
    }

    #[test]
    fn test_reply_text_empty_when_blocked() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        assert_eq!(reply_text(&response), "");
        assert_eq!(reply_text(&GenerateContentResponse::default()), "");
    }

    #[test]
    fn test_error_message_from_envelope() {
        let body = r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#;
        let msg = error_message(reqwest::StatusCode::FORBIDDEN, body);
        assert_eq!(msg, "403 Forbidden (PERMISSION_DENIED): API key not valid");

        let msg = error_message(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(msg, "502 Bad Gateway: upstream down");
    }
}
