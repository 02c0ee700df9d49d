//! Content-generation providers.
//!
//! The generation service talks to the model only through the
//! [`ContentGenerator`] trait, so the client is built once at startup and a
//! stub can stand in for it in tests.

mod gemini;
#[cfg(test)]
pub(crate) mod stub;

pub use gemini::GeminiClient;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A single request to the model.
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    /// Video the model should watch/listen to, if any.
    pub video_url: Option<&'a str>,
    /// Natural-language instructions.
    pub prompt: &'a str,
    /// Schema the reply must conform to. `None` asks for free text.
    pub response_schema: Option<Value>,
}

impl<'a> GenerationRequest<'a> {
    /// A request for structured JSON about a video.
    pub fn structured(video_url: &'a str, prompt: &'a str, schema: Value) -> Self {
        Self {
            video_url: Some(video_url),
            prompt,
            response_schema: Some(schema),
        }
    }

    /// A plain text request with no video attached.
    pub fn text(prompt: &'a str) -> Self {
        Self {
            video_url: None,
            prompt,
            response_schema: None,
        }
    }
}

/// Trait for generative model clients.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Send one request and return the raw reply text (possibly empty).
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String>;

    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}
