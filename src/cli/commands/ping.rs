//! Ping command: checks that the configured model answers.

use crate::cli::Output;
use crate::config::Settings;
use crate::provider::{ContentGenerator, GeminiClient, GenerationRequest};
use anyhow::Result;

const PING_PROMPT: &str = "Say hello and confirm you can see this.";

/// Send a plain-text prompt to the model and print its reply.
pub async fn run_ping(settings: Settings) -> Result<()> {
    let api_key = settings.api_key()?;
    let client = GeminiClient::new(&settings.gemini, api_key)?;

    Output::header("Gemini connectivity check");
    Output::kv("Model", client.model());
    Output::kv("Endpoint", &settings.gemini.api_base);

    let spinner = Output::spinner("Waiting for a reply...");
    let result = client.generate(GenerationRequest::text(PING_PROMPT)).await;
    spinner.finish_and_clear();

    match result {
        Ok(reply) if reply.trim().is_empty() => {
            Output::warning("The model answered with an empty reply.");
            anyhow::bail!("empty reply from {}", client.name());
        }
        Ok(reply) => {
            Output::success("The model is reachable.");
            Output::reply(&reply);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Request failed: {}", e));
            Err(e.into())
        }
    }
}
